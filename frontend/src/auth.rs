//! 会话模块
//!
//! 管理当前登录用户与 Bearer 凭证，与路由系统解耦：
//! 路由服务通过注入的守卫信号读取会话快照。
//!
//! 凭证不写入任何进程级默认请求头——需要调用后端时由
//! `AuthState::api()` 用当前凭证构造一个客户端实例显式传递。

use leptos::prelude::*;
use leptos::task::spawn_local;

use nexcrm_shared::{LoginRequest, RegisterRequest, Role, UserProfile};

use crate::api::{ApiClient, ApiError, api_base};
use crate::web::console;
use crate::web::route::GuardState;
use crate::web::LocalStorage;

/// 持久化凭证的存储键
const STORAGE_TOKEN_KEY: &str = "token";

// =========================================================
// 会话状态
// =========================================================

/// 会话状态
///
/// 状态机：UNAUTHENTICATED → RESOLVING（启动时有持久化凭证）
/// → AUTHENTICATED | UNAUTHENTICATED；任意 401 或注销回到 UNAUTHENTICATED。
#[derive(Clone, Default, PartialEq, Debug)]
pub struct AuthState {
    /// 当前用户（凭证通过后端验证前为 None）
    pub user: Option<UserProfile>,
    /// Bearer 凭证
    pub token: Option<String>,
    /// 是否正在求证持久化凭证（RESOLVING）
    pub is_loading: bool,
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn role(&self) -> Option<Role> {
        self.user.as_ref().map(|user| user.role)
    }

    /// 用当前凭证构造 API 客户端
    pub fn api(&self) -> ApiClient {
        ApiClient::new(api_base(), self.token.clone())
    }

    /// 提供给路由守卫的快照
    pub fn guard(&self) -> GuardState {
        GuardState {
            is_loading: self.is_loading,
            role: self.role(),
        }
    }

    /// 注销后的状态（无条件清空，幂等）
    fn cleared() -> AuthState {
        AuthState {
            user: None,
            token: None,
            is_loading: false,
        }
    }
}

/// 会话上下文
///
/// 包含读写信号，通过 Context 在组件间共享。
#[derive(Clone, Copy)]
pub struct AuthContext {
    /// 会话状态（只读）
    pub state: ReadSignal<AuthState>,
    /// 设置会话状态（写入）
    pub set_state: WriteSignal<AuthState>,
}

impl AuthContext {
    /// 创建新的会话上下文，初始为 RESOLVING（由 init_auth 决定去向）
    pub fn new() -> Self {
        let (state, set_state) = signal(AuthState {
            is_loading: true,
            ..AuthState::default()
        });
        Self { state, set_state }
    }

    /// 获取守卫快照信号（用于路由服务注入）
    pub fn guard_signal(&self) -> Signal<GuardState> {
        let state = self.state;
        Signal::derive(move || state.get().guard())
    }
}

impl Default for AuthContext {
    fn default() -> Self {
        Self::new()
    }
}

/// 从 Context 获取会话上下文
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("AuthContext should be provided")
}

// =========================================================
// 会话操作
// =========================================================

/// 登录/注册失败时面向用户的错误
#[derive(Debug, Clone, PartialEq)]
pub struct AuthError(pub String);

impl AuthError {
    /// 优先取后端的 message，否则用调用方给的兜底文案
    fn from_api(err: ApiError, fallback: &str) -> Self {
        match err.server_message() {
            Some(message) => AuthError(message.to_string()),
            None => AuthError(fallback.to_string()),
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 初始化会话状态
///
/// 存在持久化凭证时进入 RESOLVING，向 whoami 端点求证；
/// 凭证被拒（过期/无效）时静默清除而不是报错——
/// 让用户直接看到登录页。
pub fn init_auth(ctx: &AuthContext) {
    let Some(token) = LocalStorage::get(STORAGE_TOKEN_KEY) else {
        ctx.set_state.update(|state| state.is_loading = false);
        return;
    };

    let set_state = ctx.set_state;
    ctx.set_state.update(|state| {
        state.token = Some(token.clone());
        state.is_loading = true;
    });

    spawn_local(async move {
        let api = ApiClient::new(api_base(), Some(token));
        match api.me().await {
            Ok(user) => {
                set_state.update(|state| {
                    state.user = Some(user);
                    state.is_loading = false;
                });
            }
            Err(err) => {
                console::warn(&format!("[Auth] Stored credential rejected: {err}"));
                LocalStorage::delete(STORAGE_TOKEN_KEY);
                set_state.set(AuthState::cleared());
            }
        }
    });
}

/// 登录并保存会话
///
/// 失败时保留先前的会话状态不动（见 DESIGN.md 的开放问题决定）。
pub async fn login(ctx: &AuthContext, email: String, password: String) -> Result<(), AuthError> {
    let api = ApiClient::new(api_base(), None);
    let response = api
        .login(&LoginRequest { email, password })
        .await
        .map_err(|err| AuthError::from_api(err, "Login failed"))?;

    LocalStorage::set(STORAGE_TOKEN_KEY, &response.token);
    ctx.set_state.update(|state| {
        state.token = Some(response.token);
        state.user = Some(response.user);
        state.is_loading = false;
    });
    Ok(())
}

/// 注册新账号，成功即登录
pub async fn register(
    ctx: &AuthContext,
    name: String,
    email: String,
    password: String,
    role: Role,
) -> Result<(), AuthError> {
    let api = ApiClient::new(api_base(), None);
    let response = api
        .register(&RegisterRequest {
            name,
            email,
            password,
            role,
        })
        .await
        .map_err(|err| AuthError::from_api(err, "Registration failed"))?;

    LocalStorage::set(STORAGE_TOKEN_KEY, &response.token);
    ctx.set_state.update(|state| {
        state.token = Some(response.token);
        state.user = Some(response.user);
        state.is_loading = false;
    });
    Ok(())
}

/// 注销并清除状态
///
/// 无条件清空内存与持久化凭证，从不失败。
/// 导航由路由服务的守卫监听自动处理。
pub fn logout(ctx: &AuthContext) {
    LocalStorage::delete(STORAGE_TOKEN_KEY);
    ctx.set_state.set(AuthState::cleared());
}

/// 任意请求收到 401 时的全局会话过期处理
///
/// 与具体是哪个控制器触发无关，一律强制回到 UNAUTHENTICATED。
pub fn expire_session(ctx: &AuthContext) {
    console::warn("[Auth] Session expired (401), forcing logout.");
    logout(ctx);
}

// =========================================================
// 表单校验（纯函数，进网络前执行）
// =========================================================

/// 注册/改密的密码校验，错误文案与后端团队约定一致
pub fn validate_password(password: &str, confirm: &str) -> Result<(), String> {
    if password != confirm {
        return Err("Passwords do not match".to_string());
    }
    if password.chars().count() < 6 {
        return Err("Password must be at least 6 characters long".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(role: Role) -> UserProfile {
        UserProfile {
            id: "u1".to_string(),
            name: "Asha".to_string(),
            email: "asha@example.com".to_string(),
            role,
            avatar: None,
            department: None,
            phone: None,
        }
    }

    // =========================================================
    // 状态快照测试
    // =========================================================

    #[test]
    fn guard_snapshot_follows_user() {
        let mut state = AuthState::default();
        assert!(!state.is_authenticated());
        assert_eq!(state.guard().role, None);

        state.user = Some(profile(Role::Admin));
        state.token = Some("jwt".to_string());
        assert!(state.is_authenticated());
        assert_eq!(state.guard().role, Some(Role::Admin));
        assert!(!state.guard().is_loading);
    }

    #[test]
    fn cleared_state_is_idempotent() {
        let once = AuthState::cleared();
        assert_eq!(once, AuthState::cleared());
        assert!(once.user.is_none());
        assert!(once.token.is_none());
        assert!(!once.is_loading);
    }

    // =========================================================
    // 密码校验测试
    // =========================================================

    #[test]
    fn mismatched_passwords_rejected_first() {
        // 不匹配优先于长度检查（与原有表单行为一致）
        assert_eq!(
            validate_password("abc", "abd"),
            Err("Passwords do not match".to_string())
        );
    }

    #[test]
    fn short_password_rejected() {
        assert_eq!(
            validate_password("12345", "12345"),
            Err("Password must be at least 6 characters long".to_string())
        );
    }

    #[test]
    fn valid_password_accepted() {
        assert_eq!(validate_password("123456", "123456"), Ok(()));
        assert_eq!(validate_password("secret-pass", "secret-pass"), Ok(()));
    }
}
