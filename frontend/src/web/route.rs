//! 路由定义模块 - 领域模型
//!
//! 这是纯粹的业务逻辑层，不依赖于 DOM 或 web_sys。
//! 定义了应用的所有路由、其访问要求，以及守卫判定。

use std::fmt::Display;

use nexcrm_shared::Role;

/// 应用路由枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppRoute {
    /// 登录页面 (默认路由)
    #[default]
    Login,
    /// 注册页面
    Register,
    /// 仪表盘 (需要认证)
    Dashboard,
    /// 联系人管理 (需要认证)
    Contacts,
    /// 销售线索 (需要认证)
    Leads,
    /// 线索分析 (需要认证)
    Analytics,
    /// 任务与跟进 (需要认证)
    Tasks,
    /// 个人资料 (需要认证)
    Profile,
    /// 用户管理 (仅管理员)
    Users,
    /// 页面未找到
    NotFound,
}

impl AppRoute {
    /// 将 URL path 解析为路由枚举
    pub fn from_path(path: &str) -> Self {
        match path {
            "/" | "/login" => Self::Login,
            "/register" => Self::Register,
            "/dashboard" => Self::Dashboard,
            "/contacts" => Self::Contacts,
            "/leads" => Self::Leads,
            "/analytics" => Self::Analytics,
            "/tasks" => Self::Tasks,
            "/profile" => Self::Profile,
            "/users" => Self::Users,
            _ => Self::NotFound,
        }
    }

    /// 获取路由对应的 URL path
    pub fn to_path(&self) -> &'static str {
        match self {
            Self::Login => "/",
            Self::Register => "/register",
            Self::Dashboard => "/dashboard",
            Self::Contacts => "/contacts",
            Self::Leads => "/leads",
            Self::Analytics => "/analytics",
            Self::Tasks => "/tasks",
            Self::Profile => "/profile",
            Self::Users => "/users",
            Self::NotFound => "/404",
        }
    }

    /// **核心守卫逻辑：定义该路由是否需要认证**
    pub fn requires_auth(&self) -> bool {
        !matches!(self, Self::Login | Self::Register | Self::NotFound)
    }

    /// 该路由要求的角色（在认证之上）
    pub fn required_role(&self) -> Option<Role> {
        match self {
            Self::Users => Some(Role::Admin),
            _ => None,
        }
    }

    /// 定义已认证用户是否应该离开此路由（如登录/注册页）
    pub fn should_redirect_when_authenticated(&self) -> bool {
        matches!(self, Self::Login | Self::Register)
    }

    /// 获取认证失败时的重定向目标
    pub fn auth_failure_redirect() -> Self {
        Self::Login
    }

    /// 获取认证成功时的重定向目标（从登录/注册页，或角色不足时）
    pub fn auth_success_redirect() -> Self {
        Self::Dashboard
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

// =========================================================
// 守卫判定
// =========================================================

/// 注入路由服务的会话快照
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GuardState {
    /// 持久化凭证仍在向后端求证（RESOLVING）
    pub is_loading: bool,
    /// 已认证用户的角色；未认证时为 None
    pub role: Option<Role>,
}

impl GuardState {
    pub fn is_authenticated(&self) -> bool {
        self.role.is_some()
    }
}

/// 守卫判定结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// 放行
    Allow,
    /// 重定向到指定路由
    Redirect(AppRoute),
    /// 凭证求证中：暂不重定向，由页面渲染加载占位
    Defer,
}

/// 对一次导航执行守卫判定
///
/// 求证期间不重定向，避免持久化凭证验证完成前的闪跳。
pub fn check(route: AppRoute, guard: &GuardState) -> GuardDecision {
    if guard.is_loading {
        return GuardDecision::Defer;
    }

    if route.requires_auth() && !guard.is_authenticated() {
        return GuardDecision::Redirect(AppRoute::auth_failure_redirect());
    }

    if let Some(required) = route.required_role() {
        if guard.role != Some(required) {
            return GuardDecision::Redirect(AppRoute::auth_success_redirect());
        }
    }

    if route.should_redirect_when_authenticated() && guard.is_authenticated() {
        return GuardDecision::Redirect(AppRoute::auth_success_redirect());
    }

    GuardDecision::Allow
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anonymous() -> GuardState {
        GuardState {
            is_loading: false,
            role: None,
        }
    }

    fn logged_in(role: Role) -> GuardState {
        GuardState {
            is_loading: false,
            role: Some(role),
        }
    }

    #[test]
    fn path_round_trip() {
        for route in [
            AppRoute::Register,
            AppRoute::Dashboard,
            AppRoute::Contacts,
            AppRoute::Leads,
            AppRoute::Analytics,
            AppRoute::Tasks,
            AppRoute::Profile,
            AppRoute::Users,
        ] {
            assert_eq!(AppRoute::from_path(route.to_path()), route);
        }
        // 登录页有两个入口路径
        assert_eq!(AppRoute::from_path("/"), AppRoute::Login);
        assert_eq!(AppRoute::from_path("/login"), AppRoute::Login);
        assert_eq!(AppRoute::from_path("/does-not-exist"), AppRoute::NotFound);
    }

    #[test]
    fn protected_routes_redirect_anonymous_to_login() {
        for route in [AppRoute::Dashboard, AppRoute::Contacts, AppRoute::Users] {
            assert_eq!(
                check(route, &anonymous()),
                GuardDecision::Redirect(AppRoute::Login)
            );
        }
        assert_eq!(check(AppRoute::Login, &anonymous()), GuardDecision::Allow);
        assert_eq!(check(AppRoute::Register, &anonymous()), GuardDecision::Allow);
    }

    #[test]
    fn users_route_requires_admin() {
        assert_eq!(
            check(AppRoute::Users, &logged_in(Role::User)),
            GuardDecision::Redirect(AppRoute::Dashboard)
        );
        assert_eq!(check(AppRoute::Users, &logged_in(Role::Admin)), GuardDecision::Allow);
    }

    #[test]
    fn authenticated_users_leave_auth_pages() {
        assert_eq!(
            check(AppRoute::Login, &logged_in(Role::User)),
            GuardDecision::Redirect(AppRoute::Dashboard)
        );
        assert_eq!(
            check(AppRoute::Register, &logged_in(Role::Admin)),
            GuardDecision::Redirect(AppRoute::Dashboard)
        );
        assert_eq!(check(AppRoute::Contacts, &logged_in(Role::User)), GuardDecision::Allow);
    }

    #[test]
    fn resolving_defers_every_decision() {
        let resolving = GuardState {
            is_loading: true,
            role: None,
        };
        for route in [AppRoute::Login, AppRoute::Dashboard, AppRoute::Users] {
            assert_eq!(check(route, &resolving), GuardDecision::Defer);
        }
    }
}
