//! 资源列表控制器
//!
//! Contacts / Leads / Users 三个服务端资源共用的视图状态管理：
//! 分页、过滤、加载中标记，以及两条全局策略——
//!
//! 1. **请求围栏**：每次发起列表请求领取单调递增的序号，
//!    响应返回时序号已过期则直接丢弃，晚到的旧响应永远不会
//!    覆盖新状态。
//! 2. **401 拦截**：任何请求返回 401 即触发全局会话过期，
//!    与具体控制器无关。
//!
//! 变更（新建/更新/删除）成功后由调用方重新拉取列表，
//! 不做乐观更新。

use std::future::Future;

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::ApiError;
use crate::auth::{AuthContext, expire_session};
use crate::web::console;

/// 一页列表数据
#[derive(Debug, Clone, PartialEq)]
pub struct PageData<T> {
    pub items: Vec<T>,
    pub total_pages: u32,
}

/// 通用列表控制器
///
/// 全部字段为 `RwSignal`，结构体实现 `Copy`，方便在闭包间传递。
pub struct ListController<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub items: RwSignal<Vec<T>>,
    pub loading: RwSignal<bool>,
    /// 最近一次失败的用户可读描述；成功加载后清空
    pub error: RwSignal<Option<String>>,
    pub page: RwSignal<u32>,
    pub total_pages: RwSignal<u32>,
    /// 请求围栏序号：最近一次发出的请求
    seq: RwSignal<u64>,
}

// 手写 Clone/Copy：`#[derive]` 会附加多余的 `T: Copy` 约束，
// 而字段全为 `RwSignal`（对任意 T 均为 Copy），故与 T 无关恒为 Copy。
impl<T> Clone for ListController<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ListController<T> where T: Clone + Send + Sync + 'static {}

impl<T> ListController<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            items: RwSignal::new(Vec::new()),
            loading: RwSignal::new(true),
            error: RwSignal::new(None),
            page: RwSignal::new(1),
            total_pages: RwSignal::new(1),
            seq: RwSignal::new(0),
        }
    }

    /// 发起一次列表加载
    ///
    /// # Arguments
    /// * `ctx` - 会话上下文（401 时触发全局过期）
    /// * `label` - 资源名，用于日志与错误文案
    /// * `fetch` - 实际的请求 future
    pub fn load<Fut>(self, ctx: AuthContext, label: &'static str, fetch: Fut)
    where
        Fut: Future<Output = Result<PageData<T>, ApiError>> + 'static,
    {
        let ticket = self.seq.get_untracked() + 1;
        self.seq.set(ticket);
        self.loading.set(true);

        spawn_local(async move {
            let result = fetch.await;
            self.settle(ctx, label, ticket, result);
        });
    }

    /// 应用一次已完成的请求结果
    fn settle(
        self,
        ctx: AuthContext,
        label: &'static str,
        ticket: u64,
        result: Result<PageData<T>, ApiError>,
    ) {
        // 围栏：期间又发出了新请求，本响应作废。
        // 加载标记留给最新的请求去清。
        if self.seq.get_untracked() != ticket {
            console::log(&format!("[{label}] Discarding stale list response."));
            return;
        }

        match result {
            Ok(data) => {
                self.items.set(data.items);
                self.total_pages.set(data.total_pages.max(1));
                self.error.set(None);
            }
            Err(err) if err.is_unauthorized() => {
                expire_session(&ctx);
            }
            Err(err) => {
                console::error(&format!("[{label}] List fetch failed: {err}"));
                // 列表与分页保持上一次成功的值
                self.error.set(Some(format!("Failed to load {label}: {err}")));
            }
        }
        self.loading.set(false);
    }
}

impl<T> Default for ListController<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

/// 删除确认门：弹出浏览器确认框
///
/// 未确认（或无 window 的宿主环境）一律返回 false，
/// 调用方此时不得发出 DELETE。
pub fn confirm(message: &str) -> bool {
    #[cfg(target_arch = "wasm32")]
    {
        web_sys::window()
            .and_then(|w| w.confirm_with_message(message).ok())
            .unwrap_or(false)
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = message;
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthContext;

    fn controller() -> ListController<String> {
        ListController::new()
    }

    fn page(items: &[&str], total_pages: u32) -> PageData<String> {
        PageData {
            items: items.iter().map(|s| s.to_string()).collect(),
            total_pages,
        }
    }

    // =========================================================
    // 请求围栏测试
    // =========================================================

    #[test]
    fn fresh_response_is_applied() {
        let ctrl = controller();
        let ctx = AuthContext::new();
        ctrl.seq.set(1);

        ctrl.settle(ctx, "contacts", 1, Ok(page(&["a", "b"], 3)));

        assert_eq!(ctrl.items.get_untracked(), vec!["a", "b"]);
        assert_eq!(ctrl.total_pages.get_untracked(), 3);
        assert!(!ctrl.loading.get_untracked());
        assert_eq!(ctrl.error.get_untracked(), None);
    }

    #[test]
    fn stale_response_is_discarded() {
        let ctrl = controller();
        let ctx = AuthContext::new();

        // 请求 1 发出后，请求 2 先完成
        ctrl.seq.set(2);
        ctrl.settle(ctx, "contacts", 2, Ok(page(&["newer"], 2)));
        // 请求 1 姗姗来迟
        ctrl.settle(ctx, "contacts", 1, Ok(page(&["older"], 9)));

        assert_eq!(ctrl.items.get_untracked(), vec!["newer"]);
        assert_eq!(ctrl.total_pages.get_untracked(), 2);
    }

    #[test]
    fn failure_keeps_previous_items() {
        let ctrl = controller();
        let ctx = AuthContext::new();
        ctrl.seq.set(1);
        ctrl.settle(ctx, "leads", 1, Ok(page(&["kept"], 4)));

        ctrl.seq.set(2);
        ctrl.settle(
            ctx,
            "leads",
            2,
            Err(ApiError::Network("connection refused".to_string())),
        );

        // 上一次成功的数据原样保留
        assert_eq!(ctrl.items.get_untracked(), vec!["kept"]);
        assert_eq!(ctrl.total_pages.get_untracked(), 4);
        let message = ctrl.error.get_untracked().unwrap();
        assert!(message.contains("leads"));
    }

    #[test]
    fn unauthorized_expires_the_session() {
        let ctrl = controller();
        let ctx = AuthContext::new();
        ctx.set_state.update(|state| {
            state.token = Some("jwt".to_string());
            state.is_loading = false;
        });

        ctrl.seq.set(1);
        ctrl.settle(
            ctx,
            "users",
            1,
            Err(ApiError::Status {
                status: 401,
                message: "Token expired".to_string(),
            }),
        );

        let state = ctx.state.get_untracked();
        assert!(state.token.is_none());
        assert!(state.user.is_none());
        // 401 不算普通错误，不往横幅里塞文案
        assert_eq!(ctrl.error.get_untracked(), None);
    }

    #[test]
    fn zero_total_pages_clamps_to_one() {
        let ctrl = controller();
        let ctx = AuthContext::new();
        ctrl.seq.set(1);
        ctrl.settle(ctx, "contacts", 1, Ok(page(&[], 0)));
        assert_eq!(ctrl.total_pages.get_untracked(), 1);
    }

    #[test]
    fn unconfirmed_delete_gate_is_closed() {
        // 宿主环境没有确认框，视为用户取消
        assert!(!confirm("Are you sure you want to delete this contact?"));
    }
}
