//! NexCRM 前端应用
//!
//! 采用 Context-Driven 的高内聚低耦合架构：
//! - `web::route`: 路由定义（领域模型，含守卫规则）
//! - `web::router`: 路由服务（核心引擎）
//! - `auth`: 会话状态管理
//! - `api`: 带凭证的 HTTP 客户端
//! - `controller`: 资源列表控制器（分页/过滤/请求围栏）
//! - `local`: 仅存于浏览器本地的任务与提醒
//! - `components`: UI 组件层

mod api;
mod auth;
mod controller;
mod local;
mod serde_helper;

mod components {
    pub mod analytics;
    pub mod contact_dialog;
    pub mod contacts;
    pub mod dashboard;
    mod icons;
    pub mod layout;
    pub mod lead_dialog;
    pub mod leads;
    pub mod login;
    pub mod pagination;
    pub mod profile;
    pub mod register;
    pub mod task_manager;
    pub mod tasks;
    pub mod toast;
    pub mod users;
}

use crate::auth::{AuthContext, init_auth};
use crate::components::analytics::AnalyticsPage;
use crate::components::contacts::ContactsPage;
use crate::components::dashboard::DashboardPage;
use crate::components::layout::AppShell;
use crate::components::leads::LeadsPage;
use crate::components::login::LoginPage;
use crate::components::profile::ProfilePage;
use crate::components::register::RegisterPage;
use crate::components::tasks::TasksPage;
use crate::components::users::UsersPage;

use leptos::prelude::*;

// 原生 Web API 封装模块
// 此模块提供对浏览器原生 API 的轻量级封装，
// 以减小 WASM 二进制体积。
pub(crate) mod web {
    pub mod console;
    pub mod route;
    pub mod router;
    mod storage;

    pub use storage::LocalStorage;
}

use web::route::AppRoute;
use web::router::{Router, RouterOutlet};

/// 路由匹配函数
///
/// 根据 AppRoute 枚举返回对应的视图组件。
/// 受保护页面统一包在侧边栏 + 顶栏外壳里。
fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Login => view! { <LoginPage /> }.into_any(),
        AppRoute::Register => view! { <RegisterPage /> }.into_any(),
        AppRoute::Dashboard => view! { <AppShell><DashboardPage /></AppShell> }.into_any(),
        AppRoute::Contacts => view! { <AppShell><ContactsPage /></AppShell> }.into_any(),
        AppRoute::Leads => view! { <AppShell><LeadsPage /></AppShell> }.into_any(),
        AppRoute::Analytics => view! { <AppShell><AnalyticsPage /></AppShell> }.into_any(),
        AppRoute::Tasks => view! { <AppShell><TasksPage /></AppShell> }.into_any(),
        AppRoute::Profile => view! { <AppShell><ProfilePage /></AppShell> }.into_any(),
        AppRoute::Users => view! { <AppShell><UsersPage /></AppShell> }.into_any(),
        AppRoute::NotFound => view! {
            <div class="flex items-center justify-center min-h-screen bg-base-200">
                <div class="text-center">
                    <h1 class="text-6xl font-bold text-error">"404"</h1>
                    <p class="text-xl mt-4">"Page not found"</p>
                </div>
            </div>
        }
        .into_any(),
    }
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 创建会话上下文
    let auth_ctx = AuthContext::new();
    provide_context(auth_ctx);

    // 2. 初始化会话（读取持久化凭证并向后端求证）
    init_auth(&auth_ctx);

    // 3. 获取守卫信号，用于注入路由服务（解耦！）
    let guard = auth_ctx.guard_signal();

    view! {
        // 4. 路由器组件：注入守卫信号实现访问控制
        <Router guard=guard>
            <RouterOutlet matcher=route_matcher />
        </Router>
    }
}
