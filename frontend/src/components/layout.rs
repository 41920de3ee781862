//! 应用外壳：侧边导航 + 顶栏
//!
//! 所有受保护页面共用。侧边栏项根据当前路由高亮，
//! 用户管理入口仅对管理员渲染。

use leptos::prelude::*;

use nexcrm_shared::Role;

use crate::auth::{logout, use_auth};
use crate::components::icons::*;
use crate::web::route::AppRoute;
use crate::web::router::use_router;

/// 侧边栏导航项
const NAV_ITEMS: [(AppRoute, &str); 6] = [
    (AppRoute::Dashboard, "Dashboard"),
    (AppRoute::Contacts, "Contacts"),
    (AppRoute::Leads, "Leads"),
    (AppRoute::Analytics, "Analytics"),
    (AppRoute::Tasks, "Tasks"),
    (AppRoute::Profile, "Profile"),
];

fn nav_icon(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Dashboard => view! { <LayoutDashboard attr:class="h-4 w-4" /> }.into_any(),
        AppRoute::Contacts => view! { <UsersIcon attr:class="h-4 w-4" /> }.into_any(),
        AppRoute::Leads => view! { <UserPlus attr:class="h-4 w-4" /> }.into_any(),
        AppRoute::Analytics => view! { <BarChart3 attr:class="h-4 w-4" /> }.into_any(),
        AppRoute::Tasks => view! { <Calendar attr:class="h-4 w-4" /> }.into_any(),
        AppRoute::Users => view! { <Shield attr:class="h-4 w-4" /> }.into_any(),
        _ => view! { <UserIcon attr:class="h-4 w-4" /> }.into_any(),
    }
}

#[component]
pub fn AppShell(children: Children) -> impl IntoView {
    let ctx = use_auth();
    let router = use_router();
    let auth_state = ctx.state;

    let is_admin = move || auth_state.get().role() == Some(Role::Admin);
    let user_name = move || {
        auth_state
            .get()
            .user
            .map(|user| user.name)
            .unwrap_or_default()
    };
    let role_label = move || {
        auth_state
            .get()
            .role()
            .map(|role| role.label())
            .unwrap_or("")
    };

    let on_logout = move |_| {
        // 导航由路由服务的守卫监听自动处理
        logout(&ctx);
    };

    let nav_button = move |route: AppRoute, label: &'static str| {
        view! {
            <li>
                <a
                    class=move || {
                        if router.current_route().get() == route {
                            "active"
                        } else {
                            ""
                        }
                    }
                    on:click=move |_| router.navigate(route.to_path())
                >
                    {nav_icon(route)}
                    {label}
                </a>
            </li>
        }
    };

    view! {
        <div class="flex min-h-screen bg-base-200 font-sans">
            // 侧边栏
            <aside class="w-56 bg-base-100 shadow-xl hidden md:flex flex-col">
                <div class="p-4 flex items-center gap-2 border-b border-base-200">
                    <TrendingUp attr:class="h-6 w-6 text-primary" />
                    <span class="text-xl font-bold">"NexCRM"</span>
                </div>
                <ul class="menu p-2 flex-1">
                    {NAV_ITEMS
                        .into_iter()
                        .map(|(route, label)| nav_button(route, label))
                        .collect_view()}
                    <Show when=is_admin>{move || nav_button(AppRoute::Users, "Users")}</Show>
                </ul>
            </aside>

            // 主区域
            <div class="flex-1 flex flex-col min-w-0">
                <div class="navbar bg-base-100 shadow">
                    <div class="flex-1"></div>
                    <div class="flex-none gap-3 items-center">
                        <div class="text-right hidden sm:block">
                            <div class="font-semibold text-sm">{user_name}</div>
                            <span class="badge badge-ghost badge-sm">{role_label}</span>
                        </div>
                        <button on:click=on_logout class="btn btn-outline btn-error btn-sm gap-2">
                            <LogOut attr:class="h-4 w-4" /> "Logout"
                        </button>
                    </div>
                </div>
                <main class="p-4 md:p-8 flex-1">{children()}</main>
            </div>
        </div>
    }
}
