//! 用户管理页面（仅管理员路由可达）
//!
//! 角色调整直接在行内下拉完成；删除带不可恢复确认。

use leptos::prelude::*;
use leptos::task::spawn_local;

use nexcrm_shared::protocol::ListQuery;
use nexcrm_shared::{Role, UserProfile};

use crate::auth::{expire_session, use_auth};
use crate::components::icons::*;
use crate::components::pagination::Pagination;
use crate::components::toast::Toast;
use crate::controller::{ListController, PageData, confirm};

#[component]
pub fn UsersPage() -> impl IntoView {
    let ctx = use_auth();
    let auth_state = ctx.state;

    let ctrl: ListController<UserProfile> = ListController::new();
    let (search_term, set_search_term) = signal(String::new());
    let refresh = RwSignal::new(0u32);
    let notification = RwSignal::new(Option::<(String, bool)>::None);

    Effect::new(move |_| {
        let state = auth_state.get();
        refresh.track();
        let query = ListQuery {
            page: ctrl.page.get(),
            search: search_term.get(),
            ..ListQuery::default()
        };
        if state.is_loading || !state.is_authenticated() {
            return;
        }
        let api = state.api();
        ctrl.load(ctx, "users", async move {
            api.list_users(query).await.map(|resp| PageData {
                items: resp.users,
                total_pages: resp.total_pages,
            })
        });
    });

    let handle_role_update = move |id: String, role: Role| {
        let api = auth_state.get_untracked().api();
        spawn_local(async move {
            match api.update_user_role(id, role).await {
                Ok(()) => {
                    notification.set(Some(("User role updated".to_string(), false)));
                    refresh.update(|n| *n += 1);
                }
                Err(err) if err.is_unauthorized() => expire_session(&ctx),
                Err(err) => {
                    notification.set(Some((format!("Failed to update role: {err}"), true)));
                }
            }
        });
    };

    let handle_delete = move |id: String| {
        if !confirm("Are you sure you want to delete this user? This action cannot be undone.") {
            return;
        }
        let api = auth_state.get_untracked().api();
        spawn_local(async move {
            match api.delete_user(id).await {
                Ok(()) => {
                    notification.set(Some(("User deleted".to_string(), false)));
                    refresh.update(|n| *n += 1);
                }
                Err(err) if err.is_unauthorized() => expire_session(&ctx),
                Err(err) => {
                    notification.set(Some((format!("Failed to delete user: {err}"), true)));
                }
            }
        });
    };

    // 当前登录管理员自己的行不允许自删
    let my_id = move || {
        auth_state
            .get()
            .user
            .map(|user| user.id)
            .unwrap_or_default()
    };

    let admin_count = move || {
        ctrl.items
            .with(|users| users.iter().filter(|u| u.role == Role::Admin).count())
    };
    let member_count = move || {
        ctrl.items
            .with(|users| users.iter().filter(|u| u.role == Role::User).count())
    };
    let is_empty = move || ctrl.items.with(|items| items.is_empty());

    view! {
        <div class="max-w-7xl mx-auto space-y-6">
            <Toast message=notification />

            <div>
                <h1 class="text-2xl font-bold">"User Management"</h1>
                <p class="text-base-content/70">"Manage accounts and roles across your team"</p>
            </div>

            <Show when=move || ctrl.error.get().is_some()>
                <div role="alert" class="alert alert-error text-sm py-2">
                    <span>{move || ctrl.error.get().unwrap_or_default()}</span>
                </div>
            </Show>

            <div class="stats shadow w-full stats-vertical md:stats-horizontal bg-base-100">
                <div class="stat">
                    <div class="stat-figure text-primary">
                        <Shield attr:class="h-8 w-8" />
                    </div>
                    <div class="stat-title">"Administrators"</div>
                    <div class="stat-value text-primary">{admin_count}</div>
                </div>
                <div class="stat">
                    <div class="stat-figure text-secondary">
                        <UserIcon attr:class="h-8 w-8" />
                    </div>
                    <div class="stat-title">"Members"</div>
                    <div class="stat-value text-secondary">{member_count}</div>
                </div>
            </div>

            <div class="card bg-base-100 shadow-xl">
                <div class="card-body p-0">
                    <div class="flex flex-wrap items-center justify-between gap-3 p-6 pb-2">
                        <h3 class="card-title">
                            <UsersIcon attr:class="h-5 w-5" /> "All Users"
                        </h3>
                        <label class="input input-bordered input-sm flex items-center gap-2">
                            <Search attr:class="h-4 w-4 opacity-50" />
                            <input
                                type="text"
                                class="grow"
                                placeholder="Search users..."
                                on:input=move |ev| set_search_term.set(event_target_value(&ev))
                                prop:value=search_term
                            />
                        </label>
                    </div>

                    <div class="overflow-x-auto w-full">
                        <table class="table table-zebra w-full">
                            <thead>
                                <tr>
                                    <th>"User"</th>
                                    <th class="hidden md:table-cell">"Department"</th>
                                    <th>"Role"</th>
                                    <th></th>
                                </tr>
                            </thead>
                            <tbody>
                                <Show when=move || ctrl.loading.get() && is_empty()>
                                    <tr>
                                        <td colspan="4" class="text-center py-8 text-base-content/50">
                                            <span class="loading loading-spinner loading-md"></span>
                                            " Loading..."
                                        </td>
                                    </tr>
                                </Show>
                                <Show when=move || !ctrl.loading.get() && is_empty()>
                                    <tr>
                                        <td colspan="4" class="text-center py-8 text-base-content/50">
                                            "No users match this search."
                                        </td>
                                    </tr>
                                </Show>
                                <For
                                    each=move || ctrl.items.get()
                                    key=|user| user.id.clone()
                                    children=move |user| {
                                        let id = user.id.clone();
                                        let role_id = user.id.clone();
                                        let self_id = user.id.clone();
                                        let current_role = user.role;
                                        let is_self = move || my_id() == self_id;
                                        view! {
                                            <tr>
                                                <td>
                                                    <div class="font-semibold">{user.name.clone()}</div>
                                                    <div class="flex items-center gap-1 text-xs opacity-60">
                                                        <Mail attr:class="h-3 w-3" />
                                                        {user.email.clone()}
                                                    </div>
                                                </td>
                                                <td class="hidden md:table-cell">
                                                    {user.department.clone().unwrap_or_else(|| "—".to_string())}
                                                </td>
                                                <td>
                                                    <select
                                                        class=move || {
                                                            if current_role == Role::Admin {
                                                                "select select-bordered select-sm text-primary"
                                                            } else {
                                                                "select select-bordered select-sm"
                                                            }
                                                        }
                                                        on:change=move |ev| {
                                                            handle_role_update(
                                                                role_id.clone(),
                                                                Role::from_value(&event_target_value(&ev)),
                                                            )
                                                        }
                                                    >
                                                        {Role::ALL
                                                            .into_iter()
                                                            .map(|role| {
                                                                view! {
                                                                    <option
                                                                        value=role.as_str()
                                                                        selected=current_role == role
                                                                    >
                                                                        {role.label()}
                                                                    </option>
                                                                }
                                                            })
                                                            .collect_view()}
                                                    </select>
                                                </td>
                                                <td>
                                                    <button
                                                        class="btn btn-ghost btn-sm btn-square text-error"
                                                        disabled=is_self
                                                        on:click=move |_| handle_delete(id.clone())
                                                    >
                                                        <Trash2 attr:class="h-4 w-4" />
                                                    </button>
                                                </td>
                                            </tr>
                                        }
                                    }
                                />
                            </tbody>
                        </table>
                    </div>

                    <Pagination page=ctrl.page total_pages=ctrl.total_pages />
                </div>
            </div>
        </div>
    }
}
