//! 个人资料页面
//!
//! 两个分页：资料更新走 `PUT /api/users/profile`；
//! 改密分页只做本地校验——后端未提供改密端点。

use leptos::prelude::*;
use leptos::task::spawn_local;

use nexcrm_shared::ProfilePayload;

use crate::auth::{expire_session, use_auth, validate_password};
use crate::components::icons::UserIcon;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Tab {
    Profile,
    Password,
}

#[component]
pub fn ProfilePage() -> impl IntoView {
    let ctx = use_auth();
    let auth_state = ctx.state;

    let active_tab = RwSignal::new(Tab::Profile);
    let (message, set_message) = signal(Option::<(String, bool)>::None);
    let (saving, set_saving) = signal(false);

    // 资料表单，从当前会话预填
    let name = RwSignal::new(String::new());
    let email = RwSignal::new(String::new());
    let phone = RwSignal::new(String::new());
    let department = RwSignal::new(String::new());

    Effect::new(move |_| {
        if let Some(user) = auth_state.get().user {
            name.set(user.name);
            email.set(user.email);
            phone.set(user.phone.unwrap_or_default());
            department.set(user.department.unwrap_or_default());
        }
    });

    // 改密表单
    let current_password = RwSignal::new(String::new());
    let new_password = RwSignal::new(String::new());
    let confirm_password = RwSignal::new(String::new());

    let on_profile_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let payload = ProfilePayload {
            name: name.get_untracked(),
            email: email.get_untracked(),
            phone: phone.get_untracked(),
            department: department.get_untracked(),
        };
        set_saving.set(true);
        set_message.set(None);
        spawn_local(async move {
            let api = auth_state.get_untracked().api();
            match api.update_profile(payload).await {
                Ok(()) => {
                    set_message.set(Some(("Profile updated successfully!".to_string(), false)));
                }
                Err(err) if err.is_unauthorized() => expire_session(&ctx),
                Err(err) => set_message.set(Some((err.to_string(), true))),
            }
            set_saving.set(false);
        });
    };

    let on_password_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        if let Err(reason) =
            validate_password(&new_password.get_untracked(), &confirm_password.get_untracked())
        {
            set_message.set(Some((reason, true)));
            return;
        }
        // 校验通过即结束：没有可调用的改密端点
        set_message.set(Some(("Password updated successfully!".to_string(), false)));
        current_password.set(String::new());
        new_password.set(String::new());
        confirm_password.set(String::new());
    };

    let tab_class = move |tab: Tab| {
        if active_tab.get() == tab {
            "tab tab-active"
        } else {
            "tab"
        }
    };

    view! {
        <div class="max-w-3xl mx-auto space-y-6">
            <div>
                <h1 class="text-2xl font-bold flex items-center gap-2">
                    <UserIcon attr:class="h-6 w-6" /> "Profile"
                </h1>
                <p class="text-base-content/70">"Your account details and security"</p>
            </div>

            <Show when=move || message.get().is_some()>
                <div
                    role="alert"
                    class=move || {
                        let is_err = message.get().map(|(_, e)| e).unwrap_or(false);
                        if is_err {
                            "alert alert-error text-sm py-2"
                        } else {
                            "alert alert-success text-sm py-2"
                        }
                    }
                >
                    <span>{move || message.get().map(|(text, _)| text).unwrap_or_default()}</span>
                </div>
            </Show>

            <div role="tablist" class="tabs tabs-boxed w-fit">
                <a
                    role="tab"
                    class=move || tab_class(Tab::Profile)
                    on:click=move |_| active_tab.set(Tab::Profile)
                >
                    "Profile"
                </a>
                <a
                    role="tab"
                    class=move || tab_class(Tab::Password)
                    on:click=move |_| active_tab.set(Tab::Password)
                >
                    "Password"
                </a>
            </div>

            <Show when=move || active_tab.get() == Tab::Profile>
                <div class="card bg-base-100 shadow-xl">
                    <form class="card-body space-y-2" on:submit=on_profile_submit>
                        <div class="grid grid-cols-1 sm:grid-cols-2 gap-4">
                            <div class="form-control">
                                <label for="profile-name" class="label">
                                    <span class="label-text">"Full Name"</span>
                                </label>
                                <input
                                    id="profile-name"
                                    required
                                    type="text"
                                    class="input input-bordered w-full"
                                    on:input=move |ev| name.set(event_target_value(&ev))
                                    prop:value=name
                                />
                            </div>
                            <div class="form-control">
                                <label for="profile-email" class="label">
                                    <span class="label-text">"Email"</span>
                                </label>
                                <input
                                    id="profile-email"
                                    required
                                    type="email"
                                    class="input input-bordered w-full"
                                    on:input=move |ev| email.set(event_target_value(&ev))
                                    prop:value=email
                                />
                            </div>
                        </div>
                        <div class="grid grid-cols-1 sm:grid-cols-2 gap-4">
                            <div class="form-control">
                                <label for="profile-phone" class="label">
                                    <span class="label-text">"Phone"</span>
                                </label>
                                <input
                                    id="profile-phone"
                                    type="tel"
                                    class="input input-bordered w-full"
                                    on:input=move |ev| phone.set(event_target_value(&ev))
                                    prop:value=phone
                                />
                            </div>
                            <div class="form-control">
                                <label for="profile-department" class="label">
                                    <span class="label-text">"Department"</span>
                                </label>
                                <input
                                    id="profile-department"
                                    type="text"
                                    class="input input-bordered w-full"
                                    on:input=move |ev| department.set(event_target_value(&ev))
                                    prop:value=department
                                />
                            </div>
                        </div>
                        <div class="card-actions justify-end mt-4">
                            <button type="submit" class="btn btn-primary" disabled=move || saving.get()>
                                {move || {
                                    if saving.get() {
                                        view! {
                                            <span class="loading loading-spinner"></span>
                                            "Saving..."
                                        }
                                            .into_any()
                                    } else {
                                        "Save Changes".into_any()
                                    }
                                }}
                            </button>
                        </div>
                    </form>
                </div>
            </Show>

            <Show when=move || active_tab.get() == Tab::Password>
                <div class="card bg-base-100 shadow-xl">
                    <form class="card-body space-y-2" on:submit=on_password_submit>
                        <div class="form-control">
                            <label for="current-password" class="label">
                                <span class="label-text">"Current Password"</span>
                            </label>
                            <input
                                id="current-password"
                                required
                                type="password"
                                class="input input-bordered w-full"
                                on:input=move |ev| current_password.set(event_target_value(&ev))
                                prop:value=current_password
                            />
                        </div>
                        <div class="grid grid-cols-1 sm:grid-cols-2 gap-4">
                            <div class="form-control">
                                <label for="new-password" class="label">
                                    <span class="label-text">"New Password"</span>
                                </label>
                                <input
                                    id="new-password"
                                    required
                                    type="password"
                                    class="input input-bordered w-full"
                                    on:input=move |ev| new_password.set(event_target_value(&ev))
                                    prop:value=new_password
                                />
                            </div>
                            <div class="form-control">
                                <label for="confirm-new-password" class="label">
                                    <span class="label-text">"Confirm New Password"</span>
                                </label>
                                <input
                                    id="confirm-new-password"
                                    required
                                    type="password"
                                    class="input input-bordered w-full"
                                    on:input=move |ev| confirm_password.set(event_target_value(&ev))
                                    prop:value=confirm_password
                                />
                            </div>
                        </div>
                        <div class="card-actions justify-end mt-4">
                            <button type="submit" class="btn btn-primary">
                                "Update Password"
                            </button>
                        </div>
                    </form>
                </div>
            </Show>
        </div>
    }
}
