//! 注册页面
//!
//! 密码规则在进网络前于客户端先行校验（见 `auth::validate_password`）。

use leptos::prelude::*;
use leptos::task::spawn_local;

use nexcrm_shared::Role;

use crate::auth::{register, use_auth, validate_password};
use crate::components::icons::{Shield, UserIcon};
use crate::web::router::use_router;

#[component]
pub fn RegisterPage() -> impl IntoView {
    let ctx = use_auth();
    let router = use_router();
    let auth_state = ctx.state;

    let (name, set_name) = signal(String::new());
    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (confirm_password, set_confirm_password) = signal(String::new());
    let (role, set_role) = signal(Role::User);
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let is_loading = move || auth_state.get().is_loading;

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        set_error_msg.set(None);

        // 校验失败不发出任何网络请求
        if let Err(message) = validate_password(&password.get(), &confirm_password.get()) {
            set_error_msg.set(Some(message));
            return;
        }

        set_is_submitting.set(true);
        spawn_local(async move {
            let result = register(
                &ctx,
                name.get_untracked(),
                email.get_untracked(),
                password.get_untracked(),
                role.get_untracked(),
            )
            .await;
            match result {
                // 注册即登录，守卫自动跳转仪表盘
                Ok(()) => {}
                Err(err) => set_error_msg.set(Some(err.to_string())),
            }
            set_is_submitting.set(false);
        });
    };

    let role_card = move |value: Role, title: &'static str, blurb: &'static str| {
        view! {
            <button
                type="button"
                class=move || {
                    if role.get() == value {
                        "card card-compact border-2 border-primary bg-primary/5 cursor-pointer text-left"
                    } else {
                        "card card-compact border-2 border-base-200 cursor-pointer text-left"
                    }
                }
                on:click=move |_| set_role.set(value)
            >
                <div class="card-body">
                    <div class="flex items-center gap-2 font-semibold">
                        {if value == Role::Admin {
                            view! { <Shield attr:class="h-5 w-5 text-primary" /> }.into_any()
                        } else {
                            view! { <UserIcon attr:class="h-5 w-5 text-primary" /> }.into_any()
                        }}
                        {title}
                    </div>
                    <p class="text-xs text-base-content/60">{blurb}</p>
                </div>
            </button>
        }
    };

    view! {
        <Show
            when=move || !is_loading()
            fallback=|| {
                view! {
                    <div class="flex items-center justify-center min-h-screen">
                        <span class="loading loading-spinner loading-lg text-primary"></span>
                    </div>
                }
            }
        >
            <div class="hero min-h-screen bg-base-200">
                <div class="hero-content flex-col w-full max-w-lg">
                    <div class="text-center mb-2">
                        <h1 class="text-3xl font-bold">"Create your account"</h1>
                        <p class="text-base-content/70 mt-1">"Start tracking contacts and leads in minutes"</p>
                    </div>

                    <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                        <form class="card-body" on:submit=on_submit>
                            <Show when=move || error_msg.get().is_some()>
                                <div role="alert" class="alert alert-error text-sm py-2">
                                    <span>{move || error_msg.get().unwrap_or_default()}</span>
                                </div>
                            </Show>

                            <div class="form-control">
                                <label class="label" for="name">
                                    <span class="label-text">"Full Name"</span>
                                </label>
                                <input
                                    id="name"
                                    type="text"
                                    placeholder="Asha Rao"
                                    on:input=move |ev| set_name.set(event_target_value(&ev))
                                    prop:value=name
                                    class="input input-bordered"
                                    required
                                />
                            </div>
                            <div class="form-control">
                                <label class="label" for="reg-email">
                                    <span class="label-text">"Email"</span>
                                </label>
                                <input
                                    id="reg-email"
                                    type="email"
                                    placeholder="you@company.com"
                                    on:input=move |ev| set_email.set(event_target_value(&ev))
                                    prop:value=email
                                    class="input input-bordered"
                                    required
                                />
                            </div>
                            <div class="grid grid-cols-1 sm:grid-cols-2 gap-4">
                                <div class="form-control">
                                    <label class="label" for="reg-password">
                                        <span class="label-text">"Password"</span>
                                    </label>
                                    <input
                                        id="reg-password"
                                        type="password"
                                        placeholder="Create a password"
                                        on:input=move |ev| set_password.set(event_target_value(&ev))
                                        prop:value=password
                                        class="input input-bordered"
                                        required
                                    />
                                </div>
                                <div class="form-control">
                                    <label class="label" for="reg-confirm">
                                        <span class="label-text">"Confirm Password"</span>
                                    </label>
                                    <input
                                        id="reg-confirm"
                                        type="password"
                                        placeholder="Confirm your password"
                                        on:input=move |ev| set_confirm_password.set(event_target_value(&ev))
                                        prop:value=confirm_password
                                        class="input input-bordered"
                                        required
                                    />
                                </div>
                            </div>

                            <div class="mt-2">
                                <span class="label-text font-semibold">"Choose your role"</span>
                                <div class="grid grid-cols-2 gap-3 mt-2">
                                    {role_card(Role::User, "User", "Perfect for individuals")}
                                    {role_card(Role::Admin, "Admin", "Full system access")}
                                </div>
                            </div>

                            <div class="form-control mt-6">
                                <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                    {move || {
                                        if is_submitting.get() {
                                            view! {
                                                <span class="loading loading-spinner"></span>
                                                "Creating account..."
                                            }
                                                .into_any()
                                        } else {
                                            "Create Account".into_any()
                                        }
                                    }}
                                </button>
                            </div>
                            <p class="text-center text-sm text-base-content/70 mt-2">
                                "Already have an account? "
                                <a class="link link-primary" on:click=move |_| router.navigate("/login")>
                                    "Sign in"
                                </a>
                            </p>
                        </form>
                    </div>
                </div>
            </div>
        </Show>
    }
}
