//! 登录页面

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::auth::{login, use_auth};
use crate::components::icons::{Eye, TrendingUp};
use crate::web::router::use_router;

#[component]
pub fn LoginPage() -> impl IntoView {
    let ctx = use_auth();
    let router = use_router();
    let auth_state = ctx.state;

    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (show_password, set_show_password) = signal(false);
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    // 凭证求证期间先渲染加载占位，避免闪跳
    let is_loading = move || auth_state.get().is_loading;

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        if email.get().is_empty() || password.get().is_empty() {
            set_error_msg.set(Some("Please fill in all fields".to_string()));
            return;
        }

        set_is_submitting.set(true);
        set_error_msg.set(None);

        spawn_local(async move {
            match login(&ctx, email.get_untracked(), password.get_untracked()).await {
                // 登录成功：守卫监听到会话变化后自动跳转仪表盘
                Ok(()) => {}
                Err(err) => set_error_msg.set(Some(err.to_string())),
            }
            set_is_submitting.set(false);
        });
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
                <div class="hero-content flex-col w-full max-w-md">
                    <div class="text-center mb-4">
                        <div class="flex flex-col items-center gap-2">
                            <div class="p-3 bg-primary/10 rounded-2xl text-primary">
                                <TrendingUp attr:class="h-8 w-8" />
                            </div>
                            <h1 class="text-3xl font-bold">"NexCRM"</h1>
                            <p class="text-base-content/70">"Sign in to manage your pipeline"</p>
                        </div>
                    </div>

                    <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                        <form class="card-body" on:submit=on_submit>
                            <Show when=move || error_msg.get().is_some()>
                                <div role="alert" class="alert alert-error text-sm py-2">
                                    <span>{move || error_msg.get().unwrap_or_default()}</span>
                                </div>
                            </Show>

                            <div class="form-control">
                                <label class="label" for="email">
                                    <span class="label-text">"Email"</span>
                                </label>
                                <input
                                    id="email"
                                    type="email"
                                    placeholder="you@company.com"
                                    on:input=move |ev| set_email.set(event_target_value(&ev))
                                    prop:value=email
                                    class="input input-bordered"
                                    required
                                />
                            </div>
                            <div class="form-control">
                                <label class="label" for="password">
                                    <span class="label-text">"Password"</span>
                                </label>
                                <div class="join w-full">
                                    <input
                                        id="password"
                                        type=move || if show_password.get() { "text" } else { "password" }
                                        placeholder="••••••••"
                                        on:input=move |ev| set_password.set(event_target_value(&ev))
                                        prop:value=password
                                        class="input input-bordered join-item w-full"
                                        required
                                    />
                                    <button
                                        type="button"
                                        class="btn btn-ghost join-item"
                                        on:click=move |_| set_show_password.update(|v| *v = !*v)
                                    >
                                        <Eye attr:class="h-4 w-4" />
                                    </button>
                                </div>
                            </div>
                            <div class="form-control mt-6">
                                <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                    {move || {
                                        if is_submitting.get() {
                                            view! {
                                                <span class="loading loading-spinner"></span>
                                                "Signing in..."
                                            }
                                                .into_any()
                                        } else {
                                            "Sign In".into_any()
                                        }
                                    }}
                                </button>
                            </div>
                            <p class="text-center text-sm text-base-content/70 mt-2">
                                "Don't have an account? "
                                <a
                                    class="link link-primary"
                                    on:click=move |_| router.navigate("/register")
                                >
                                    "Sign up"
                                </a>
                            </p>
                        </form>
                    </div>
                </div>
            </div>
        </Show>
    }
}
