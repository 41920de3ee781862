//! 角标通知组件
//!
//! 页面持有 `Option<(文案, 是否错误)>` 信号，本组件负责渲染
//! 与 3 秒后自动清除。

use leptos::prelude::*;
use std::time::Duration;

#[component]
pub fn Toast(
    /// 消息内容, 是否出错
    message: RwSignal<Option<(String, bool)>>,
) -> impl IntoView {
    // 3秒后清除通知
    Effect::new(move |_| {
        if message.get().is_some() {
            set_timeout(move || message.set(None), Duration::from_secs(3));
        }
    });

    view! {
        <Show when=move || message.get().is_some()>
            <div class="toast toast-top toast-end z-50">
                <div class=move || {
                    let is_err = message.get().map(|(_, is_err)| is_err).unwrap_or(false);
                    if is_err {
                        "alert alert-error shadow-lg"
                    } else {
                        "alert alert-success shadow-lg"
                    }
                }>
                    <span>{move || message.get().map(|(text, _)| text).unwrap_or_default()}</span>
                </div>
            </div>
        </Show>
    }
}
