//! 分页控件
//!
//! 服务端驱动的分页：这里只负责展示与切页，数据重取由
//! 页码信号变化触发。只有一页时不渲染。

use leptos::prelude::*;

#[component]
pub fn Pagination(page: RwSignal<u32>, total_pages: RwSignal<u32>) -> impl IntoView {
    view! {
        <Show when=move || { total_pages.get() > 1 }>
            <div class="join flex justify-center py-4">
                <button
                    class="join-item btn btn-sm"
                    disabled=move || page.get() <= 1
                    on:click=move |_| page.update(|p| *p = p.saturating_sub(1).max(1))
                >
                    "Previous"
                </button>
                {move || {
                    (1..=total_pages.get())
                        .map(|n| {
                            view! {
                                <button
                                    class=move || {
                                        if page.get() == n {
                                            "join-item btn btn-sm btn-primary"
                                        } else {
                                            "join-item btn btn-sm"
                                        }
                                    }
                                    on:click=move |_| page.set(n)
                                >
                                    {n}
                                </button>
                            }
                        })
                        .collect_view()
                }}
                <button
                    class="join-item btn btn-sm"
                    disabled=move || page.get() >= total_pages.get()
                    on:click=move |_| page.update(|p| *p += 1)
                >
                    "Next"
                </button>
            </div>
        </Show>
    }
}
