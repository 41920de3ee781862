//! 联系人新建/编辑对话框
//!
//! 表单草稿用 `ContactForm`（RwSignal 结构体，实现 Copy）承载。
//! 提交失败时保持对话框打开并内联展示错误，用户可直接重试，
//! 不必重新填写。

use leptos::prelude::*;
use leptos::task::spawn_local;

use nexcrm_shared::{Contact, ContactPayload, ContactStatus};

use crate::auth::{AuthContext, expire_session, use_auth};
use crate::components::icons::X;

/// 表单状态结构体
///
/// 使用 `RwSignal` 因为它实现了 `Copy` trait，适合在闭包间传递。
#[derive(Clone, Copy)]
struct ContactForm {
    name: RwSignal<String>,
    email: RwSignal<String>,
    phone: RwSignal<String>,
    company: RwSignal<String>,
    position: RwSignal<String>,
    city: RwSignal<String>,
    state: RwSignal<String>,
    status: RwSignal<ContactStatus>,
    notes: RwSignal<String>,
}

impl ContactForm {
    fn new() -> Self {
        Self {
            name: RwSignal::new(String::new()),
            email: RwSignal::new(String::new()),
            phone: RwSignal::new(String::new()),
            company: RwSignal::new(String::new()),
            position: RwSignal::new(String::new()),
            city: RwSignal::new(String::new()),
            state: RwSignal::new(String::new()),
            status: RwSignal::new(ContactStatus::Active),
            notes: RwSignal::new(String::new()),
        }
    }

    /// 重置表单到初始状态
    fn reset(&self) {
        self.name.set(String::new());
        self.email.set(String::new());
        self.phone.set(String::new());
        self.company.set(String::new());
        self.position.set(String::new());
        self.city.set(String::new());
        self.state.set(String::new());
        self.status.set(ContactStatus::Active);
        self.notes.set(String::new());
    }

    /// 以现有联系人填充表单（编辑模式）
    fn fill(&self, contact: &Contact) {
        self.name.set(contact.name.clone());
        self.email.set(contact.email.clone());
        self.phone.set(contact.phone.clone());
        self.company.set(contact.company.clone());
        self.position.set(contact.position.clone());
        self.city.set(contact.address.city.clone());
        self.state.set(contact.address.state.clone());
        self.status.set(contact.status);
        self.notes.set(contact.notes.clone());
    }

    /// 将表单状态转换为 API 请求体
    fn to_payload(&self) -> ContactPayload {
        let mut payload = ContactPayload {
            name: self.name.get(),
            email: self.email.get(),
            phone: self.phone.get(),
            company: self.company.get(),
            position: self.position.get(),
            status: self.status.get(),
            notes: self.notes.get(),
            ..ContactPayload::default()
        };
        payload.address.city = self.city.get();
        payload.address.state = self.state.get();
        payload
    }
}

#[component]
pub fn ContactDialog(
    open: RwSignal<bool>,
    /// Some(..) 为编辑模式，None 为新建
    editing: RwSignal<Option<Contact>>,
    /// 保存成功后的回调（调用方应重新拉取列表）
    #[prop(into)] on_saved: Callback<()>,
) -> impl IntoView {
    let ctx: AuthContext = use_auth();
    let form = ContactForm::new();
    let (saving, set_saving) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);
    let dialog_ref = NodeRef::<leptos::html::Dialog>::new();

    // 打开时同步原生 dialog 并装载草稿
    Effect::new(move |_| {
        let is_open = open.get();
        if let Some(dialog) = dialog_ref.get() {
            if is_open {
                if !dialog.open() {
                    let _ = dialog.show_modal();
                }
            } else if dialog.open() {
                dialog.close();
            }
        }
        if is_open {
            set_error_msg.set(None);
            match editing.get_untracked() {
                Some(contact) => form.fill(&contact),
                None => form.reset(),
            }
        }
    });

    let close = move || {
        open.set(false);
        editing.set(None);
        form.reset();
    };

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let payload = form.to_payload();
        let editing_id = editing.get_untracked().map(|contact| contact.id);

        set_saving.set(true);
        set_error_msg.set(None);
        spawn_local(async move {
            let api = ctx.state.get_untracked().api();
            let result = match editing_id {
                Some(id) => api.update_contact(id, payload).await.map(|_| ()),
                None => api.create_contact(payload).await.map(|_| ()),
            };
            set_saving.set(false);
            match result {
                Ok(()) => {
                    close();
                    on_saved.run(());
                }
                Err(err) if err.is_unauthorized() => expire_session(&ctx),
                // 失败保持表单打开，内容原样保留
                Err(err) => set_error_msg.set(Some(err.to_string())),
            }
        });
    };

    view! {
        <dialog class="modal" node_ref=dialog_ref on:close=move |_| open.set(false)>
            <div class="modal-box max-w-2xl">
                <div class="flex items-center justify-between">
                    <h3 class="font-bold text-lg">
                        {move || {
                            if editing.get().is_some() { "Edit Contact" } else { "Add New Contact" }
                        }}
                    </h3>
                    <button type="button" class="btn btn-ghost btn-sm btn-square" on:click=move |_| close()>
                        <X attr:class="h-5 w-5" />
                    </button>
                </div>

                <Show when=move || error_msg.get().is_some()>
                    <div role="alert" class="alert alert-error text-sm py-2 mt-2">
                        <span>{move || error_msg.get().unwrap_or_default()}</span>
                    </div>
                </Show>

                <form on:submit=on_submit class="space-y-4 mt-4">
                    <div class="grid grid-cols-2 gap-4">
                        <div class="form-control">
                            <label for="contact-name" class="label">
                                <span class="label-text">"Full Name *"</span>
                            </label>
                            <input
                                id="contact-name"
                                required
                                type="text"
                                on:input=move |ev| form.name.set(event_target_value(&ev))
                                prop:value=form.name
                                class="input input-bordered w-full"
                            />
                        </div>
                        <div class="form-control">
                            <label for="contact-email" class="label">
                                <span class="label-text">"Email *"</span>
                            </label>
                            <input
                                id="contact-email"
                                required
                                type="email"
                                on:input=move |ev| form.email.set(event_target_value(&ev))
                                prop:value=form.email
                                class="input input-bordered w-full"
                            />
                        </div>
                    </div>

                    <div class="grid grid-cols-2 gap-4">
                        <div class="form-control">
                            <label for="contact-phone" class="label">
                                <span class="label-text">"Phone *"</span>
                            </label>
                            <input
                                id="contact-phone"
                                required
                                type="tel"
                                on:input=move |ev| form.phone.set(event_target_value(&ev))
                                prop:value=form.phone
                                class="input input-bordered w-full"
                            />
                        </div>
                        <div class="form-control">
                            <label for="contact-company" class="label">
                                <span class="label-text">"Company"</span>
                            </label>
                            <input
                                id="contact-company"
                                type="text"
                                on:input=move |ev| form.company.set(event_target_value(&ev))
                                prop:value=form.company
                                class="input input-bordered w-full"
                            />
                        </div>
                    </div>

                    <div class="grid grid-cols-2 gap-4">
                        <div class="form-control">
                            <label for="contact-position" class="label">
                                <span class="label-text">"Position"</span>
                            </label>
                            <input
                                id="contact-position"
                                type="text"
                                on:input=move |ev| form.position.set(event_target_value(&ev))
                                prop:value=form.position
                                class="input input-bordered w-full"
                            />
                        </div>
                        <div class="form-control">
                            <label class="label">
                                <span class="label-text">"Status"</span>
                            </label>
                            <select
                                class="select select-bordered w-full"
                                on:change=move |ev| {
                                    form.status.set(ContactStatus::from_value(&event_target_value(&ev)))
                                }
                            >
                                {ContactStatus::ALL
                                    .into_iter()
                                    .map(|status| {
                                        view! {
                                            <option
                                                value=status.as_str()
                                                selected=move || form.status.get() == status
                                            >
                                                {status.label()}
                                            </option>
                                        }
                                    })
                                    .collect_view()}
                            </select>
                        </div>
                    </div>

                    <div class="grid grid-cols-2 gap-4">
                        <div class="form-control">
                            <label for="contact-city" class="label">
                                <span class="label-text">"City"</span>
                            </label>
                            <input
                                id="contact-city"
                                type="text"
                                on:input=move |ev| form.city.set(event_target_value(&ev))
                                prop:value=form.city
                                class="input input-bordered w-full"
                            />
                        </div>
                        <div class="form-control">
                            <label for="contact-state" class="label">
                                <span class="label-text">"State"</span>
                            </label>
                            <input
                                id="contact-state"
                                type="text"
                                on:input=move |ev| form.state.set(event_target_value(&ev))
                                prop:value=form.state
                                class="input input-bordered w-full"
                            />
                        </div>
                    </div>

                    <div class="form-control">
                        <label for="contact-notes" class="label">
                            <span class="label-text">"Notes"</span>
                        </label>
                        <textarea
                            id="contact-notes"
                            rows="3"
                            placeholder="Additional notes about this contact..."
                            class="textarea textarea-bordered w-full"
                            on:input=move |ev| form.notes.set(event_target_value(&ev))
                            prop:value=form.notes
                        ></textarea>
                    </div>

                    <div class="modal-action">
                        <button type="button" class="btn btn-ghost" on:click=move |_| close()>
                            "Cancel"
                        </button>
                        <button type="submit" disabled=move || saving.get() class="btn btn-primary">
                            {move || {
                                if saving.get() {
                                    view! {
                                        <span class="loading loading-spinner"></span>
                                        "Saving..."
                                    }
                                        .into_any()
                                } else if editing.get().is_some() {
                                    "Update Contact".into_any()
                                } else {
                                    "Add Contact".into_any()
                                }
                            }}
                        </button>
                    </div>
                </form>
            </div>
            <form method="dialog" class="modal-backdrop">
                <button>"close"</button>
            </form>
        </dialog>
    }
}
