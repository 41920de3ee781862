//! 线索新建/编辑对话框

use leptos::prelude::*;
use leptos::task::spawn_local;

use nexcrm_shared::{Lead, LeadPayload, LeadSource, LeadStatus};

use crate::auth::{AuthContext, expire_session, use_auth};
use crate::components::icons::X;

/// 线索表单草稿
#[derive(Clone, Copy)]
struct LeadForm {
    name: RwSignal<String>,
    email: RwSignal<String>,
    phone: RwSignal<String>,
    company: RwSignal<String>,
    source: RwSignal<LeadSource>,
    status: RwSignal<LeadStatus>,
    value: RwSignal<f64>,
    probability: RwSignal<u8>,
    expected_close_date: RwSignal<String>,
    notes: RwSignal<String>,
}

impl LeadForm {
    fn new() -> Self {
        Self {
            name: RwSignal::new(String::new()),
            email: RwSignal::new(String::new()),
            phone: RwSignal::new(String::new()),
            company: RwSignal::new(String::new()),
            source: RwSignal::new(LeadSource::Website),
            status: RwSignal::new(LeadStatus::New),
            value: RwSignal::new(0.0),
            probability: RwSignal::new(10),
            expected_close_date: RwSignal::new(String::new()),
            notes: RwSignal::new(String::new()),
        }
    }

    fn reset(&self) {
        self.name.set(String::new());
        self.email.set(String::new());
        self.phone.set(String::new());
        self.company.set(String::new());
        self.source.set(LeadSource::Website);
        self.status.set(LeadStatus::New);
        self.value.set(0.0);
        self.probability.set(10);
        self.expected_close_date.set(String::new());
        self.notes.set(String::new());
    }

    fn fill(&self, lead: &Lead) {
        let payload = LeadPayload::from(lead);
        self.name.set(payload.name);
        self.email.set(payload.email);
        self.phone.set(payload.phone);
        self.company.set(payload.company);
        self.source.set(payload.source);
        self.status.set(payload.status);
        self.value.set(payload.value);
        self.probability.set(payload.probability);
        self.expected_close_date
            .set(payload.expected_close_date.unwrap_or_default());
        self.notes.set(payload.notes);
    }

    fn to_payload(&self) -> LeadPayload {
        let close_date = self.expected_close_date.get();
        LeadPayload {
            name: self.name.get(),
            email: self.email.get(),
            phone: self.phone.get(),
            company: self.company.get(),
            source: self.source.get(),
            status: self.status.get(),
            value: self.value.get().max(0.0),
            probability: self.probability.get().min(100),
            expected_close_date: if close_date.is_empty() {
                None
            } else {
                Some(close_date)
            },
            notes: self.notes.get(),
        }
    }
}

#[component]
pub fn LeadDialog(
    open: RwSignal<bool>,
    editing: RwSignal<Option<Lead>>,
    #[prop(into)] on_saved: Callback<()>,
) -> impl IntoView {
    let ctx: AuthContext = use_auth();
    let form = LeadForm::new();
    let (saving, set_saving) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);
    let dialog_ref = NodeRef::<leptos::html::Dialog>::new();

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
                Some(lead) => form.fill(&lead),
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
        let editing_id = editing.get_untracked().map(|lead| lead.id);

        set_saving.set(true);
        set_error_msg.set(None);
        spawn_local(async move {
            let api = ctx.state.get_untracked().api();
            let result = match editing_id {
                Some(id) => api.update_lead(id, payload).await.map(|_| ()),
                None => api.create_lead(payload).await.map(|_| ()),
            };
            set_saving.set(false);
            match result {
                Ok(()) => {
                    close();
                    on_saved.run(());
                }
                Err(err) if err.is_unauthorized() => expire_session(&ctx),
                Err(err) => set_error_msg.set(Some(err.to_string())),
            }
        });
    };

    view! {
        <dialog class="modal" node_ref=dialog_ref on:close=move |_| open.set(false)>
            <div class="modal-box max-w-2xl">
                <div class="flex items-center justify-between">
                    <h3 class="font-bold text-lg">
                        {move || if editing.get().is_some() { "Edit Lead" } else { "Add New Lead" }}
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
                            <label for="lead-name" class="label">
                                <span class="label-text">"Full Name *"</span>
                            </label>
                            <input
                                id="lead-name"
                                required
                                type="text"
                                on:input=move |ev| form.name.set(event_target_value(&ev))
                                prop:value=form.name
                                class="input input-bordered w-full"
                            />
                        </div>
                        <div class="form-control">
                            <label for="lead-email" class="label">
                                <span class="label-text">"Email *"</span>
                            </label>
                            <input
                                id="lead-email"
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
                            <label for="lead-phone" class="label">
                                <span class="label-text">"Phone *"</span>
                            </label>
                            <input
                                id="lead-phone"
                                required
                                type="tel"
                                on:input=move |ev| form.phone.set(event_target_value(&ev))
                                prop:value=form.phone
                                class="input input-bordered w-full"
                            />
                        </div>
                        <div class="form-control">
                            <label for="lead-company" class="label">
                                <span class="label-text">"Company"</span>
                            </label>
                            <input
                                id="lead-company"
                                type="text"
                                on:input=move |ev| form.company.set(event_target_value(&ev))
                                prop:value=form.company
                                class="input input-bordered w-full"
                            />
                        </div>
                    </div>

                    <div class="grid grid-cols-2 gap-4">
                        <div class="form-control">
                            <label class="label">
                                <span class="label-text">"Source"</span>
                            </label>
                            <select
                                class="select select-bordered w-full"
                                on:change=move |ev| {
                                    form.source.set(LeadSource::from_value(&event_target_value(&ev)))
                                }
                            >
                                {LeadSource::ALL
                                    .into_iter()
                                    .map(|source| {
                                        view! {
                                            <option
                                                value=source.as_str()
                                                selected=move || form.source.get() == source
                                            >
                                                {source.label()}
                                            </option>
                                        }
                                    })
                                    .collect_view()}
                            </select>
                        </div>
                        <div class="form-control">
                            <label class="label">
                                <span class="label-text">"Pipeline Stage"</span>
                            </label>
                            <select
                                class="select select-bordered w-full"
                                on:change=move |ev| {
                                    form.status.set(LeadStatus::from_value(&event_target_value(&ev)))
                                }
                            >
                                {LeadStatus::ALL
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

                    <div class="grid grid-cols-3 gap-4">
                        <div class="form-control">
                            <label for="lead-value" class="label">
                                <span class="label-text">"Value (₹)"</span>
                            </label>
                            <input
                                id="lead-value"
                                type="number"
                                min="0"
                                class="input input-bordered w-full"
                                prop:value=move || form.value.get().to_string()
                                on:input=move |ev| {
                                    if let Ok(value) = event_target_value(&ev).parse::<f64>() {
                                        form.value.set(value);
                                    }
                                }
                            />
                        </div>
                        <div class="form-control">
                            <label for="lead-probability" class="label">
                                <span class="label-text">"Probability (%)"</span>
                            </label>
                            <input
                                id="lead-probability"
                                type="number"
                                min="0"
                                max="100"
                                class="input input-bordered w-full"
                                prop:value=move || form.probability.get().to_string()
                                on:input=move |ev| {
                                    if let Ok(value) = event_target_value(&ev).parse::<u8>() {
                                        form.probability.set(value.min(100));
                                    }
                                }
                            />
                        </div>
                        <div class="form-control">
                            <label for="lead-close-date" class="label">
                                <span class="label-text">"Expected Close"</span>
                            </label>
                            <input
                                id="lead-close-date"
                                type="date"
                                class="input input-bordered w-full"
                                prop:value=form.expected_close_date
                                on:input=move |ev| {
                                    form.expected_close_date.set(event_target_value(&ev))
                                }
                            />
                        </div>
                    </div>

                    <div class="form-control">
                        <label for="lead-notes" class="label">
                            <span class="label-text">"Notes"</span>
                        </label>
                        <textarea
                            id="lead-notes"
                            rows="3"
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
                                    "Update Lead".into_any()
                                } else {
                                    "Add Lead".into_any()
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
