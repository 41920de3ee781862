//! 仪表盘页面
//!
//! 三个数据源并列：联系人/线索的 recent 列表（服务端）、
//! 线索分析（服务端）、提醒（仅本地存储，永不上传）。

use leptos::prelude::*;
use leptos::task::spawn_local;

use nexcrm_shared::format::format_inr;
use nexcrm_shared::protocol::ListQuery;
use nexcrm_shared::{Contact, Lead, date};

use crate::api::ApiError;
use crate::auth::{expire_session, use_auth};
use crate::components::contact_dialog::ContactDialog;
use crate::components::icons::*;
use crate::components::lead_dialog::LeadDialog;
use crate::components::toast::Toast;
use crate::local::{self, Priority, RelatedType, Reminder};
use crate::web::console;

#[derive(Clone, Default, PartialEq)]
struct DashboardStats {
    total_contacts: u64,
    total_leads: u32,
    total_value: f64,
    won_leads: u32,
    conversion_rate: f64,
}

/// 浏览器本地时间的今天，`YYYY-MM-DD`
fn today() -> String {
    let iso = String::from(js_sys::Date::new_0().to_iso_string());
    date::date_input_value(&iso).to_string()
}

#[component]
pub fn DashboardPage() -> impl IntoView {
    let ctx = use_auth();
    let auth_state = ctx.state;

    let stats = RwSignal::new(DashboardStats::default());
    let recent_contacts = RwSignal::new(Vec::<Contact>::new());
    let recent_leads = RwSignal::new(Vec::<Lead>::new());
    let (loading, set_loading) = signal(true);
    let refresh = RwSignal::new(0u32);
    let notification = RwSignal::new(Option::<(String, bool)>::None);

    // 本地提醒：启动时整体读入，之后每次变更整体写回
    let reminders = RwSignal::new(local::REMINDERS.load());
    let persist_reminders = move || {
        reminders.with_untracked(|list| local::REMINDERS.save(list));
    };

    let contact_dialog_open = RwSignal::new(false);
    let contact_editing = RwSignal::new(Option::<Contact>::None);
    let lead_dialog_open = RwSignal::new(false);
    let lead_editing = RwSignal::new(Option::<Lead>::None);
    let reminder_dialog_open = RwSignal::new(false);

    Effect::new(move |_| {
        let state = auth_state.get();
        refresh.track();
        if state.is_loading || !state.is_authenticated() {
            return;
        }
        let api = state.api();
        set_loading.set(true);
        spawn_local(async move {
            let fetched = async {
                let contacts = api.list_contacts(ListQuery::recent(5)).await?;
                let leads = api.list_leads(ListQuery::recent(5)).await?;
                let analytics = api.lead_analytics().await?;
                Ok::<_, ApiError>((contacts, leads, analytics))
            }
            .await;

            match fetched {
                Ok((contacts, leads, analytics)) => {
                    stats.set(DashboardStats {
                        total_contacts: contacts.total,
                        total_leads: analytics.total_leads,
                        total_value: analytics.total_value,
                        won_leads: analytics.won_leads,
                        conversion_rate: analytics.conversion_rate,
                    });
                    recent_contacts.set(contacts.contacts);
                    recent_leads.set(leads.leads);
                }
                Err(err) if err.is_unauthorized() => expire_session(&ctx),
                Err(err) => {
                    console::error(&format!("[dashboard] Fetch failed: {err}"));
                    notification.set(Some((format!("Failed to load dashboard: {err}"), true)));
                }
            }
            set_loading.set(false);
        });
    });

    let on_contact_saved = move |_| {
        notification.set(Some(("Contact saved".to_string(), false)));
        refresh.update(|n| *n += 1);
    };
    let on_lead_saved = move |_| {
        notification.set(Some(("Lead saved".to_string(), false)));
        refresh.update(|n| *n += 1);
    };

    let add_reminder = move |reminder: Reminder| {
        reminders.update(|list| local::upsert(list, reminder));
        persist_reminders();
        notification.set(Some(("Reminder scheduled".to_string(), false)));
    };

    let toggle_reminder = move |id: String| {
        reminders.update(|list| local::toggle_complete(list, &id));
        persist_reminders();
    };

    let delete_reminder = move |id: String| {
        reminders.update(|list| local::remove_by_id(list, &id));
        persist_reminders();
    };

    let greeting = move || {
        auth_state
            .get()
            .user
            .map(|user| format!("Welcome back, {}", user.name))
            .unwrap_or_else(|| "Welcome back".to_string())
    };

    view! {
        <div class="max-w-7xl mx-auto space-y-6">
            <Toast message=notification />

            <div class="flex flex-wrap items-center justify-between gap-3">
                <div>
                    <h1 class="text-2xl font-bold">{greeting}</h1>
                    <p class="text-base-content/70">"Here's what's happening with your pipeline"</p>
                </div>
                <div class="flex gap-2">
                    <button
                        class="btn btn-ghost btn-sm btn-circle"
                        disabled=move || loading.get()
                        on:click=move |_| refresh.update(|n| *n += 1)
                    >
                        <RefreshCw attr:class=move || {
                            if loading.get() { "h-4 w-4 animate-spin" } else { "h-4 w-4" }
                        } />
                    </button>
                    <button
                        class="btn btn-primary btn-sm gap-2"
                        on:click=move |_| {
                            lead_editing.set(None);
                            lead_dialog_open.set(true);
                        }
                    >
                        <Plus attr:class="h-4 w-4" /> "New Lead"
                    </button>
                    <button
                        class="btn btn-secondary btn-sm gap-2"
                        on:click=move |_| {
                            contact_editing.set(None);
                            contact_dialog_open.set(true);
                        }
                    >
                        <Plus attr:class="h-4 w-4" /> "New Contact"
                    </button>
                    <button
                        class="btn btn-warning btn-sm gap-2"
                        on:click=move |_| reminder_dialog_open.set(true)
                    >
                        <Bell attr:class="h-4 w-4" /> "Schedule Reminder"
                    </button>
                </div>
            </div>

            // 统计卡片
            <div class="stats shadow w-full stats-vertical md:stats-horizontal bg-base-100">
                <div class="stat">
                    <div class="stat-figure text-primary">
                        <UsersIcon attr:class="h-8 w-8" />
                    </div>
                    <div class="stat-title">"Total Contacts"</div>
                    <div class="stat-value text-primary">
                        {move || stats.get().total_contacts}
                    </div>
                </div>
                <div class="stat">
                    <div class="stat-figure text-secondary">
                        <UserPlus attr:class="h-8 w-8" />
                    </div>
                    <div class="stat-title">"Total Leads"</div>
                    <div class="stat-value text-secondary">{move || stats.get().total_leads}</div>
                </div>
                <div class="stat">
                    <div class="stat-figure text-accent">
                        <IndianRupee attr:class="h-8 w-8" />
                    </div>
                    <div class="stat-title">"Pipeline Value"</div>
                    <div class="stat-value text-accent text-2xl">
                        {move || format_inr(stats.get().total_value)}
                    </div>
                </div>
                <div class="stat">
                    <div class="stat-figure text-success">
                        <CheckCircle attr:class="h-8 w-8" />
                    </div>
                    <div class="stat-title">"Conversion Rate"</div>
                    <div class="stat-value text-success">
                        {move || format!("{:.1}%", stats.get().conversion_rate)}
                    </div>
                    <div class="stat-desc">
                        {move || format!("{} leads won", stats.get().won_leads)}
                    </div>
                </div>
            </div>

            <div class="grid grid-cols-1 lg:grid-cols-2 gap-6">
                // 最近联系人
                <div class="card bg-base-100 shadow-xl">
                    <div class="card-body">
                        <h3 class="card-title text-base">
                            <UsersIcon attr:class="h-5 w-5" /> "Recent Contacts"
                        </h3>
                        <Show
                            when=move || !loading.get()
                            fallback=|| {
                                view! {
                                    <div class="py-6 text-center">
                                        <span class="loading loading-spinner loading-md"></span>
                                    </div>
                                }
                            }
                        >
                            <Show when=move || recent_contacts.with(|c| c.is_empty())>
                                <p class="text-sm text-base-content/50 py-4">"No contacts yet."</p>
                            </Show>
                            <For
                                each=move || recent_contacts.get()
                                key=|contact| contact.id.clone()
                                children=|contact| {
                                    view! {
                                        <div class="flex items-center justify-between py-2 border-b border-base-200 last:border-0">
                                            <div>
                                                <div class="font-medium text-sm">{contact.name.clone()}</div>
                                                <div class="text-xs opacity-60">{contact.email.clone()}</div>
                                            </div>
                                            <span class="badge badge-ghost badge-sm">
                                                {contact.status.label()}
                                            </span>
                                        </div>
                                    }
                                }
                            />
                        </Show>
                    </div>
                </div>

                // 最近线索
                <div class="card bg-base-100 shadow-xl">
                    <div class="card-body">
                        <h3 class="card-title text-base">
                            <UserPlus attr:class="h-5 w-5" /> "Recent Leads"
                        </h3>
                        <Show
                            when=move || !loading.get()
                            fallback=|| {
                                view! {
                                    <div class="py-6 text-center">
                                        <span class="loading loading-spinner loading-md"></span>
                                    </div>
                                }
                            }
                        >
                            <Show when=move || recent_leads.with(|l| l.is_empty())>
                                <p class="text-sm text-base-content/50 py-4">"No leads yet."</p>
                            </Show>
                            <For
                                each=move || recent_leads.get()
                                key=|lead| lead.id.clone()
                                children=|lead| {
                                    view! {
                                        <div class="flex items-center justify-between py-2 border-b border-base-200 last:border-0">
                                            <div>
                                                <div class="font-medium text-sm">{lead.name.clone()}</div>
                                                <div class="text-xs opacity-60">{lead.status.label()}</div>
                                            </div>
                                            <span class="font-mono text-sm">{format_inr(lead.value)}</span>
                                        </div>
                                    }
                                }
                            />
                        </Show>
                    </div>
                </div>
            </div>

            // 提醒（仅本地，不与服务端同步）
            <div class="card bg-base-100 shadow-xl">
                <div class="card-body">
                    <h3 class="card-title text-base">
                        <Bell attr:class="h-5 w-5" /> "Reminders"
                        <span class="badge badge-ghost badge-sm">"stored on this device"</span>
                    </h3>
                    <Show when=move || reminders.with(|r| r.is_empty())>
                        <p class="text-sm text-base-content/50 py-4">
                            "No reminders scheduled. Set one for your next follow-up call."
                        </p>
                    </Show>
                    <For
                        each=move || reminders.get()
                        key=|reminder| (reminder.id.clone(), reminder.completed)
                        children=move |reminder| {
                            let toggle_id = reminder.id.clone();
                            let delete_id = reminder.id.clone();
                            let completed = reminder.completed;
                            let overdue = !completed && date::is_overdue(&reminder.due_date, &today());
                            view! {
                                <div class="flex items-center gap-3 py-2 border-b border-base-200 last:border-0">
                                    <input
                                        type="checkbox"
                                        class="checkbox checkbox-sm"
                                        prop:checked=completed
                                        on:change=move |_| toggle_reminder(toggle_id.clone())
                                    />
                                    <div class="flex-1">
                                        <div class=move || {
                                            if completed {
                                                "text-sm line-through opacity-50"
                                            } else {
                                                "text-sm font-medium"
                                            }
                                        }>{reminder.title.clone()}</div>
                                        <div class="text-xs opacity-60 flex items-center gap-2">
                                            <Calendar attr:class="h-3 w-3" />
                                            {date::format_display(&reminder.due_date)}
                                            <Show when=move || overdue>
                                                <span class="badge badge-error badge-xs">"overdue"</span>
                                            </Show>
                                            <span class="badge badge-ghost badge-xs">
                                                {reminder.priority.label()}
                                            </span>
                                        </div>
                                    </div>
                                    <button
                                        class="btn btn-ghost btn-xs btn-square text-error"
                                        on:click=move |_| delete_reminder(delete_id.clone())
                                    >
                                        <Trash2 attr:class="h-3 w-3" />
                                    </button>
                                </div>
                            }
                        }
                    />
                </div>
            </div>

            <ContactDialog
                open=contact_dialog_open
                editing=contact_editing
                on_saved=on_contact_saved
            />
            <LeadDialog open=lead_dialog_open editing=lead_editing on_saved=on_lead_saved />
            <ReminderDialog open=reminder_dialog_open on_add=add_reminder />
        </div>
    }
}

// =========================================================
// 提醒对话框（纯本地，无失败路径）
// =========================================================

#[component]
fn ReminderDialog(open: RwSignal<bool>, #[prop(into)] on_add: Callback<Reminder>) -> impl IntoView {
    let title = RwSignal::new(String::new());
    let description = RwSignal::new(String::new());
    let due_date = RwSignal::new(String::new());
    let priority = RwSignal::new(Priority::Medium);
    let related_to = RwSignal::new(String::new());
    let related_type = RwSignal::new(RelatedType::Lead);
    let dialog_ref = NodeRef::<leptos::html::Dialog>::new();

    let reset = move || {
        title.set(String::new());
        description.set(String::new());
        due_date.set(String::new());
        priority.set(Priority::Medium);
        related_to.set(String::new());
        related_type.set(RelatedType::Lead);
    };

    Effect::new(move |_| {
        if let Some(dialog) = dialog_ref.get() {
            if open.get() {
                if !dialog.open() {
                    let _ = dialog.show_modal();
                }
            } else if dialog.open() {
                dialog.close();
            }
        }
    });

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let now = js_sys::Date::new_0();
        let reminder = Reminder {
            id: format!("{}", js_sys::Date::now() as u64),
            title: title.get(),
            description: description.get(),
            due_date: due_date.get(),
            priority: priority.get(),
            related_to: related_to.get(),
            related_type: related_type.get(),
            completed: false,
            created_at: String::from(now.to_iso_string()),
        };
        on_add.run(reminder);
        open.set(false);
        reset();
    };

    view! {
        <dialog class="modal" node_ref=dialog_ref on:close=move |_| open.set(false)>
            <div class="modal-box">
                <h3 class="font-bold text-lg">"Schedule Reminder"</h3>
                <p class="py-2 text-base-content/70 text-sm">
                    "Reminders stay on this device and are never synced."
                </p>

                <form on:submit=on_submit class="space-y-4">
                    <div class="form-control">
                        <label for="reminder-title" class="label">
                            <span class="label-text">"Title *"</span>
                        </label>
                        <input
                            id="reminder-title"
                            required
                            type="text"
                            placeholder="Call back about the proposal"
                            on:input=move |ev| title.set(event_target_value(&ev))
                            prop:value=title
                            class="input input-bordered w-full"
                        />
                    </div>
                    <div class="form-control">
                        <label for="reminder-description" class="label">
                            <span class="label-text">"Description"</span>
                        </label>
                        <textarea
                            id="reminder-description"
                            rows="2"
                            class="textarea textarea-bordered w-full"
                            on:input=move |ev| description.set(event_target_value(&ev))
                            prop:value=description
                        ></textarea>
                    </div>
                    <div class="grid grid-cols-2 gap-4">
                        <div class="form-control">
                            <label for="reminder-due" class="label">
                                <span class="label-text">"Due Date *"</span>
                            </label>
                            <input
                                id="reminder-due"
                                required
                                type="date"
                                on:input=move |ev| due_date.set(event_target_value(&ev))
                                prop:value=due_date
                                class="input input-bordered w-full"
                            />
                        </div>
                        <div class="form-control">
                            <label class="label">
                                <span class="label-text">"Priority"</span>
                            </label>
                            <select
                                class="select select-bordered w-full"
                                on:change=move |ev| {
                                    if let Some(value) = Priority::from_value(&event_target_value(&ev)) {
                                        priority.set(value);
                                    }
                                }
                            >
                                {Priority::ALL
                                    .into_iter()
                                    .map(|p| {
                                        view! {
                                            <option value=p.as_str() selected=move || priority.get() == p>
                                                {p.label()}
                                            </option>
                                        }
                                    })
                                    .collect_view()}
                            </select>
                        </div>
                    </div>
                    <div class="grid grid-cols-2 gap-4">
                        <div class="form-control">
                            <label for="reminder-related" class="label">
                                <span class="label-text">"Related To"</span>
                            </label>
                            <input
                                id="reminder-related"
                                type="text"
                                placeholder="Lead or contact name"
                                on:input=move |ev| related_to.set(event_target_value(&ev))
                                prop:value=related_to
                                class="input input-bordered w-full"
                            />
                        </div>
                        <div class="form-control">
                            <label class="label">
                                <span class="label-text">"Type"</span>
                            </label>
                            <select
                                class="select select-bordered w-full"
                                on:change=move |ev| {
                                    related_type.set(RelatedType::from_value(&event_target_value(&ev)))
                                }
                            >
                                <option
                                    value=RelatedType::Lead.as_str()
                                    selected=move || related_type.get() == RelatedType::Lead
                                >
                                    "Lead"
                                </option>
                                <option
                                    value=RelatedType::Contact.as_str()
                                    selected=move || related_type.get() == RelatedType::Contact
                                >
                                    "Contact"
                                </option>
                            </select>
                        </div>
                    </div>

                    <div class="modal-action">
                        <button type="button" class="btn btn-ghost" on:click=move |_| open.set(false)>
                            "Cancel"
                        </button>
                        <button type="submit" class="btn btn-primary">
                            "Schedule"
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
