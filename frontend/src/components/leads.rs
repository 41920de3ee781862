//! 销售线索页面
//!
//! 列表之上是管道概览条：对当前页的线索按阶段聚合数量与金额。

use leptos::prelude::*;
use leptos::task::spawn_local;

use nexcrm_shared::format::format_inr;
use nexcrm_shared::protocol::ListQuery;
use nexcrm_shared::{Lead, LeadSource, LeadStatus, date};

use crate::auth::{expire_session, use_auth};
use crate::components::icons::*;
use crate::components::lead_dialog::LeadDialog;
use crate::components::pagination::Pagination;
use crate::components::toast::Toast;
use crate::controller::{ListController, PageData, confirm};

fn stage_badge(status: LeadStatus) -> &'static str {
    match status {
        LeadStatus::New => "badge badge-info",
        LeadStatus::Contacted => "badge badge-warning",
        LeadStatus::Qualified => "badge badge-primary",
        LeadStatus::Proposal => "badge badge-secondary",
        LeadStatus::Negotiation => "badge badge-accent",
        LeadStatus::ClosedWon => "badge badge-success",
        LeadStatus::ClosedLost => "badge badge-error",
    }
}

#[component]
pub fn LeadsPage() -> impl IntoView {
    let ctx = use_auth();
    let auth_state = ctx.state;

    let ctrl: ListController<Lead> = ListController::new();
    let (status_filter, set_status_filter) = signal(String::new());
    let (source_filter, set_source_filter) = signal(String::new());
    let refresh = RwSignal::new(0u32);

    let dialog_open = RwSignal::new(false);
    let editing = RwSignal::new(Option::<Lead>::None);
    let notification = RwSignal::new(Option::<(String, bool)>::None);

    Effect::new(move |_| {
        let state = auth_state.get();
        refresh.track();
        let query = ListQuery {
            page: ctrl.page.get(),
            status: status_filter.get(),
            source: source_filter.get(),
            ..ListQuery::default()
        };
        if state.is_loading || !state.is_authenticated() {
            return;
        }
        let api = state.api();
        ctrl.load(ctx, "leads", async move {
            api.list_leads(query).await.map(|resp| PageData {
                items: resp.leads,
                total_pages: resp.total_pages,
            })
        });
    });

    let open_create = move |_| {
        editing.set(None);
        dialog_open.set(true);
    };

    let open_edit = move |lead: Lead| {
        editing.set(Some(lead));
        dialog_open.set(true);
    };

    let on_saved = move |_| {
        notification.set(Some(("Lead saved".to_string(), false)));
        refresh.update(|n| *n += 1);
    };

    let handle_delete = move |id: String| {
        if !confirm("Are you sure you want to delete this lead?") {
            return;
        }
        let api = auth_state.get_untracked().api();
        spawn_local(async move {
            match api.delete_lead(id).await {
                Ok(()) => {
                    notification.set(Some(("Lead deleted".to_string(), false)));
                    refresh.update(|n| *n += 1);
                }
                Err(err) if err.is_unauthorized() => expire_session(&ctx),
                Err(err) => {
                    notification.set(Some((format!("Failed to delete lead: {err}"), true)));
                }
            }
        });
    };

    // 当前页的管道聚合
    let stage_summary = move || {
        let leads = ctrl.items.get();
        LeadStatus::ALL
            .into_iter()
            .map(|stage| {
                let in_stage: Vec<&Lead> = leads.iter().filter(|l| l.status == stage).collect();
                let value: f64 = in_stage.iter().map(|l| l.value).sum();
                (stage, in_stage.len(), value)
            })
            .collect::<Vec<_>>()
    };

    let is_empty = move || ctrl.items.with(|items| items.is_empty());

    view! {
        <div class="max-w-7xl mx-auto space-y-6">
            <Toast message=notification />

            <div>
                <h1 class="text-2xl font-bold">"Leads"</h1>
                <p class="text-base-content/70">"Track and manage your sales pipeline"</p>
            </div>

            <Show when=move || ctrl.error.get().is_some()>
                <div role="alert" class="alert alert-error text-sm py-2">
                    <span>{move || ctrl.error.get().unwrap_or_default()}</span>
                </div>
            </Show>

            // 管道概览（随当前页整体重算）
            <div class="grid grid-cols-2 md:grid-cols-4 lg:grid-cols-7 gap-2">
                {move || {
                    stage_summary()
                        .into_iter()
                        .map(|(stage, count, value)| {
                            view! {
                                <div class="card bg-base-100 shadow card-compact">
                                    <div class="card-body items-center text-center p-3">
                                        <span class=stage_badge(stage)>{stage.label()}</span>
                                        <div class="text-lg font-bold">{count}</div>
                                        <div class="text-xs opacity-60">{format_inr(value)}</div>
                                    </div>
                                </div>
                            }
                        })
                        .collect_view()
                }}
            </div>

            <div class="card bg-base-100 shadow-xl">
                <div class="card-body p-0">
                    <div class="flex flex-wrap items-center justify-between gap-3 p-6 pb-2">
                        <h3 class="card-title">
                            <UserPlus attr:class="h-5 w-5" /> "All Leads"
                        </h3>
                        <div class="flex flex-wrap items-center gap-2">
                            <select
                                class="select select-bordered select-sm"
                                on:change=move |ev| set_status_filter.set(event_target_value(&ev))
                            >
                                <option value="">"All Status"</option>
                                {LeadStatus::ALL
                                    .into_iter()
                                    .map(|status| {
                                        view! { <option value=status.as_str()>{status.label()}</option> }
                                    })
                                    .collect_view()}
                            </select>
                            <select
                                class="select select-bordered select-sm"
                                on:change=move |ev| set_source_filter.set(event_target_value(&ev))
                            >
                                <option value="">"All Sources"</option>
                                {LeadSource::ALL
                                    .into_iter()
                                    .map(|source| {
                                        view! { <option value=source.as_str()>{source.label()}</option> }
                                    })
                                    .collect_view()}
                            </select>
                            <button class="btn btn-primary btn-sm gap-2" on:click=open_create>
                                <Plus attr:class="h-4 w-4" /> "Add Lead"
                            </button>
                        </div>
                    </div>

                    <div class="overflow-x-auto w-full">
                        <table class="table table-zebra w-full">
                            <thead>
                                <tr>
                                    <th>"Lead"</th>
                                    <th>"Stage"</th>
                                    <th>"Value"</th>
                                    <th class="hidden md:table-cell">"Probability"</th>
                                    <th class="hidden md:table-cell">"Expected Close"</th>
                                    <th></th>
                                </tr>
                            </thead>
                            <tbody>
                                <Show when=move || ctrl.loading.get() && is_empty()>
                                    <tr>
                                        <td colspan="6" class="text-center py-8 text-base-content/50">
                                            <span class="loading loading-spinner loading-md"></span>
                                            " Loading..."
                                        </td>
                                    </tr>
                                </Show>
                                <Show when=move || !ctrl.loading.get() && is_empty()>
                                    <tr>
                                        <td colspan="6" class="text-center py-8 text-base-content/50">
                                            "No leads found. Add one to get started."
                                        </td>
                                    </tr>
                                </Show>
                                <For
                                    each=move || ctrl.items.get()
                                    key=|lead| lead.id.clone()
                                    children=move |lead| {
                                        let id = lead.id.clone();
                                        let for_edit = lead.clone();
                                        let close_date = lead
                                            .expected_close_date
                                            .as_deref()
                                            .map(date::format_display)
                                            .unwrap_or_else(|| "—".to_string());
                                        view! {
                                            <tr>
                                                <td>
                                                    <div class="font-semibold">{lead.name.clone()}</div>
                                                    <div class="text-xs opacity-60">
                                                        {if lead.company.is_empty() {
                                                            lead.email.clone()
                                                        } else {
                                                            lead.company.clone()
                                                        }}
                                                        {" · "}
                                                        {lead.source.label()}
                                                    </div>
                                                </td>
                                                <td>
                                                    <span class=stage_badge(lead.status)>
                                                        {lead.status.label()}
                                                    </span>
                                                </td>
                                                <td>
                                                    <div class="flex items-center gap-1 font-mono text-sm">
                                                        <IndianRupee attr:class="h-3 w-3 opacity-50" />
                                                        {format_inr(lead.value)}
                                                    </div>
                                                </td>
                                                <td class="hidden md:table-cell">
                                                    {format!("{}%", lead.probability)}
                                                </td>
                                                <td class="hidden md:table-cell">
                                                    <div class="flex items-center gap-1 opacity-70">
                                                        <Calendar attr:class="h-3 w-3" />
                                                        {close_date}
                                                    </div>
                                                </td>
                                                <td>
                                                    <div class="flex gap-1 justify-end">
                                                        <button
                                                            class="btn btn-ghost btn-sm btn-square"
                                                            on:click=move |_| open_edit(for_edit.clone())
                                                        >
                                                            <Pencil attr:class="h-4 w-4" />
                                                        </button>
                                                        <button
                                                            class="btn btn-ghost btn-sm btn-square text-error"
                                                            on:click=move |_| handle_delete(id.clone())
                                                        >
                                                            <Trash2 attr:class="h-4 w-4" />
                                                        </button>
                                                    </div>
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

            <LeadDialog open=dialog_open editing=editing on_saved=on_saved />
        </div>
    }
}
