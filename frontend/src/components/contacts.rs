//! 联系人管理页面
//!
//! 服务端驱动的分页与过滤：搜索词、状态或页码一变即重新拉取。

use leptos::prelude::*;
use leptos::task::spawn_local;

use nexcrm_shared::protocol::ListQuery;
use nexcrm_shared::{Contact, ContactStatus};

use crate::auth::{expire_session, use_auth};
use crate::components::contact_dialog::ContactDialog;
use crate::components::icons::*;
use crate::components::pagination::Pagination;
use crate::components::toast::Toast;
use crate::controller::{ListController, PageData, confirm};

#[component]
pub fn ContactsPage() -> impl IntoView {
    let ctx = use_auth();
    let auth_state = ctx.state;

    let ctrl: ListController<Contact> = ListController::new();
    let (search_term, set_search_term) = signal(String::new());
    let (status_filter, set_status_filter) = signal(String::new());
    // 变更成功后加一触发重取
    let refresh = RwSignal::new(0u32);

    let dialog_open = RwSignal::new(false);
    let editing = RwSignal::new(Option::<Contact>::None);
    let notification = RwSignal::new(Option::<(String, bool)>::None);

    // 初始加载 + 追踪搜索/过滤/页码/刷新计数
    Effect::new(move |_| {
        let state = auth_state.get();
        refresh.track();
        let query = ListQuery {
            page: ctrl.page.get(),
            search: search_term.get(),
            status: status_filter.get(),
            ..ListQuery::default()
        };
        if state.is_loading || !state.is_authenticated() {
            return;
        }
        let api = state.api();
        ctrl.load(ctx, "contacts", async move {
            api.list_contacts(query).await.map(|resp| PageData {
                items: resp.contacts,
                total_pages: resp.total_pages,
            })
        });
    });

    let open_create = move |_| {
        editing.set(None);
        dialog_open.set(true);
    };

    let open_edit = move |contact: Contact| {
        editing.set(Some(contact));
        dialog_open.set(true);
    };

    let on_saved = move |_| {
        notification.set(Some(("Contact saved".to_string(), false)));
        refresh.update(|n| *n += 1);
    };

    let handle_delete = move |id: String| {
        if !confirm("Are you sure you want to delete this contact?") {
            return;
        }
        let api = auth_state.get_untracked().api();
        spawn_local(async move {
            match api.delete_contact(id).await {
                Ok(()) => {
                    notification.set(Some(("Contact deleted".to_string(), false)));
                    refresh.update(|n| *n += 1);
                }
                Err(err) if err.is_unauthorized() => expire_session(&ctx),
                Err(err) => {
                    notification.set(Some((format!("Failed to delete contact: {err}"), true)));
                }
            }
        });
    };

    let location_line = |contact: &Contact| {
        if !contact.address.city.is_empty() && !contact.address.state.is_empty() {
            format!("{}, {}", contact.address.city, contact.address.state)
        } else {
            contact.address.country.clone()
        }
    };

    let status_badge = |status: ContactStatus| match status {
        ContactStatus::Active => "badge badge-success badge-outline",
        ContactStatus::Inactive => "badge badge-ghost badge-outline",
        ContactStatus::Prospect => "badge badge-info badge-outline",
    };

    let is_empty = move || ctrl.items.with(|items| items.is_empty());

    view! {
        <div class="max-w-7xl mx-auto space-y-6">
            <Toast message=notification />

            <div>
                <h1 class="text-2xl font-bold">"Contacts"</h1>
                <p class="text-base-content/70">"Manage your customer contacts and relationships"</p>
            </div>

            <Show when=move || ctrl.error.get().is_some()>
                <div role="alert" class="alert alert-error text-sm py-2">
                    <span>{move || ctrl.error.get().unwrap_or_default()}</span>
                </div>
            </Show>

            <div class="card bg-base-100 shadow-xl">
                <div class="card-body p-0">
                    <div class="flex flex-wrap items-center justify-between gap-3 p-6 pb-2">
                        <h3 class="card-title">
                            <UsersIcon attr:class="h-5 w-5" /> "All Contacts"
                        </h3>
                        <div class="flex flex-wrap items-center gap-2">
                            <label class="input input-bordered input-sm flex items-center gap-2">
                                <Search attr:class="h-4 w-4 opacity-50" />
                                <input
                                    type="text"
                                    class="grow"
                                    placeholder="Search contacts..."
                                    on:input=move |ev| set_search_term.set(event_target_value(&ev))
                                    prop:value=search_term
                                />
                            </label>
                            <select
                                class="select select-bordered select-sm"
                                on:change=move |ev| set_status_filter.set(event_target_value(&ev))
                            >
                                <option value="">"All Status"</option>
                                {ContactStatus::ALL
                                    .into_iter()
                                    .map(|status| {
                                        view! { <option value=status.as_str()>{status.label()}</option> }
                                    })
                                    .collect_view()}
                            </select>
                            <button class="btn btn-primary btn-sm gap-2" on:click=open_create>
                                <Plus attr:class="h-4 w-4" /> "Add Contact"
                            </button>
                        </div>
                    </div>

                    <div class="overflow-x-auto w-full">
                        <table class="table table-zebra w-full">
                            <thead>
                                <tr>
                                    <th>"Contact"</th>
                                    <th>"Company"</th>
                                    <th class="hidden md:table-cell">"Location"</th>
                                    <th>"Status"</th>
                                    <th></th>
                                </tr>
                            </thead>
                            <tbody>
                                <Show when=move || ctrl.loading.get() && is_empty()>
                                    <tr>
                                        <td colspan="5" class="text-center py-8 text-base-content/50">
                                            <span class="loading loading-spinner loading-md"></span>
                                            " Loading..."
                                        </td>
                                    </tr>
                                </Show>
                                <Show when=move || !ctrl.loading.get() && is_empty()>
                                    <tr>
                                        <td colspan="5" class="text-center py-8 text-base-content/50">
                                            "No contacts found. Add one to get started."
                                        </td>
                                    </tr>
                                </Show>
                                <For
                                    each=move || ctrl.items.get()
                                    key=|contact| contact.id.clone()
                                    children=move |contact| {
                                        let id = contact.id.clone();
                                        let for_edit = contact.clone();
                                        let location = location_line(&contact);
                                        view! {
                                            <tr>
                                                <td>
                                                    <div class="font-semibold">{contact.name.clone()}</div>
                                                    <div class="flex flex-col gap-1 mt-1 text-xs opacity-60">
                                                        <span class="flex items-center gap-1">
                                                            <Mail attr:class="h-3 w-3" />
                                                            {contact.email.clone()}
                                                        </span>
                                                        <span class="flex items-center gap-1">
                                                            <Phone attr:class="h-3 w-3" />
                                                            {contact.phone.clone()}
                                                        </span>
                                                    </div>
                                                </td>
                                                <td>
                                                    <div class="flex items-center gap-2">
                                                        <Building attr:class="h-4 w-4 opacity-50" />
                                                        {if contact.company.is_empty() {
                                                            "N/A".to_string()
                                                        } else {
                                                            contact.company.clone()
                                                        }}
                                                    </div>
                                                    <Show when={
                                                        let has_position = !contact.position.is_empty();
                                                        move || has_position
                                                    }>
                                                        <div class="text-xs opacity-60">
                                                            {contact.position.clone()}
                                                        </div>
                                                    </Show>
                                                </td>
                                                <td class="hidden md:table-cell">
                                                    <div class="flex items-center gap-2 opacity-70">
                                                        <MapPin attr:class="h-4 w-4" />
                                                        {location}
                                                    </div>
                                                </td>
                                                <td>
                                                    <span class=status_badge(contact.status)>
                                                        {contact.status.label()}
                                                    </span>
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

            <ContactDialog open=dialog_open editing=editing on_saved=on_saved />
        </div>
    }
}
