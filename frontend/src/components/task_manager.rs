//! 本地任务管理器
//!
//! 整个集合常驻内存信号，过滤与搜索对全量数组同步计算；
//! 每次变更把集合整体写回 LocalStorage（键 `crm_tasks`）。

use leptos::prelude::*;

use nexcrm_shared::date;

use crate::components::icons::*;
use crate::components::toast::Toast;
use crate::controller::confirm;
use crate::local::{self, LocalTask, Priority, TaskCategory, TaskFilter};

/// 任务表单草稿
#[derive(Clone, Copy)]
struct TaskForm {
    title: RwSignal<String>,
    description: RwSignal<String>,
    due_date: RwSignal<String>,
    priority: RwSignal<Priority>,
    category: RwSignal<TaskCategory>,
    related_to: RwSignal<String>,
}

impl TaskForm {
    fn new() -> Self {
        Self {
            title: RwSignal::new(String::new()),
            description: RwSignal::new(String::new()),
            due_date: RwSignal::new(String::new()),
            priority: RwSignal::new(Priority::Medium),
            category: RwSignal::new(TaskCategory::FollowUp),
            related_to: RwSignal::new(String::new()),
        }
    }

    fn reset(&self) {
        self.title.set(String::new());
        self.description.set(String::new());
        self.due_date.set(String::new());
        self.priority.set(Priority::Medium);
        self.category.set(TaskCategory::FollowUp);
        self.related_to.set(String::new());
    }

    fn fill(&self, task: &LocalTask) {
        self.title.set(task.title.clone());
        self.description.set(task.description.clone());
        self.due_date.set(task.due_date.clone());
        self.priority.set(task.priority);
        self.category.set(task.category);
        self.related_to.set(task.related_to.clone());
    }
}

fn priority_badge(priority: Priority) -> &'static str {
    match priority {
        Priority::High => "badge badge-error badge-sm",
        Priority::Medium => "badge badge-warning badge-sm",
        Priority::Low => "badge badge-success badge-sm",
    }
}

#[component]
pub fn TaskManager() -> impl IntoView {
    let tasks = RwSignal::new(local::TASKS.load());
    let (filter_value, set_filter_value) = signal("all".to_string());
    let (search_term, set_search_term) = signal(String::new());
    let notification = RwSignal::new(Option::<(String, bool)>::None);

    let modal_open = RwSignal::new(false);
    let editing = RwSignal::new(Option::<LocalTask>::None);
    let form = TaskForm::new();
    let dialog_ref = NodeRef::<leptos::html::Dialog>::new();

    let persist = move || {
        tasks.with_untracked(|list| local::TASKS.save(list));
    };

    // 过滤 + 搜索后的可见任务
    let visible = move || {
        tasks.with(|list| {
            local::visible_tasks(
                list,
                &TaskFilter::from_value(&filter_value.get()),
                &search_term.get(),
            )
        })
    };

    Effect::new(move |_| {
        let is_open = modal_open.get();
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
            match editing.get_untracked() {
                Some(task) => form.fill(&task),
                None => form.reset(),
            }
        }
    });

    let open_create = move |_| {
        editing.set(None);
        modal_open.set(true);
    };

    let close_modal = move || {
        modal_open.set(false);
        editing.set(None);
        form.reset();
    };

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let now_iso = String::from(js_sys::Date::new_0().to_iso_string());
        let existing = editing.get_untracked();
        let task = LocalTask {
            id: existing
                .as_ref()
                .map(|task| task.id.clone())
                .unwrap_or_else(|| format!("{}", js_sys::Date::now() as u64)),
            title: form.title.get_untracked(),
            description: form.description.get_untracked(),
            due_date: form.due_date.get_untracked(),
            priority: form.priority.get_untracked(),
            category: form.category.get_untracked(),
            related_to: form.related_to.get_untracked(),
            completed: existing.as_ref().map(|task| task.completed).unwrap_or(false),
            created_at: existing
                .as_ref()
                .map(|task| task.created_at.clone())
                .unwrap_or_else(|| now_iso.clone()),
            updated_at: Some(now_iso),
        };
        tasks.update(|list| local::upsert(list, task));
        persist();
        notification.set(Some(("Task saved".to_string(), false)));
        close_modal();
    };

    let handle_toggle = move |id: String| {
        tasks.update(|list| local::toggle_complete(list, &id));
        persist();
    };

    let handle_edit = move |task: LocalTask| {
        editing.set(Some(task));
        modal_open.set(true);
    };

    let handle_delete = move |id: String| {
        if !confirm("Are you sure you want to delete this task?") {
            return;
        }
        tasks.update(|list| local::remove_by_id(list, &id));
        persist();
        notification.set(Some(("Task deleted".to_string(), false)));
    };

    view! {
        <div class="space-y-4">
            <Toast message=notification />

            <div class="flex flex-wrap items-center justify-between gap-3">
                <div class="flex flex-wrap items-center gap-2">
                    <label class="input input-bordered input-sm flex items-center gap-2">
                        <Search attr:class="h-4 w-4 opacity-50" />
                        <input
                            type="text"
                            class="grow"
                            placeholder="Search tasks..."
                            on:input=move |ev| set_search_term.set(event_target_value(&ev))
                            prop:value=search_term
                        />
                    </label>
                    <select
                        class="select select-bordered select-sm"
                        on:change=move |ev| set_filter_value.set(event_target_value(&ev))
                    >
                        <option value="all">"All Tasks"</option>
                        <option value="pending">"Pending"</option>
                        <option value="completed">"Completed"</option>
                        <option value="high">"High Priority"</option>
                        <option value="medium">"Medium Priority"</option>
                        <option value="low">"Low Priority"</option>
                        <option value="follow_up">"Follow-ups"</option>
                        <option value="meeting">"Meetings"</option>
                        <option value="call">"Calls"</option>
                    </select>
                </div>
                <button class="btn btn-primary btn-sm gap-2" on:click=open_create>
                    <Plus attr:class="h-4 w-4" /> "Add Task"
                </button>
            </div>

            <div class="card bg-base-100 shadow-xl">
                <div class="card-body p-4">
                    <Show when=move || visible().is_empty()>
                        <div class="text-center py-10 text-base-content/50">
                            <Calendar attr:class="h-10 w-10 mx-auto mb-2 opacity-40" />
                            "No tasks here. Add one or adjust the filters."
                        </div>
                    </Show>
                    <For
                        each=visible
                        key=|task| (task.id.clone(), task.completed, task.updated_at.clone())
                        children=move |task| {
                            let toggle_id = task.id.clone();
                            let delete_id = task.id.clone();
                            let for_edit = task.clone();
                            let completed = task.completed;
                            view! {
                                <div class=move || {
                                    if completed {
                                        "flex items-start gap-3 py-3 border-b border-base-200 last:border-0 opacity-60"
                                    } else {
                                        "flex items-start gap-3 py-3 border-b border-base-200 last:border-0"
                                    }
                                }>
                                    <input
                                        type="checkbox"
                                        class="checkbox checkbox-sm mt-1"
                                        prop:checked=completed
                                        on:change=move |_| handle_toggle(toggle_id.clone())
                                    />
                                    <div class="flex-1 min-w-0">
                                        <div class=move || {
                                            if completed {
                                                "font-medium line-through"
                                            } else {
                                                "font-medium"
                                            }
                                        }>{task.title.clone()}</div>
                                        <Show when={
                                            let has_description = !task.description.is_empty();
                                            move || has_description
                                        }>
                                            <p class="text-sm opacity-70">{task.description.clone()}</p>
                                        </Show>
                                        <div class="flex flex-wrap items-center gap-2 mt-1 text-xs opacity-60">
                                            <span class="flex items-center gap-1">
                                                <Calendar attr:class="h-3 w-3" />
                                                {date::format_display(&task.due_date)}
                                            </span>
                                            <span class=priority_badge(task.priority)>
                                                {format!("{} priority", task.priority.label())}
                                            </span>
                                            <span class="badge badge-ghost badge-sm">
                                                {task.category.label()}
                                            </span>
                                            <Show when={
                                                let has_related = !task.related_to.is_empty();
                                                move || has_related
                                            }>
                                                <span>{format!("re: {}", task.related_to.clone())}</span>
                                            </Show>
                                        </div>
                                    </div>
                                    <div class="flex gap-1">
                                        <button
                                            class="btn btn-ghost btn-sm btn-square"
                                            on:click=move |_| handle_edit(for_edit.clone())
                                        >
                                            <Pencil attr:class="h-4 w-4" />
                                        </button>
                                        <button
                                            class="btn btn-ghost btn-sm btn-square text-error"
                                            on:click=move |_| handle_delete(delete_id.clone())
                                        >
                                            <Trash2 attr:class="h-4 w-4" />
                                        </button>
                                    </div>
                                </div>
                            }
                        }
                    />
                </div>
            </div>

            // 新建/编辑任务对话框
            <dialog class="modal" node_ref=dialog_ref on:close=move |_| modal_open.set(false)>
                <div class="modal-box">
                    <h3 class="font-bold text-lg">
                        {move || if editing.get().is_some() { "Edit Task" } else { "Add New Task" }}
                    </h3>

                    <form on:submit=on_submit class="space-y-4 mt-4">
                        <div class="form-control">
                            <label for="task-title" class="label">
                                <span class="label-text">"Title *"</span>
                            </label>
                            <input
                                id="task-title"
                                required
                                type="text"
                                on:input=move |ev| form.title.set(event_target_value(&ev))
                                prop:value=form.title
                                class="input input-bordered w-full"
                            />
                        </div>
                        <div class="form-control">
                            <label for="task-description" class="label">
                                <span class="label-text">"Description"</span>
                            </label>
                            <textarea
                                id="task-description"
                                rows="2"
                                class="textarea textarea-bordered w-full"
                                on:input=move |ev| form.description.set(event_target_value(&ev))
                                prop:value=form.description
                            ></textarea>
                        </div>
                        <div class="grid grid-cols-2 gap-4">
                            <div class="form-control">
                                <label for="task-due" class="label">
                                    <span class="label-text">"Due Date *"</span>
                                </label>
                                <input
                                    id="task-due"
                                    required
                                    type="date"
                                    on:input=move |ev| form.due_date.set(event_target_value(&ev))
                                    prop:value=form.due_date
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
                                        if let Some(value) = Priority::from_value(
                                            &event_target_value(&ev),
                                        ) {
                                            form.priority.set(value);
                                        }
                                    }
                                >
                                    {Priority::ALL
                                        .into_iter()
                                        .map(|p| {
                                            view! {
                                                <option
                                                    value=p.as_str()
                                                    selected=move || form.priority.get() == p
                                                >
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
                                <label class="label">
                                    <span class="label-text">"Category"</span>
                                </label>
                                <select
                                    class="select select-bordered w-full"
                                    on:change=move |ev| {
                                        form.category
                                            .set(TaskCategory::from_value(&event_target_value(&ev)))
                                    }
                                >
                                    {TaskCategory::ALL
                                        .into_iter()
                                        .map(|c| {
                                            view! {
                                                <option
                                                    value=c.as_str()
                                                    selected=move || form.category.get() == c
                                                >
                                                    {c.label()}
                                                </option>
                                            }
                                        })
                                        .collect_view()}
                                </select>
                            </div>
                            <div class="form-control">
                                <label for="task-related" class="label">
                                    <span class="label-text">"Related To"</span>
                                </label>
                                <input
                                    id="task-related"
                                    type="text"
                                    placeholder="Lead or contact name"
                                    on:input=move |ev| form.related_to.set(event_target_value(&ev))
                                    prop:value=form.related_to
                                    class="input input-bordered w-full"
                                />
                            </div>
                        </div>

                        <div class="modal-action">
                            <button type="button" class="btn btn-ghost" on:click=move |_| close_modal()>
                                "Cancel"
                            </button>
                            <button type="submit" class="btn btn-primary">
                                {move || if editing.get().is_some() { "Update Task" } else { "Add Task" }}
                            </button>
                        </div>
                    </form>
                </div>
                <form method="dialog" class="modal-backdrop">
                    <button>"close"</button>
                </form>
            </dialog>
        </div>
    }
}
