//! 任务与跟进页面

use leptos::prelude::*;

use crate::components::icons::Calendar;
use crate::components::task_manager::TaskManager;

#[component]
pub fn TasksPage() -> impl IntoView {
    view! {
        <div class="max-w-5xl mx-auto space-y-6">
            <div>
                <h1 class="text-2xl font-bold flex items-center gap-2">
                    <Calendar attr:class="h-6 w-6" /> "Tasks & Follow-ups"
                </h1>
                <p class="text-base-content/70">
                    "Manage your tasks, reminders, and follow-up activities"
                </p>
            </div>
            <TaskManager />
        </div>
    }
}
