//! 浏览器本地任务与提醒
//!
//! 两个刻意分离的纯客户端领域：任务（Tasks 页面，键 `crm_tasks`）
//! 与提醒（仪表盘，键 `crm_reminders`）。两者都不与服务端同步，
//! 整个集合在每次变更时作为一个 JSON blob 整体重写；损坏的 blob
//! 按空列表处理。过滤与搜索在内存中的全量数组上同步计算——
//! 集合规模是单用户量级。

use std::marker::PhantomData;

use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::serde_helper;
use crate::web::LocalStorage;

/// 任务 blob 的存储键
pub const STORAGE_TASKS_KEY: &str = "crm_tasks";
/// 提醒 blob 的存储键
pub const STORAGE_REMINDERS_KEY: &str = "crm_reminders";

// =========================================================
// 数据模型
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }

    pub fn from_value(value: &str) -> Option<Priority> {
        Self::ALL.into_iter().find(|p| p.as_str() == value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskCategory {
    #[default]
    FollowUp,
    Meeting,
    Call,
    Email,
    Other,
}

impl TaskCategory {
    pub const ALL: [TaskCategory; 5] = [
        TaskCategory::FollowUp,
        TaskCategory::Meeting,
        TaskCategory::Call,
        TaskCategory::Email,
        TaskCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskCategory::FollowUp => "follow_up",
            TaskCategory::Meeting => "meeting",
            TaskCategory::Call => "call",
            TaskCategory::Email => "email",
            TaskCategory::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TaskCategory::FollowUp => "Follow-up",
            TaskCategory::Meeting => "Meeting",
            TaskCategory::Call => "Call",
            TaskCategory::Email => "Email",
            TaskCategory::Other => "Other",
        }
    }

    pub fn from_value(value: &str) -> TaskCategory {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == value)
            .unwrap_or(TaskCategory::Other)
    }
}

/// 提醒所关联的实体类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelatedType {
    #[default]
    Lead,
    Contact,
}

impl RelatedType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelatedType::Lead => "lead",
            RelatedType::Contact => "contact",
        }
    }

    pub fn from_value(value: &str) -> RelatedType {
        match value {
            "contact" => RelatedType::Contact,
            _ => RelatedType::Lead,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalTask {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub due_date: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub category: TaskCategory,
    #[serde(default)]
    pub related_to: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub due_date: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub related_to: String,
    #[serde(default)]
    pub related_type: RelatedType,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub created_at: String,
}

/// 有 id 与完成标记的本地记录
pub trait LocalRecord {
    fn id(&self) -> &str;
    fn completed_mut(&mut self) -> &mut bool;
}

impl LocalRecord for LocalTask {
    fn id(&self) -> &str {
        &self.id
    }
    fn completed_mut(&mut self) -> &mut bool {
        &mut self.completed
    }
}

impl LocalRecord for Reminder {
    fn id(&self) -> &str {
        &self.id
    }
    fn completed_mut(&mut self) -> &mut bool {
        &mut self.completed
    }
}

// =========================================================
// 持久化
// =========================================================

/// 单键 JSON blob 存储
pub struct LocalStore<T> {
    key: &'static str,
    _marker: PhantomData<T>,
}

/// 任务存储
pub const TASKS: LocalStore<LocalTask> = LocalStore::new(STORAGE_TASKS_KEY);
/// 提醒存储
pub const REMINDERS: LocalStore<Reminder> = LocalStore::new(STORAGE_REMINDERS_KEY);

impl<T> LocalStore<T> {
    pub const fn new(key: &'static str) -> Self {
        Self {
            key,
            _marker: PhantomData,
        }
    }
}

impl<T: Serialize + DeserializeOwned> LocalStore<T> {
    /// 读取整个集合；键不存在或内容损坏时返回空列表
    pub fn load(&self) -> Vec<T> {
        LocalStorage::get(self.key)
            .map(|raw| decode(&raw))
            .unwrap_or_default()
    }

    /// 整体写回集合
    pub fn save(&self, items: &[T]) -> bool {
        match serde_helper::to_json_string(&items) {
            Ok(raw) => LocalStorage::set(self.key, &raw),
            Err(_) => false,
        }
    }
}

/// blob 解码，损坏内容不让应用崩溃
fn decode<T: DeserializeOwned>(raw: &str) -> Vec<T> {
    serde_helper::from_json_string(raw).unwrap_or_default()
}

// =========================================================
// 集合操作（纯函数）
// =========================================================

/// 按 id 替换，不存在则追加
pub fn upsert<T: LocalRecord>(items: &mut Vec<T>, item: T) {
    match items.iter_mut().find(|existing| existing.id() == item.id()) {
        Some(slot) => *slot = item,
        None => items.push(item),
    }
}

/// 按 id 删除
pub fn remove_by_id<T: LocalRecord>(items: &mut Vec<T>, id: &str) {
    items.retain(|item| item.id() != id);
}

/// 翻转完成标记；重复调用两次还原原值
pub fn toggle_complete<T: LocalRecord>(items: &mut [T], id: &str) {
    for item in items.iter_mut() {
        if item.id() == id {
            let completed = item.completed_mut();
            *completed = !*completed;
        }
    }
}

// =========================================================
// 过滤与搜索（纯函数）
// =========================================================

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TaskFilter {
    #[default]
    All,
    Pending,
    Completed,
    Priority(Priority),
    Category(TaskCategory),
}

impl TaskFilter {
    /// 解析过滤下拉框的取值
    pub fn from_value(value: &str) -> TaskFilter {
        match value {
            "all" => TaskFilter::All,
            "pending" => TaskFilter::Pending,
            "completed" => TaskFilter::Completed,
            other => match Priority::from_value(other) {
                Some(priority) => TaskFilter::Priority(priority),
                None => TaskFilter::Category(TaskCategory::from_value(other)),
            },
        }
    }

    pub fn matches(&self, task: &LocalTask) -> bool {
        match self {
            TaskFilter::All => true,
            TaskFilter::Pending => !task.completed,
            TaskFilter::Completed => task.completed,
            TaskFilter::Priority(priority) => task.priority == *priority,
            TaskFilter::Category(category) => task.category == *category,
        }
    }
}

/// 大小写不敏感的子串搜索，范围为标题 + 描述
pub fn search_matches(task: &LocalTask, term: &str) -> bool {
    if term.is_empty() {
        return true;
    }
    let needle = term.to_lowercase();
    task.title.to_lowercase().contains(&needle)
        || task.description.to_lowercase().contains(&needle)
}

/// 过滤 + 搜索的合取
pub fn visible_tasks(tasks: &[LocalTask], filter: &TaskFilter, term: &str) -> Vec<LocalTask> {
    tasks
        .iter()
        .filter(|task| filter.matches(task) && search_matches(task, term))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: &str, title: &str) -> LocalTask {
        LocalTask {
            id: id.to_string(),
            title: title.to_string(),
            description: String::new(),
            due_date: "2026-08-10".to_string(),
            priority: Priority::Medium,
            category: TaskCategory::FollowUp,
            related_to: String::new(),
            completed: false,
            created_at: "2026-08-07T10:00:00.000Z".to_string(),
            updated_at: None,
        }
    }

    // =========================================================
    // 集合操作测试
    // =========================================================

    #[test]
    fn toggle_twice_restores_original() {
        let mut tasks = vec![task("1", "Call Asha"), task("2", "Send quote")];
        tasks[1].completed = true;

        toggle_complete(&mut tasks, "1");
        assert!(tasks[0].completed);
        toggle_complete(&mut tasks, "1");
        assert!(!tasks[0].completed);
        // 未命中的记录不受影响
        assert!(tasks[1].completed);
    }

    #[test]
    fn toggle_unknown_id_is_a_no_op() {
        let mut tasks = vec![task("1", "Call Asha")];
        toggle_complete(&mut tasks, "404");
        assert!(!tasks[0].completed);
    }

    #[test]
    fn upsert_replaces_by_id_without_duplicating() {
        let mut tasks = vec![task("1", "Call Asha")];
        let mut edited = task("1", "Call Asha again");
        edited.priority = Priority::High;
        upsert(&mut tasks, edited);
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "Call Asha again");

        upsert(&mut tasks, task("2", "Send quote"));
        assert_eq!(tasks.len(), 2);
    }

    #[test]
    fn remove_by_id_only_touches_target() {
        let mut tasks = vec![task("1", "a"), task("2", "b")];
        remove_by_id(&mut tasks, "1");
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, "2");
    }

    // =========================================================
    // 过滤与搜索测试
    // =========================================================

    #[test]
    fn filter_values_parse_like_the_dropdown() {
        assert_eq!(TaskFilter::from_value("all"), TaskFilter::All);
        assert_eq!(TaskFilter::from_value("pending"), TaskFilter::Pending);
        assert_eq!(TaskFilter::from_value("completed"), TaskFilter::Completed);
        assert_eq!(
            TaskFilter::from_value("high"),
            TaskFilter::Priority(Priority::High)
        );
        assert_eq!(
            TaskFilter::from_value("meeting"),
            TaskFilter::Category(TaskCategory::Meeting)
        );
    }

    #[test]
    fn search_is_case_insensitive_over_title_and_description() {
        let mut t = task("1", "Quarterly Review");
        t.description = "prepare PIPELINE numbers".to_string();

        assert!(search_matches(&t, "review"));
        assert!(search_matches(&t, "Pipeline"));
        assert!(!search_matches(&t, "invoice"));
        assert!(search_matches(&t, ""));
    }

    #[test]
    fn visibility_is_filter_and_search_conjunction() {
        let mut call = task("1", "Call the vendor");
        call.category = TaskCategory::Call;
        let mut done = task("2", "Call the bank");
        done.category = TaskCategory::Call;
        done.completed = true;
        let meeting = task("3", "Team meeting");

        let tasks = vec![call, done, meeting];

        // 过滤与搜索必须同时满足
        let visible = visible_tasks(&tasks, &TaskFilter::from_value("call"), "bank");
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, "2");

        let visible = visible_tasks(&tasks, &TaskFilter::Pending, "call");
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, "1");

        let visible = visible_tasks(&tasks, &TaskFilter::All, "");
        assert_eq!(visible.len(), 3);
    }

    // =========================================================
    // 持久化格式测试
    // =========================================================

    #[test]
    fn blob_round_trips_with_camel_case_keys() {
        let tasks = vec![task("1", "Call Asha")];
        let raw = crate::serde_helper::to_json_string(&tasks).unwrap();
        assert!(raw.contains("\"dueDate\""));
        assert!(raw.contains("\"createdAt\""));
        assert!(raw.contains("\"follow_up\""));
        let back: Vec<LocalTask> = decode(&raw);
        assert_eq!(back, tasks);
    }

    #[test]
    fn corrupt_blob_decodes_to_empty_list() {
        let tasks: Vec<LocalTask> = decode("{definitely not json");
        assert!(tasks.is_empty());
        let tasks: Vec<LocalTask> = decode("42");
        assert!(tasks.is_empty());
    }

    #[test]
    fn reminder_blob_uses_related_type() {
        let reminder = Reminder {
            id: "169".to_string(),
            title: "Ping Vikram".to_string(),
            description: String::new(),
            due_date: "2026-08-12".to_string(),
            priority: Priority::High,
            related_to: "Vikram".to_string(),
            related_type: RelatedType::Contact,
            completed: false,
            created_at: "2026-08-07T10:00:00.000Z".to_string(),
        };
        let raw = crate::serde_helper::to_json_string(&vec![reminder.clone()]).unwrap();
        assert!(raw.contains("\"relatedType\":\"contact\""));
        let back: Vec<Reminder> = decode(&raw);
        assert_eq!(back[0], reminder);
    }
}
