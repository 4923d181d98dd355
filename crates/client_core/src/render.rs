//! Render-collaborator seams and the pure presentation transforms the
//! controller feeds them.

use std::{borrow::Cow, collections::HashMap};

use shared::{
    domain::{FilterDimension, TaskId, TaskState, TaskView},
    protocol::{MslEntryRecord, TaskRecord},
};

/// Marker appended to a completed task's display title.
pub const COMPLETED_MARKER: &str = " (Completed)";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskListItem {
    pub id: TaskId,
    pub title: String,
    pub state: TaskState,
}

impl TaskListItem {
    pub fn from_record(record: &TaskRecord) -> Self {
        Self {
            id: record.id.clone(),
            title: record.title.clone(),
            state: record.state,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.state == TaskState::Completed
    }

    /// Presentation only: completed tasks get a completion marker. The
    /// underlying task data is never altered.
    pub fn display_title(&self) -> Cow<'_, str> {
        match self.state {
            TaskState::Active => Cow::Borrowed(&self.title),
            TaskState::Completed => Cow::Owned(format!("{}{COMPLETED_MARKER}", self.title)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskGroup {
    pub label: String,
    pub tasks: Vec<TaskListItem>,
}

/// Single-pass grouping: one header per distinct label, in first-seen
/// order. Label boundaries follow the server-provided order; nothing is
/// re-sorted client-side.
pub fn group_tasks(tasks: &[TaskRecord], dimension: FilterDimension) -> Vec<TaskGroup> {
    let mut groups: Vec<TaskGroup> = Vec::new();
    let mut slot_by_label: HashMap<String, usize> = HashMap::new();
    for task in tasks {
        let label = task.group_label(dimension);
        let slot = match slot_by_label.get(label) {
            Some(&slot) => slot,
            None => {
                slot_by_label.insert(label.to_string(), groups.len());
                groups.push(TaskGroup {
                    label: label.to_string(),
                    tasks: Vec::new(),
                });
                groups.len() - 1
            }
        };
        groups[slot].tasks.push(TaskListItem::from_record(task));
    }
    groups
}

/// Detail-pane payload. `editable` gates the form: only an active task's
/// fields may be edited.
#[derive(Debug, Clone)]
pub struct TaskDetail {
    pub task: TaskRecord,
    pub editable: bool,
}

impl TaskDetail {
    pub fn from_record(task: TaskRecord) -> Self {
        let editable = task.state == TaskState::Active;
        Self { task, editable }
    }
}

pub trait TaskListRenderer: Send + Sync {
    fn render(&self, view: TaskView, groups: &[TaskGroup]);
}

pub trait TaskDetailRenderer: Send + Sync {
    fn render(&self, detail: &TaskDetail);
    /// Reset to the empty "select a task" state.
    fn clear(&self);
}

pub trait MslLogRenderer: Send + Sync {
    fn render(&self, entries: &[MslEntryRecord]);
    fn clear(&self);
}

/// Blocking user notifications: failure alerts, success notices, and the
/// synchronous yes/no gate guarding task completion.
pub trait Notifier: Send + Sync {
    fn alert(&self, message: &str);
    fn info(&self, message: &str);
    fn confirm(&self, prompt: &str) -> bool;
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn record(id: &str, title: &str, label: &str, state: i64) -> TaskRecord {
        serde_json::from_value(json!({
            "ID": id,
            "Title": title,
            "State": state,
            "Filter_UI_Text": label,
            "Filter_Date_Text": "---Later---",
        }))
        .expect("record")
    }

    #[test]
    fn grouping_is_stable_and_first_seen_order() {
        let tasks = vec![
            record("1", "one", "A", 1),
            record("2", "two", "A", 1),
            record("3", "three", "B", 1),
        ];
        let groups = group_tasks(&tasks, FilterDimension::Ui);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].label, "A");
        assert_eq!(
            groups[0]
                .tasks
                .iter()
                .map(|item| item.id.as_str())
                .collect::<Vec<_>>(),
            ["1", "2"]
        );
        assert_eq!(groups[1].label, "B");
        assert_eq!(groups[1].tasks[0].id.as_str(), "3");
    }

    #[test]
    fn grouping_follows_selected_dimension() {
        let tasks = vec![record("1", "one", "A", 1)];
        let groups = group_tasks(&tasks, FilterDimension::Due);
        assert_eq!(groups[0].label, "---Later---");
    }

    #[test]
    fn completed_items_get_display_marker_only() {
        let item = TaskListItem::from_record(&record("1", "done thing", "A", 0));
        assert!(item.is_completed());
        assert_eq!(item.display_title(), "done thing (Completed)");
        // Task data itself is untouched.
        assert_eq!(item.title, "done thing");
    }

    #[test]
    fn detail_editability_follows_state() {
        assert!(TaskDetail::from_record(record("1", "t", "A", 1)).editable);
        assert!(!TaskDetail::from_record(record("1", "t", "A", 0)).editable);
    }
}
