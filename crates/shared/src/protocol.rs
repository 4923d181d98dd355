use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    datetime,
    domain::{EntryId, FilterDimension, TaskId, TaskState, UiBucket},
};

fn default_state() -> TaskState {
    TaskState::Active
}

/// A task as the backend serializes it: PascalCase field names straight
/// from the `Tasks` table, plus the two derived grouping labels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskRecord {
    #[serde(rename = "ID")]
    pub id: TaskId,
    #[serde(rename = "Title", default)]
    pub title: String,
    #[serde(rename = "Summary", default)]
    pub summary: String,
    #[serde(rename = "UI", default)]
    pub ui: UiBucket,
    #[serde(rename = "Due", default, with = "datetime::sentinel_date_serde")]
    pub due: Option<DateTime<Utc>>,
    #[serde(rename = "State", default = "default_state")]
    pub state: TaskState,
    #[serde(rename = "Filter_UI_Text", default)]
    pub filter_ui_text: String,
    #[serde(rename = "Filter_Date_Text", default)]
    pub filter_date_text: String,
    #[serde(rename = "Date_Opened", default, with = "datetime::sentinel_date_serde")]
    pub date_opened: Option<DateTime<Utc>>,
    #[serde(rename = "Date_Closed", default, with = "datetime::sentinel_date_serde")]
    pub date_closed: Option<DateTime<Utc>>,
    #[serde(rename = "Creator_Username", default)]
    pub creator_username: Option<String>,
    #[serde(rename = "Closor_Username", default)]
    pub closor_username: Option<String>,
}

impl TaskRecord {
    /// Grouping label for the given filter dimension. The label text is
    /// server-derived; list endpoints populate it, the single-task endpoint
    /// may not.
    pub fn group_label(&self, dimension: FilterDimension) -> &str {
        match dimension {
            FilterDimension::Ui => &self.filter_ui_text,
            FilterDimension::Due => &self.filter_date_text,
        }
    }
}

/// One entry of a task's MSL (status/communication) log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MslEntryRecord {
    #[serde(rename = "EntryID")]
    pub entry_id: EntryId,
    #[serde(rename = "TaskID")]
    pub task_id: TaskId,
    #[serde(rename = "Date", default, with = "datetime::sentinel_date_serde")]
    pub date: Option<DateTime<Utc>>,
    #[serde(rename = "Text", default)]
    pub text: String,
    #[serde(rename = "Submitter_Username", default)]
    pub submitter_username: Option<String>,
    #[serde(rename = "Submitter_FullName", default)]
    pub submitter_full_name: Option<String>,
}

impl MslEntryRecord {
    /// Attribution for display: full name, falling back to username.
    pub fn submitter_display(&self) -> &str {
        self.submitter_full_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .or(self.submitter_username.as_deref())
            .unwrap_or("unknown")
    }
}

/// Body of `POST /api/task`. Only the title is required; the backend fills
/// defaults for anything omitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTaskRequest {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Summary", default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(rename = "UI", default, skip_serializing_if = "Option::is_none")]
    pub ui: Option<UiBucket>,
    #[serde(
        rename = "Due",
        default,
        with = "datetime::sentinel_date_serde",
        skip_serializing_if = "Option::is_none"
    )]
    pub due: Option<DateTime<Utc>>,
}

impl CreateTaskRequest {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            summary: None,
            ui: None,
            due: None,
        }
    }
}

/// Body of `PUT /api/task/<id>`: a full update of the editable fields.
/// `Due` is always present, as an explicit `null` when unset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateTaskRequest {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Summary")]
    pub summary: String,
    #[serde(rename = "UI")]
    pub ui: UiBucket,
    #[serde(rename = "Due", default, with = "datetime::sentinel_date_serde")]
    pub due: Option<DateTime<Utc>>,
}

/// Body of `POST /api/msl_entry`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMslEntryRequest {
    #[serde(rename = "TaskID")]
    pub task_id: TaskId,
    #[serde(rename = "Text")]
    pub text: String,
}

/// JSON acknowledgement of `POST /api/task/<id>/complete`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompleteAck {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
