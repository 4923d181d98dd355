//! View-state controller: owns all mutable client state and keeps the
//! task list, task detail, and MSL log renderers consistent with it.
//!
//! Every user action maps to one command method. State lives behind a
//! single mutex that is only held inside lock-scope blocks, never across
//! awaits; list/detail/log fetches carry per-panel generation stamps so
//! responses completing out of order are discarded instead of clobbering
//! newer data.

use std::sync::Arc;

use chrono::NaiveDate;
use shared::{
    domain::{FilterDimension, TaskId, TaskState, TaskView, UiBucket},
    protocol::{CreateMslEntryRequest, CreateTaskRequest, TaskRecord, UpdateTaskRequest},
};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::{
    error::ClientError,
    render::{
        group_tasks, MslLogRenderer, Notifier, TaskDetail, TaskDetailRenderer, TaskListRenderer,
    },
    ApiClient,
};

const EMPTY_TITLE_MESSAGE: &str = "Task title cannot be empty.";
const EMPTY_ENTRY_MESSAGE: &str = "MSL entry text cannot be empty.";
const COMPLETE_PROMPT: &str = "Are you sure you want to complete this task?";

/// Render collaborators the controller drives.
pub struct Renderers {
    pub task_list: Arc<dyn TaskListRenderer>,
    pub task_detail: Arc<dyn TaskDetailRenderer>,
    pub msl_log: Arc<dyn MslLogRenderer>,
    pub notifier: Arc<dyn Notifier>,
}

/// Client-side mirror of the selected task's editable fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditBuffer {
    pub title: String,
    pub summary: String,
    pub ui: UiBucket,
    pub due: Option<NaiveDate>,
    editable: bool,
}

impl EditBuffer {
    fn from_record(record: &TaskRecord) -> Self {
        Self {
            title: record.title.clone(),
            summary: record.summary.clone(),
            ui: record.ui,
            due: record.due.map(|datetime| datetime.date_naive()),
            editable: record.state == TaskState::Active,
        }
    }

    pub fn is_editable(&self) -> bool {
        self.editable
    }

    fn to_update_request(&self) -> UpdateTaskRequest {
        UpdateTaskRequest {
            title: self.title.clone(),
            summary: self.summary.clone(),
            ui: self.ui,
            // Empty date input maps to an explicit absent value.
            due: self
                .due
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .map(|naive| naive.and_utc()),
        }
    }
}

struct ViewState {
    view: TaskView,
    filter: FilterDimension,
    selected: Option<TaskId>,
    buffer: Option<EditBuffer>,
    /// Most recently loaded list for the current view; the selection
    /// invariant is checked against this.
    tasks: Vec<TaskRecord>,
    list_generation: u64,
    detail_generation: u64,
    log_generation: u64,
}

impl ViewState {
    fn new(filter: FilterDimension) -> Self {
        Self {
            view: TaskView::Active,
            filter,
            selected: None,
            buffer: None,
            tasks: Vec::new(),
            list_generation: 0,
            detail_generation: 0,
            log_generation: 0,
        }
    }

    fn clear_selection(&mut self) {
        self.selected = None;
        self.buffer = None;
    }

    fn contains(&self, id: &TaskId) -> bool {
        self.tasks.iter().any(|task| &task.id == id)
    }
}

pub struct ViewStateController {
    api: ApiClient,
    renderers: Renderers,
    state: Mutex<ViewState>,
}

impl ViewStateController {
    pub fn new(api: ApiClient, renderers: Renderers) -> Self {
        Self::with_filter(api, renderers, FilterDimension::default())
    }

    pub fn with_filter(api: ApiClient, renderers: Renderers, filter: FilterDimension) -> Self {
        Self {
            api,
            renderers,
            state: Mutex::new(ViewState::new(filter)),
        }
    }

    pub async fn view(&self) -> TaskView {
        self.state.lock().await.view
    }

    pub async fn filter(&self) -> FilterDimension {
        self.state.lock().await.filter
    }

    pub async fn selected(&self) -> Option<TaskId> {
        self.state.lock().await.selected.clone()
    }

    pub async fn buffer(&self) -> Option<EditBuffer> {
        self.state.lock().await.buffer.clone()
    }

    /// Switch between the active and completed lists. Clears the selection
    /// and both sub-panes, then reloads the list for the new view.
    pub async fn select_view(&self, view: TaskView) -> Result<(), ClientError> {
        {
            let mut state = self.state.lock().await;
            state.view = view;
            state.clear_selection();
        }
        self.clear_detail_panes();
        self.reload_tasks().await
    }

    /// Switch the grouping dimension. The underlying task set is
    /// unchanged, so the selection is preserved; only labels move.
    pub async fn select_filter(&self, dimension: FilterDimension) -> Result<(), ClientError> {
        {
            let mut state = self.state.lock().await;
            state.filter = dimension;
        }
        self.reload_tasks().await
    }

    /// Select a task: fetch its current detail, populate the edit buffer,
    /// render the detail pane with editability from the task's state, then
    /// load its MSL log. The id must reference a task in the most recently
    /// loaded list for the current view.
    pub async fn select_task(&self, id: TaskId) -> Result<(), ClientError> {
        let (in_view, generation) = {
            let mut state = self.state.lock().await;
            state.detail_generation += 1;
            (state.contains(&id), state.detail_generation)
        };
        if !in_view {
            return self.handle_missing_task(id).await;
        }

        let task = match self.api.fetch_task(&id).await {
            Ok(task) => task,
            Err(ClientError::NotFound(id)) => return self.handle_missing_task(id).await,
            Err(err) => return self.report(err),
        };

        {
            let mut state = self.state.lock().await;
            if state.detail_generation != generation {
                debug!(task_id = %id, "discarding stale task detail response");
                return Ok(());
            }
            state.selected = Some(id.clone());
            state.buffer = Some(EditBuffer::from_record(&task));
        }
        self.renderers
            .task_detail
            .render(&TaskDetail::from_record(task));
        self.reload_msl(&id).await
    }

    /// Create a task from a title. A trimmed-empty title fails validation
    /// before any network call; otherwise exactly one creation request is
    /// issued and, on success, exactly one list reload. The selection is
    /// unaffected. Callers clear their input only once this returns `Ok`.
    pub async fn create_task(&self, title: &str) -> Result<(), ClientError> {
        let title = title.trim();
        if title.is_empty() {
            return self.report(ClientError::validation(EMPTY_TITLE_MESSAGE));
        }
        if let Err(err) = self.api.create_task(&CreateTaskRequest::titled(title)).await {
            return self.report(err);
        }
        self.reload_tasks().await
    }

    /// Submit the edit buffer as a full update, then reload the list so a
    /// changed title or grouping is reflected. No-op without a selection
    /// or while the selected task is read-only.
    pub async fn save_task(&self) -> Result<(), ClientError> {
        let pending = {
            let state = self.state.lock().await;
            match (&state.selected, &state.buffer) {
                (Some(id), Some(buffer)) if buffer.is_editable() => {
                    Some((id.clone(), buffer.clone()))
                }
                _ => None,
            }
        };
        let Some((id, buffer)) = pending else {
            return Ok(());
        };
        if buffer.title.trim().is_empty() {
            return self.report(ClientError::validation(EMPTY_TITLE_MESSAGE));
        }
        if let Err(err) = self.api.update_task(&id, &buffer.to_update_request()).await {
            return self.report(err);
        }
        self.renderers.notifier.info("Task updated successfully!");
        self.reload_tasks().await
    }

    /// Complete the selected task after a synchronous confirmation gate.
    /// On success the selection is cleared, the detail/MSL panes reset,
    /// and the list reloaded (the task moves to the completed view).
    pub async fn complete_task(&self) -> Result<(), ClientError> {
        let id = {
            let state = self.state.lock().await;
            match &state.selected {
                Some(id) => id.clone(),
                None => return Ok(()),
            }
        };
        if !self.renderers.notifier.confirm(COMPLETE_PROMPT) {
            debug!(task_id = %id, "task completion declined");
            return Ok(());
        }
        if let Err(err) = self.api.complete_task(&id).await {
            return self.report(err);
        }
        {
            let mut state = self.state.lock().await;
            state.clear_selection();
        }
        self.clear_detail_panes();
        self.renderers.notifier.info("Task marked as complete!");
        self.reload_tasks().await
    }

    /// Append an MSL entry to the selected task, then reload only the MSL
    /// log. No-op without a selection; trimmed-empty text fails validation
    /// before any network call.
    pub async fn add_msl_entry(&self, text: &str) -> Result<(), ClientError> {
        let id = {
            let state = self.state.lock().await;
            match &state.selected {
                Some(id) => id.clone(),
                None => return Ok(()),
            }
        };
        let text = text.trim();
        if text.is_empty() {
            return self.report(ClientError::validation(EMPTY_ENTRY_MESSAGE));
        }
        let request = CreateMslEntryRequest {
            task_id: id.clone(),
            text: text.to_string(),
        };
        if let Err(err) = self.api.create_msl_entry(&request).await {
            return self.report(err);
        }
        self.reload_msl(&id).await
    }

    /// Buffer setters are accepted only while a selected, active task's
    /// buffer exists; a completed task's form is read-only.
    pub async fn edit_title(&self, title: impl Into<String>) -> bool {
        let title = title.into();
        self.update_buffer(|buffer| buffer.title = title).await
    }

    pub async fn edit_summary(&self, summary: impl Into<String>) -> bool {
        let summary = summary.into();
        self.update_buffer(|buffer| buffer.summary = summary).await
    }

    pub async fn edit_bucket(&self, ui: UiBucket) -> bool {
        self.update_buffer(|buffer| buffer.ui = ui).await
    }

    pub async fn edit_due(&self, due: Option<NaiveDate>) -> bool {
        self.update_buffer(|buffer| buffer.due = due).await
    }

    /// Reload the task list for the current view and filter. A response
    /// arriving after a newer reload was issued is discarded. On success
    /// the selection invariant is re-checked: a selected task missing from
    /// the fresh list clears the selection and resets the sub-panes.
    pub async fn reload_tasks(&self) -> Result<(), ClientError> {
        let (view, filter, generation) = {
            let mut state = self.state.lock().await;
            state.list_generation += 1;
            (state.view, state.filter, state.list_generation)
        };
        debug!(?view, ?filter, "loading task list");

        let tasks = match self.api.list_tasks(view, filter).await {
            Ok(tasks) => tasks,
            Err(err) => return self.report(err),
        };

        let (groups, dropped_selection) = {
            let mut state = self.state.lock().await;
            if state.list_generation != generation {
                debug!(generation, "discarding stale task list response");
                return Ok(());
            }
            state.tasks = tasks;
            let dropped = match &state.selected {
                Some(id) if !state.contains(id) => {
                    state.clear_selection();
                    true
                }
                _ => false,
            };
            (group_tasks(&state.tasks, state.filter), dropped)
        };
        if dropped_selection {
            self.clear_detail_panes();
        }
        self.renderers.task_list.render(view, &groups);
        Ok(())
    }

    /// Reload the MSL log for a task. Discarded if a newer log fetch was
    /// issued or the selection moved while this one was in flight.
    pub async fn reload_msl(&self, task_id: &TaskId) -> Result<(), ClientError> {
        let generation = {
            let mut state = self.state.lock().await;
            state.log_generation += 1;
            state.log_generation
        };
        let entries = match self.api.list_msl_entries(task_id).await {
            Ok(entries) => entries,
            Err(err) => return self.report(err),
        };
        {
            let state = self.state.lock().await;
            if state.log_generation != generation || state.selected.as_ref() != Some(task_id) {
                debug!(task_id = %task_id, "discarding stale MSL log response");
                return Ok(());
            }
        }
        self.renderers.msl_log.render(&entries);
        Ok(())
    }

    async fn update_buffer(&self, apply: impl FnOnce(&mut EditBuffer)) -> bool {
        let mut state = self.state.lock().await;
        match state.buffer.as_mut().filter(|buffer| buffer.editable) {
            Some(buffer) => {
                apply(buffer);
                true
            }
            None => false,
        }
    }

    async fn handle_missing_task(&self, id: TaskId) -> Result<(), ClientError> {
        {
            let mut state = self.state.lock().await;
            state.clear_selection();
        }
        self.clear_detail_panes();
        self.report(ClientError::NotFound(id))
    }

    /// Single failure path: one user-visible alert, one log record, and
    /// the error handed back to the caller. Nothing is retried.
    fn report(&self, err: ClientError) -> Result<(), ClientError> {
        warn!(error = %err, "command failed");
        self.renderers.notifier.alert(&err.user_message());
        Err(err)
    }

    fn clear_detail_panes(&self) {
        self.renderers.task_detail.clear();
        self.renderers.msl_log.clear();
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
