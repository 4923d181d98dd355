//! Typed client for the task board REST backend, plus the view-state
//! controller that keeps the render collaborators in sync with it.

use reqwest::{header, Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use shared::{
    domain::{FilterDimension, TaskId, TaskView},
    error::ErrorBody,
    protocol::{
        CompleteAck, CreateMslEntryRequest, CreateTaskRequest, MslEntryRecord, TaskRecord,
        UpdateTaskRequest,
    },
};
use tracing::debug;

pub mod controller;
pub mod error;
pub mod render;

pub use controller::{EditBuffer, Renderers, ViewStateController};
pub use error::ClientError;
pub use render::{
    group_tasks, MslLogRenderer, Notifier, TaskDetail, TaskDetailRenderer, TaskGroup,
    TaskListItem, TaskListRenderer,
};

/// Thin typed wrapper over the backend's HTTP/JSON endpoints.
///
/// Response contract: success responses with a JSON content type are
/// parsed as JSON, anything else is read as raw text; non-2xx responses
/// are parsed for the server's own error message (`error`, then
/// `message`), falling back to the HTTP status text, and always abort the
/// calling operation with an `Err`.
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            http: Client::new(),
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn list_tasks(
        &self,
        view: TaskView,
        dimension: FilterDimension,
    ) -> Result<Vec<TaskRecord>, ClientError> {
        let path = match view {
            TaskView::Active => "/api/tasks",
            TaskView::Completed => "/api/tasks/completed",
        };
        let response = self
            .http
            .get(format!("{}{path}", self.base_url))
            .query(&[("filter_by", dimension.query_value())])
            .send()
            .await?;
        decode_json(response).await
    }

    /// Dedicated single-task fetch; a 404 maps to `ClientError::NotFound`.
    pub async fn fetch_task(&self, id: &TaskId) -> Result<TaskRecord, ClientError> {
        let response = self
            .http
            .get(format!("{}/api/task/{id}", self.base_url))
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound(id.clone()));
        }
        decode_json(response).await
    }

    pub async fn create_task(
        &self,
        request: &CreateTaskRequest,
    ) -> Result<TaskRecord, ClientError> {
        let response = self
            .http
            .post(format!("{}/api/task", self.base_url))
            .json(request)
            .send()
            .await?;
        decode_json(response).await
    }

    pub async fn update_task(
        &self,
        id: &TaskId,
        request: &UpdateTaskRequest,
    ) -> Result<TaskRecord, ClientError> {
        let response = self
            .http
            .put(format!("{}/api/task/{id}", self.base_url))
            .json(request)
            .send()
            .await?;
        decode_json(response).await
    }

    pub async fn complete_task(&self, id: &TaskId) -> Result<(), ClientError> {
        let response = self
            .http
            .post(format!("{}/api/task/{id}/complete", self.base_url))
            .send()
            .await?;
        let response = check_status(response).await?;
        // The current backend acks with JSON, but the contract only
        // promises JSON for JSON content types.
        if is_json(&response) {
            let ack: CompleteAck = response.json().await?;
            if let Some(ack_message) = ack.message {
                debug!(task_id = %id, ack = %ack_message, "task completion acknowledged");
            }
        } else {
            let body = response.text().await?;
            debug!(task_id = %id, ack = %body, "task completion acknowledged");
        }
        Ok(())
    }

    pub async fn list_msl_entries(
        &self,
        task_id: &TaskId,
    ) -> Result<Vec<MslEntryRecord>, ClientError> {
        let response = self
            .http
            .get(format!("{}/api/msl_entries/{task_id}", self.base_url))
            .send()
            .await?;
        decode_json(response).await
    }

    pub async fn create_msl_entry(
        &self,
        request: &CreateMslEntryRequest,
    ) -> Result<MslEntryRecord, ClientError> {
        let response = self
            .http
            .post(format!("{}/api/msl_entry", self.base_url))
            .json(request)
            .send()
            .await?;
        decode_json(response).await
    }
}

fn is_json(response: &Response) -> bool {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.contains("application/json"))
}

/// Maps a non-2xx response to `ClientError::Api`, preferring the server's
/// own error message over the HTTP status text.
async fn check_status(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let fallback = status
        .canonical_reason()
        .unwrap_or("request failed")
        .to_string();
    let message = response
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(ErrorBody::into_message)
        .unwrap_or(fallback);
    Err(ClientError::Api { status, message })
}

async fn decode_json<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let response = check_status(response).await?;
    Ok(response.json().await?)
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
