use std::{
    collections::HashMap,
    sync::{Arc, Mutex as StdMutex},
};

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use super::*;

async fn spawn_server(app: Router) -> String {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{addr}")
}

fn task_json(id: &str, title: &str, state: i64) -> Value {
    json!({
        "ID": id,
        "Title": title,
        "Summary": "",
        "UI": 1,
        "Due": "2024-05-01T00:00:00",
        "State": state,
        "Filter_UI_Text": "---Urgent + Important---",
        "Filter_Date_Text": "---This Week---",
        "Date_Opened": "2024-04-20T08:15:00",
        "Date_Closed": null,
        "Creator_Username": "mara",
        "Closor_Username": null,
    })
}

#[tokio::test]
async fn list_tasks_sends_filter_dimension_query() {
    let seen_filter: Arc<StdMutex<Option<String>>> = Arc::default();
    let seen_clone = Arc::clone(&seen_filter);
    let app = Router::new().route(
        "/api/tasks",
        get(move |Query(params): Query<HashMap<String, String>>| {
            let seen = Arc::clone(&seen_clone);
            async move {
                *seen.lock().unwrap() = params.get("filter_by").cloned();
                Json(json!([task_json("t1", "one", 1), task_json("t2", "two", 1)]))
            }
        }),
    );
    let server_url = spawn_server(app).await;

    let client = ApiClient::new(server_url);
    let tasks = client
        .list_tasks(TaskView::Active, FilterDimension::Due)
        .await
        .expect("list");

    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0].id.as_str(), "t1");
    assert_eq!(seen_filter.lock().unwrap().as_deref(), Some("Filter_Date"));
}

#[tokio::test]
async fn completed_view_uses_completed_endpoint() {
    let app = Router::new().route(
        "/api/tasks/completed",
        get(|| async { Json(json!([task_json("t9", "old", 0)])) }),
    );
    let server_url = spawn_server(app).await;

    let client = ApiClient::new(server_url);
    let tasks = client
        .list_tasks(TaskView::Completed, FilterDimension::Ui)
        .await
        .expect("list completed");

    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].state, shared::domain::TaskState::Completed);
}

#[tokio::test]
async fn fetch_task_maps_missing_task_to_not_found() {
    let app = Router::new().route(
        "/api/task/:id",
        get(|Path(_id): Path<String>| async {
            (
                StatusCode::NOT_FOUND,
                Json(json!({"error": "Task not found"})),
            )
        }),
    );
    let server_url = spawn_server(app).await;

    let client = ApiClient::new(server_url);
    let err = client
        .fetch_task(&TaskId::new("gone1234"))
        .await
        .expect_err("must fail");
    assert!(matches!(err, ClientError::NotFound(id) if id.as_str() == "gone1234"));
}

#[tokio::test]
async fn create_task_posts_only_the_title() {
    let body_seen: Arc<StdMutex<Option<Value>>> = Arc::default();
    let body_clone = Arc::clone(&body_seen);
    let app = Router::new().route(
        "/api/task",
        post(move |Json(body): Json<Value>| {
            let seen = Arc::clone(&body_clone);
            async move {
                *seen.lock().unwrap() = Some(body.clone());
                let title = body["Title"].as_str().unwrap_or_default().to_string();
                (StatusCode::CREATED, Json(task_json("n1", &title, 1)))
            }
        }),
    );
    let server_url = spawn_server(app).await;

    let client = ApiClient::new(server_url);
    let task = client
        .create_task(&CreateTaskRequest::titled("Replace pump seals"))
        .await
        .expect("create");

    assert_eq!(task.title, "Replace pump seals");
    let body = body_seen.lock().unwrap().clone().expect("body");
    let object = body.as_object().expect("object");
    assert_eq!(object.len(), 1, "only Title is sent: {object:?}");
}

#[tokio::test]
async fn update_task_sends_explicit_null_due() {
    let body_seen: Arc<StdMutex<Option<Value>>> = Arc::default();
    let body_clone = Arc::clone(&body_seen);
    let app = Router::new().route(
        "/api/task/:id",
        put(move |Path(id): Path<String>, Json(body): Json<Value>| {
            let seen = Arc::clone(&body_clone);
            async move {
                *seen.lock().unwrap() = Some(body);
                Json(task_json(&id, "updated", 1))
            }
        }),
    );
    let server_url = spawn_server(app).await;

    let client = ApiClient::new(server_url);
    let request = UpdateTaskRequest {
        title: "updated".into(),
        summary: "details".into(),
        ui: shared::domain::UiBucket::ImportantNotUrgent,
        due: None,
    };
    client
        .update_task(&TaskId::new("t1"), &request)
        .await
        .expect("update");

    let body = body_seen.lock().unwrap().clone().expect("body");
    assert_eq!(body["Due"], Value::Null);
    assert_eq!(body["UI"], json!(2));
}

#[tokio::test]
async fn server_error_message_is_surfaced() {
    let app = Router::new().route(
        "/api/task",
        post(|| async {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "database exploded"})),
            )
        }),
    );
    let server_url = spawn_server(app).await;

    let client = ApiClient::new(server_url);
    let err = client
        .create_task(&CreateTaskRequest::titled("x"))
        .await
        .expect_err("must fail");

    match err {
        ClientError::Api { status, message } => {
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(message, "database exploded");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn error_without_body_falls_back_to_status_text() {
    let app = Router::new().route(
        "/api/tasks",
        get(|| async { (StatusCode::BAD_GATEWAY, "upstream sad") }),
    );
    let server_url = spawn_server(app).await;

    let client = ApiClient::new(server_url);
    let err = client
        .list_tasks(TaskView::Active, FilterDimension::Ui)
        .await
        .expect_err("must fail");

    match err {
        ClientError::Api { message, .. } => assert_eq!(message, "Bad Gateway"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn complete_task_accepts_non_json_ack() {
    let app = Router::new().route(
        "/api/task/:id/complete",
        post(|| async { "completed, thanks" }),
    );
    let server_url = spawn_server(app).await;

    let client = ApiClient::new(server_url);
    client
        .complete_task(&TaskId::new("t1"))
        .await
        .expect("complete");
}

#[tokio::test]
async fn msl_entries_parse_sentinel_dates_and_submitters() {
    let app = Router::new().route(
        "/api/msl_entries/:id",
        get(|Path(id): Path<String>| async move {
            Json(json!([
                {
                    "EntryID": "e1",
                    "TaskID": id,
                    "Date": "2024-05-02T10:00:00",
                    "Text": "called the vendor",
                    "Submitter_Username": "mara",
                    "Submitter_FullName": "Mara Voss",
                },
                {
                    "EntryID": "e2",
                    "TaskID": "t1",
                    "Date": "0000-00-00 00:00:00",
                    "Text": "imported from legacy sheet",
                    "Submitter_Username": "import-bot",
                    "Submitter_FullName": null,
                },
            ]))
        }),
    );
    let server_url = spawn_server(app).await;

    let client = ApiClient::new(server_url);
    let entries = client
        .list_msl_entries(&TaskId::new("t1"))
        .await
        .expect("entries");

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].submitter_display(), "Mara Voss");
    assert_eq!(entries[1].submitter_display(), "import-bot");
    assert_eq!(entries[1].date, None);
}
