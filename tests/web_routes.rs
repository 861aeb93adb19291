//! HTTP surface tests: build the router over a temp data file and send
//! requests through `tower::ServiceExt::oneshot`.

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use tempfile::TempDir;
use tower::ServiceExt;

use career_todo::model::{Category, Priority};
use career_todo::store::TaskStore;
use career_todo::web::router;

fn setup() -> (TempDir, TaskStore) {
    let tmp = TempDir::new().expect("tempdir");
    let store = TaskStore::open(tmp.path().join("todos.json"));
    (tmp, store)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn form_post(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_text(resp: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn assert_redirects_home(resp: &axum::response::Response) {
    assert!(resp.status().is_redirection(), "status {}", resp.status());
    assert_eq!(resp.headers()[header::LOCATION], "/");
}

#[tokio::test]
async fn progress_is_zero_when_empty() {
    let (_tmp, store) = setup();
    let resp = router(store).oneshot(get("/progress")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_text(resp).await, "0");
}

#[tokio::test]
async fn add_creates_task_and_redirects() {
    let (_tmp, store) = setup();
    let body = "title=Mock+interview&category=%EB%A9%B4%EC%A0%91&priority=%EC%83%81&due_date=2026-03-05";
    let resp = router(store.clone())
        .oneshot(form_post("/add", body))
        .await
        .unwrap();
    assert_redirects_home(&resp);

    let tasks = store.load().unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].title, "Mock interview");
    assert_eq!(tasks[0].category, Category::Interview);
    assert_eq!(tasks[0].priority, Priority::High);
    assert_eq!(tasks[0].due_date.unwrap().to_string(), "2026-03-05");

    let resp = router(store).oneshot(get("/")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_text(resp).await.contains("Mock interview"));
}

#[tokio::test]
async fn add_without_title_or_with_bad_date_is_ignored() {
    let (_tmp, store) = setup();
    let resp = router(store.clone())
        .oneshot(form_post("/add", "title=&category=x&priority=y&due_date="))
        .await
        .unwrap();
    assert_redirects_home(&resp);

    let resp = router(store.clone())
        .oneshot(form_post("/add", "title=t&due_date=2026-02-30"))
        .await
        .unwrap();
    assert_redirects_home(&resp);
    assert!(store.load().unwrap().is_empty());
}

#[tokio::test]
async fn unknown_labels_use_defaults() {
    let (_tmp, store) = setup();
    router(store.clone())
        .oneshot(form_post("/add", "title=t&category=hobby&priority=urgent&due_date="))
        .await
        .unwrap();
    let task = &store.load().unwrap()[0];
    assert_eq!(task.category, Category::Other);
    assert_eq!(task.priority, Priority::Medium);
    assert_eq!(task.due_date, None);
}

#[tokio::test]
async fn toggle_delete_and_progress() {
    let (_tmp, store) = setup();
    for title in ["a", "b", "c"] {
        router(store.clone())
            .oneshot(form_post("/add", &format!("title={title}")))
            .await
            .unwrap();
    }

    let resp = router(store.clone()).oneshot(get("/toggle/2")).await.unwrap();
    assert_redirects_home(&resp);
    let resp = router(store.clone()).oneshot(get("/progress")).await.unwrap();
    assert_eq!(body_text(resp).await, "33.3%");

    // Unknown ids are silently ignored.
    let resp = router(store.clone()).oneshot(get("/toggle/99")).await.unwrap();
    assert_redirects_home(&resp);
    let resp = router(store.clone()).oneshot(get("/delete/99")).await.unwrap();
    assert_redirects_home(&resp);

    let resp = router(store.clone()).oneshot(get("/delete/1")).await.unwrap();
    assert_redirects_home(&resp);
    let ids: Vec<u32> = store.load().unwrap().iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![2, 3]);

    let resp = router(store).oneshot(get("/progress")).await.unwrap();
    assert_eq!(body_text(resp).await, "50.0%");
}

#[tokio::test]
async fn index_filters_by_mode() {
    let (_tmp, store) = setup();
    for title in ["open-one", "done-one"] {
        router(store.clone())
            .oneshot(form_post("/add", &format!("title={title}")))
            .await
            .unwrap();
    }
    router(store.clone()).oneshot(get("/toggle/2")).await.unwrap();

    let resp = router(store).oneshot(get("/?mode=open")).await.unwrap();
    let html = body_text(resp).await;
    assert!(html.contains("open-one"));
    assert!(!html.contains("done-one"));
}

#[tokio::test]
async fn unknown_category_mode_shows_nothing() {
    let (_tmp, store) = setup();
    router(store.clone())
        .oneshot(form_post("/add", "title=anything"))
        .await
        .unwrap();

    let resp = router(store.clone())
        .oneshot(get("/?mode=category:hobby"))
        .await
        .unwrap();
    let html = body_text(resp).await;
    assert!(!html.contains("anything"));
    assert!(html.contains("showing category:hobby"));

    let resp = router(store).oneshot(get("/?mode=hobby")).await.unwrap();
    assert!(body_text(resp).await.contains("anything"));
}
