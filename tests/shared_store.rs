//! The console and the web form read and write the same file.

use axum::body::Body;
use axum::http::Request;
use tempfile::TempDir;
use tower::ServiceExt;

use career_todo::console::Console;
use career_todo::ops::{self, Mode};
use career_todo::store::TaskStore;
use career_todo::web::router;

#[tokio::test]
async fn console_changes_are_visible_to_web() {
    let tmp = TempDir::new().unwrap();
    let store = TaskStore::open(tmp.path().join("todos.json"));

    // Seed samples, then mark task 2 done.
    let mut out = Vec::new();
    Console::new(&store, "13\n9\n2\n0\n".as_bytes(), &mut out)
        .run()
        .unwrap();

    let resp = router(store.clone())
        .oneshot(Request::get("/progress").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"20.0%");

    router(store.clone())
        .oneshot(Request::get("/delete/1").body(Body::empty()).unwrap())
        .await
        .unwrap();

    let open = ops::list_tasks(&store, &Mode::Open).unwrap();
    assert_eq!(open.iter().map(|t| t.id).collect::<Vec<_>>(), vec![3, 4, 5]);
}
