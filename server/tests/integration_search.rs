use axum::body::{Body, Bytes};
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use std::time::Duration;
use stemdex_core::{IndexError, Language};
use stemdex_server::{build_app, AppState};
use tempfile::tempdir;
use tower::ServiceExt;

fn write_corpus(dir: &Path) {
    let docs = dir.join("docs");
    fs::create_dir_all(&docs).unwrap();
    fs::write(docs.join("DocA.txt"), "Ana are mere").unwrap();
    fs::write(docs.join("DocB.txt"), "Ana are ana").unwrap();
    fs::write(docs.join("notes.md"), "ana ana ana").unwrap();
    fs::write(dir.join("stop.txt"), "are\n").unwrap();
}

async fn call(app: &Router, req: Request<Body>) -> (StatusCode, Bytes) {
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let body = resp.into_body().collect().await.unwrap().to_bytes();
    (status, body)
}

async fn get_json(app: &Router, uri: &str) -> Value {
    let (status, body) = call(app, Request::get(uri).body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    serde_json::from_slice(&body).unwrap()
}

fn post_index(dir: &Path, token: Option<&str>) -> Request<Body> {
    let payload = json!({
        "language": "english",
        "docs": dir.join("docs"),
        "stop_words": dir.join("stop.txt"),
    });
    let mut req = Request::post("/index").header("content-type", "application/json");
    if let Some(t) = token {
        req = req.header("X-ADMIN-TOKEN", t);
    }
    req.body(Body::from(payload.to_string())).unwrap()
}

async fn wait_for_build(app: &Router) -> Value {
    for _ in 0..500 {
        let status = get_json(app, "/index/status?language=english").await;
        if !status["running"].as_bool().unwrap() && !status["last"]["finished_at"].is_null() {
            return status;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("index build did not finish");
}

#[tokio::test]
async fn build_then_search_returns_ranked_results() {
    let dir = tempdir().unwrap();
    write_corpus(dir.path());
    let app = build_app(AppState::new(None));

    let (status, _) = call(&app, post_index(dir.path(), None)).await;
    assert_eq!(status, StatusCode::ACCEPTED);

    let status = wait_for_build(&app).await;
    assert_eq!(status["documents"], 2);
    assert_eq!(status["last"]["report"]["skipped"][0]["key"], "notes.md");
    assert!(status["current"].is_null());

    let json = get_json(&app, "/search?q=ana&language=english").await;
    let arr = json["results"].as_array().unwrap();
    assert_eq!(json["total_hits"], 2);
    assert_eq!(arr[0]["document"], "DocB.txt");
    assert_eq!(arr[0]["score"], 2);
    assert_eq!(arr[0]["counts"][0]["term"], "ana");
    assert_eq!(arr[1]["document"], "DocA.txt");

    let json = get_json(&app, "/search?q=are").await;
    assert_eq!(json["total_hits"], 0);

    let json = get_json(&app, "/search?q=ana&k=1").await;
    assert_eq!(json["total_hits"], 2);
    assert_eq!(json["results"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn languages_are_served_by_separate_engines() {
    let dir = tempdir().unwrap();
    write_corpus(dir.path());
    let app = build_app(AppState::new(None));

    call(&app, post_index(dir.path(), None)).await;
    wait_for_build(&app).await;

    let json = get_json(&app, "/search?q=ana&language=romanian").await;
    assert_eq!(json["total_hits"], 0);
    let status = get_json(&app, "/index/status?language=romanian").await;
    assert_eq!(status["documents"], 0);
    assert!(status["last"]["finished_at"].is_null());
}

#[tokio::test]
async fn missing_stop_words_are_reported() {
    let dir = tempdir().unwrap();
    write_corpus(dir.path());
    fs::remove_file(dir.path().join("stop.txt")).unwrap();
    let app = build_app(AppState::new(None));

    let (status, _) = call(&app, post_index(dir.path(), None)).await;
    assert_eq!(status, StatusCode::ACCEPTED);
    let status = wait_for_build(&app).await;
    assert!(status["last"]["error"].as_str().unwrap().contains("stop words"));
    assert!(status["last"]["report"].is_null());
    assert_eq!(status["documents"], 0);
}

#[tokio::test]
async fn admin_token_guards_build_and_cancel() {
    let dir = tempdir().unwrap();
    write_corpus(dir.path());
    let app = build_app(AppState::new(Some("secret".into())));

    let (status, _) = call(&app, post_index(dir.path(), None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = call(&app, post_index(dir.path(), Some("wrong"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let cancel = Request::post("/index/cancel?language=english").body(Body::empty()).unwrap();
    let (status, _) = call(&app, cancel).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = call(&app, post_index(dir.path(), Some("secret"))).await;
    assert_eq!(status, StatusCode::ACCEPTED);
    wait_for_build(&app).await;

    let cancel = Request::post("/index/cancel?language=english")
        .header("X-ADMIN-TOKEN", "secret")
        .body(Body::empty())
        .unwrap();
    let (status, body) = call(&app, cancel).await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["cancel_requested"], false);
}

#[tokio::test]
async fn bad_documents_directory_is_rejected() {
    let dir = tempdir().unwrap();
    let app = build_app(AppState::new(None));
    let (status, _) = call(&app, post_index(&dir.path().join("missing"), None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn build_request_conflicts_with_a_claimed_engine() {
    let dir = tempdir().unwrap();
    write_corpus(dir.path());
    let state = AppState::new(None);
    let app = build_app(state.clone());

    let ticket = state.english.reserve().unwrap();
    let (status, _) = call(&app, post_index(dir.path(), None)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    let status = get_json(&app, "/index/status?language=english").await;
    assert_eq!(status["running"], true);
    assert!(status["last"]["finished_at"].is_null());

    drop(ticket);
    let (status, _) = call(&app, post_index(dir.path(), None)).await;
    assert_eq!(status, StatusCode::ACCEPTED);
    let status = wait_for_build(&app).await;
    assert_eq!(status["documents"], 2);
}

#[tokio::test]
async fn concurrent_build_requests_start_one_build() {
    let dir = tempdir().unwrap();
    write_corpus(dir.path());
    let state = AppState::new(None);

    let first = state.spawn_build(Language::English, dir.path().join("docs"), dir.path().join("stop.txt"));
    let second = state.spawn_build(Language::English, dir.path().join("docs"), dir.path().join("stop.txt"));
    assert!(matches!(second, Err(IndexError::BuildInProgress)));
    first.unwrap().await.unwrap();

    let last = state.last_builds.read().get(&Language::English).cloned().unwrap();
    assert_eq!(last.report.unwrap().documents, 2);
    assert!(last.error.is_none());
}
