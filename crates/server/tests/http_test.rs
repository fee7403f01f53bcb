use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;

use brisadb_server::{AppState, http};
use brisadb_storage::Store;

/// Helper: executa uma requisição no router e retorna (status, corpo JSON).
async fn send(app: &Router, method: &str, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

fn app() -> (Router, Store) {
    let store = Store::new();
    (http::router(AppState::new(store.clone())), store)
}

#[tokio::test]
async fn test_set_get() {
    let (app, _) = app();

    let (status, body) = send(
        &app,
        "POST",
        "/set",
        Some(r#"{"key":"mykey","value":{"a":[1,2]},"ttl":60}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));

    let (status, body) = send(&app, "GET", "/get/mykey", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"value": {"a": [1, 2]}}));
}

#[tokio::test]
async fn test_get_nonexistent() {
    let (app, _) = app();

    let (status, body) = send(&app, "GET", "/get/missing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_set_without_ttl_defaults_to_a_day() {
    let (app, store) = app();

    send(&app, "POST", "/set", Some(r#"{"key":"k","value":"v"}"#)).await;
    assert_eq!(store.get("k"), Some(json!("v")));
}

#[tokio::test]
async fn test_set_zero_ttl_expires_immediately() {
    let (app, _) = app();

    send(&app, "POST", "/set", Some(r#"{"key":"k","value":"v","ttl":0}"#)).await;
    let (status, _) = send(&app, "GET", "/get/k", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_set_invalid_payloads() {
    let (app, _) = app();

    for body in [
        "not json",
        r#"{"value":"v"}"#,
        r#"{"key":1,"value":"v"}"#,
        r#"{"key":"k","value":"v","ttl":-1}"#,
        r#"{"key":"k","value":"v","ttl":"10s"}"#,
    ] {
        let (status, resp) = send(&app, "POST", "/set", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
        assert!(resp["error"].is_string(), "{body}");
    }
}

#[tokio::test]
async fn test_delete() {
    let (app, store) = app();
    store.set("a", json!(1), std::time::Duration::from_secs(60));

    let (status, body) = send(&app, "DELETE", "/delete/a", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));
    assert_eq!(store.get("a"), None);

    // Chave ausente também é OK.
    let (status, _) = send(&app, "DELETE", "/delete/a", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_query_set_get_scan() {
    let (app, _) = app();

    let (status, body) = send(&app, "GET", "/query?q=SET%20foo%20bar%2010s", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::Null);

    let (status, body) = send(&app, "GET", "/query?q=GET%20foo", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("bar"));

    send(&app, "GET", "/query?q=SET%20fox%20baz", None).await;
    send(&app, "GET", "/query?q=SET%20cat%20meow", None).await;
    let (status, body) = send(&app, "GET", "/query?q=SCAN%20fo", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"foo": "bar", "fox": "baz"}));
}

#[tokio::test]
async fn test_query_errors() {
    let (app, _) = app();

    let (status, _) = send(&app, "GET", "/query", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, "GET", "/query?q=SET%20foo", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("SET"));

    let (status, _) = send(&app, "GET", "/query?q=FLY%20away", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "GET", "/query?q=GET%20nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_concurrent_requests() {
    let (app, store) = app();

    let mut handles = Vec::new();
    for t in 0..8 {
        let app = app.clone();
        handles.push(tokio::spawn(async move {
            for i in 0..20 {
                let body = format!(r#"{{"key":"k{}","value":{},"ttl":60}}"#, i % 5, t);
                let (status, _) = send(&app, "POST", "/set", Some(&body)).await;
                assert_eq!(status, StatusCode::OK);
                send(&app, "GET", &format!("/get/k{}", i % 5), None).await;
            }
        }));
    }
    for h in handles {
        h.await.unwrap();
    }

    assert_eq!(store.len(), 5);
}
