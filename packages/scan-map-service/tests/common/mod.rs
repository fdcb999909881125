//! Stand-in for the trade-tracking API, bound to an ephemeral local port.
#![allow(dead_code)]

use axum::{
    extract::Path,
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;

pub const TOKEN: &str = "test-token";

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        == Some(format!("Bearer {}", TOKEN).as_str())
}

async fn all_items(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    Json(json!([
        {"name": "A", "message": "10,20"},
        {"name": "B", "message": "bad"},
        {"name": "C", "message": "30,40"}
    ]))
    .into_response()
}

async fn item_history(Path(key): Path<String>, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    match key.as_str() {
        "crate-7" => Json(json!([
            {"name": "Warehouse", "message": "51.5,-0.12"},
            {"name": "Port", "message": "51.9,1.3"},
            {"name": "", "message": "52.37,4.9"}
        ]))
        .into_response(),
        "lonely" => Json(json!([{"name": "Only", "message": "1,1"}])).into_response(),
        "mistyped" => Json(json!([
            {"name": "A", "message": "10,20"},
            {"name": "B", "message": 42},
            17,
            {"name": "C", "message": "30,40"}
        ]))
        .into_response(),
        "broken" => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        "garbled" => "not json".into_response(),
        _ => Json(json!([])).into_response(),
    }
}

async fn events(Path(key): Path<String>, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    if key != "crate-7" {
        return Json(json!([])).into_response();
    }
    Json(json!([
        {
            "blockTime": 1700000200,
            "confirmationStatus": "finalized",
            "err": null,
            "memo": "[34] crate-7 scanner-2 52.37 4.9",
            "signature": "3sigC",
            "slot": 300
        },
        {
            "blockTime": 1700000000,
            "confirmationStatus": "finalized",
            "err": null,
            "memo": "[34] crate-7 scanner-1 51.5 -0.12",
            "signature": "1sigA",
            "slot": 100
        },
        {
            "blockTime": 1700000100,
            "confirmationStatus": "finalized",
            "err": {"InstructionError": [0, "Custom"]},
            "memo": "[34] crate-7 scanner-1 0 0",
            "signature": "2sigB",
            "slot": 200
        },
        {
            "blockTime": null,
            "confirmationStatus": "confirmed",
            "err": null,
            "memo": null,
            "signature": "4sigD",
            "slot": 400
        }
    ]))
    .into_response()
}

/// Start the stub and return its base URL.
pub async fn spawn_upstream() -> String {
    let app = Router::new()
        .route("/item/map", get(all_items))
        .route("/item/map/:key", get(item_history))
        .route("/event/:key", get(events));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

/// Base URL nothing listens on.
pub async fn dead_upstream() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}
