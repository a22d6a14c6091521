//! Committed structure fetched over HTTP.

use axum::extract::Query;
use axum::routing::get;
use axum::{Json, Router};
use pagecraft_core::{CommittedSource, HttpConfigSource};
use pagecraft_protocol::{SectionId, StructureOverride};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::time::timeout;

async fn serve(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve");
    });
    format!("http://{addr}")
}

fn config_router(stored: Value) -> Router {
    Router::new().route(
        "/config",
        get(move |Query(params): Query<HashMap<String, String>>| {
            let stored = stored.clone();
            async move {
                let value = match params.get("key").map(String::as_str) {
                    Some("landingStructure") => stored,
                    _ => Value::Null,
                };
                Json(json!({ "value": value }))
            }
        }),
    )
}

#[tokio::test]
async fn fetches_committed_structure_by_key() {
    let base = serve(config_router(json!({
        "sectionOrder": ["gallery", "hero"],
        "sectionVisibility": { "hero": false },
    })))
    .await;

    let committed = HttpConfigSource::new(&base)
        .expect("source")
        .fetch()
        .await;
    assert_eq!(
        committed,
        Some(StructureOverride {
            section_order: Some(vec![SectionId::Gallery, SectionId::Hero]),
            section_visibility: Some(BTreeMap::from([(SectionId::Hero, false)])),
            section_layout: None,
        })
    );
}

#[tokio::test]
async fn unset_key_yields_no_committed_layer() {
    let base = serve(config_router(json!({ "sectionOrder": ["hero"] }))).await;
    let source = HttpConfigSource::new(format!("{base}/"))
        .expect("source")
        .with_key("otherKey");
    assert_eq!(source.fetch_value().await.expect("value"), Value::Null);
    assert_eq!(source.fetch().await, None);
}

#[tokio::test]
async fn server_errors_degrade_to_defaults() {
    let router = Router::new().route(
        "/config",
        get(|| async { (axum::http::StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
    );
    let base = serve(router).await;
    let source = HttpConfigSource::new(&base).expect("source");
    assert!(source.fetch_value().await.is_err());
    assert_eq!(source.fetch().await, None);
}

#[tokio::test]
async fn unreachable_server_degrades_to_defaults() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    let source = HttpConfigSource::new(format!("http://{addr}")).expect("source");
    assert_eq!(source.fetch().await, None);
}

/// A server that accepts the connection but never answers must not block
/// the first render.
#[tokio::test]
async fn stalled_server_times_out_to_defaults() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let accept = tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    let source =
        HttpConfigSource::with_timeout(format!("http://{addr}"), Duration::from_millis(200))
            .expect("source");
    let fetched = timeout(Duration::from_secs(3), source.fetch()).await;
    assert_eq!(fetched.expect("fetch finished before the outer deadline"), None);
    accept.abort();
}
