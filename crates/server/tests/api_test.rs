use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::routing::get;
use axum::Router;
use roundchain_chain::Chain;
use roundchain_core::{Block, Header, GENESIS_HEADER};
use roundchain_server::{app, boundary};
use serde_json::{json, Value};
use tower::ServiceExt;

struct Reply {
    status: StatusCode,
    content_type: Option<String>,
    body: String,
}

async fn send(router: Router, request: Request<Body>) -> Reply {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .map(|v| v.to_str().unwrap().to_owned());
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    Reply {
        status,
        content_type,
        body: String::from_utf8(bytes.to_vec()).unwrap(),
    }
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_request(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn wire_block(header: &str, parent: &str, number: u64) -> Value {
    json!({
        "parentHeader": parent,
        "header": header,
        "signature": format!("{}:loong", header),
        "number": number,
        "timestamp": 1700000000,
    })
}

#[tokio::test]
async fn test_post_then_get_blocks() {
    let chain = Chain::new("divya");
    let produced = chain.produce(1).unwrap();

    let reply = send(
        app(chain.clone()),
        post_request("/blocks", json!([wire_block("r1", GENESIS_HEADER, 1)])),
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(chain.len(), 3);

    let reply = send(app(chain.clone()), get_request("/blocks?offset=0&limit=10")).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.content_type.as_deref(), Some("application/json"));

    let blocks: Vec<Block> = serde_json::from_str(&reply.body).unwrap();
    let headers: Vec<&str> = blocks.iter().map(|b| b.header.as_str()).collect();
    assert_eq!(headers, vec!["r1", GENESIS_HEADER, produced.header.as_str()]);
}

#[tokio::test]
async fn test_get_blocks_range() {
    let chain = Chain::new("divya");
    chain.produce(1).unwrap();
    chain.produce(5).unwrap();

    let reply = send(app(chain), get_request("/blocks?offset=2&limit=3")).await;

    let blocks: Vec<Value> = serde_json::from_str(&reply.body).unwrap();
    assert_eq!(blocks.len(), 1);
    // `number` carries the production round
    assert_eq!(blocks[0]["number"], 1);
    // The local position is not part of the wire record
    assert!(blocks[0].get("sequenceNumber").is_none());
    assert!(blocks[0].get("round").is_none());
}

#[tokio::test]
async fn test_post_alias_route() {
    let chain = Chain::new("divya");

    let reply = send(
        app(chain.clone()),
        post_request("/block", json!([wire_block("r1", GENESIS_HEADER, 1)])),
    )
    .await;

    assert_eq!(reply.status, StatusCode::OK);
    assert!(chain.snapshot().iter().any(|b| b.header == Header::new("r1")));
}

#[tokio::test]
async fn test_repeated_post_is_idempotent() {
    let chain = Chain::new("divya");
    let batch = json!([wire_block("r1", GENESIS_HEADER, 1), wire_block("r2", "r1", 2)]);

    send(app(chain.clone()), post_request("/blocks", batch.clone())).await;
    let tip = chain.tip();
    let reply = send(app(chain.clone()), post_request("/blocks", batch)).await;

    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(chain.len(), 3);
    assert_eq!(chain.tip(), tip);
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let chain = Chain::new("divya");
    let request = Request::builder()
        .method(Method::POST)
        .uri("/blocks")
        .body(Body::from("{not json"))
        .unwrap();

    let reply = send(app(chain.clone()), request).await;

    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert!(reply.body.starts_with("cannot decode json"));
    assert_eq!(chain.len(), 1);
}

#[tokio::test]
async fn test_large_batch_is_accepted() {
    // Well past axum's default 2 MiB request body limit
    let padding = "x".repeat(1024);
    let batch: Vec<Value> = (1..=1000u64)
        .map(|i| {
            let header = format!("{}{}", padding, i);
            let parent = format!("{}{}", padding, i - 1);
            wire_block(&header, &parent, i)
        })
        .collect();
    let body = Value::Array(batch);
    assert!(body.to_string().len() > 2 * 1024 * 1024);

    let chain = Chain::new("divya");
    let reply = send(app(chain.clone()), post_request("/blocks", body)).await;

    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(chain.len(), 1001);
}

#[tokio::test]
async fn test_negative_number_is_bad_request() {
    let chain = Chain::new("divya");
    let mut block = wire_block("r1", GENESIS_HEADER, 1);
    block["number"] = json!(-1);

    let reply = send(app(chain.clone()), post_request("/blocks", json!([block]))).await;

    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert!(reply.body.starts_with("cannot decode json"));
    assert_eq!(chain.len(), 1);
}

#[tokio::test]
async fn test_wrong_shape_is_bad_request() {
    let chain = Chain::new("divya");

    let reply = send(app(chain), post_request("/blocks", json!({"header": "r1"}))).await;

    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_missing_query_params() {
    let chain = Chain::new("divya");

    let reply = send(app(chain.clone()), get_request("/blocks?limit=10")).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.body, "cannot read offset");

    let reply = send(app(chain.clone()), get_request("/blocks?offset=0")).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.body, "cannot read limit");

    let reply = send(app(chain), get_request("/blocks")).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_non_numeric_query_param() {
    let chain = Chain::new("divya");

    let reply = send(app(chain), get_request("/blocks?offset=abc&limit=10")).await;

    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert!(reply.body.starts_with("cannot parse offset"));
}

async fn explode() -> &'static str {
    panic!("boom")
}

#[tokio::test]
async fn test_panic_becomes_internal_error() {
    let router = boundary(Router::new().route("/explode", get(explode)));

    let reply = send(router, get_request("/explode")).await;

    assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(reply.body, "boom");
}

#[tokio::test]
async fn test_cors_echoes_origin_with_credentials() {
    let chain = Chain::new("divya");
    let request = Request::builder()
        .uri("/blocks?offset=0&limit=2")
        .header(header::ORIGIN, "http://explorer.local")
        .body(Body::empty())
        .unwrap();

    let response = app(chain).oneshot(request).await.unwrap();

    let headers = response.headers();
    assert_eq!(
        headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "http://explorer.local"
    );
    assert_eq!(
        headers.get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).unwrap(),
        "true"
    );
}

#[tokio::test]
async fn test_cors_preflight_allows_post() {
    let chain = Chain::new("divya");
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/blocks")
        .header(header::ORIGIN, "http://explorer.local")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();

    let response = app(chain).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let methods = response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_METHODS)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(methods.contains("POST"));
    assert!(methods.contains("GET"));
}
