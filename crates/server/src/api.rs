//! Request handlers.

use crate::error::ApiError;
use crate::AppState;
use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use roundchain_core::Block;
use std::any::Any;
use std::collections::HashMap;
use tracing::{debug, error};

/// `POST /blocks`: merge a batch pushed by a peer.
///
/// The body is decoded by hand so that any malformed payload maps to 400,
/// whatever its content type.
pub async fn post_blocks(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<StatusCode, ApiError> {
    let blocks: Vec<Block> = serde_json::from_slice(&body)?;
    debug!(count = blocks.len(), "got blocks");
    state.chain.ingest(blocks);
    Ok(StatusCode::OK)
}

/// `GET /blocks?offset=..&limit=..`: blocks in `[offset, limit)`.
pub async fn get_blocks(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Vec<Block>>, ApiError> {
    let offset = required_param(&params, "offset")?;
    let limit = required_param(&params, "limit")?;
    Ok(Json(state.chain.get_blocks(offset, limit)))
}

fn required_param(params: &HashMap<String, String>, name: &'static str) -> Result<u64, ApiError> {
    let value = params.get(name).ok_or(ApiError::MissingParam(name))?;
    value.trim().parse().map_err(|_| ApiError::InvalidParam {
        name,
        value: value.clone(),
    })
}

/// Turn a handler panic into a 500 carrying the panic text.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_owned()
    } else {
        "handler panicked".to_owned()
    };
    error!(%message, "request handler panicked");
    (StatusCode::INTERNAL_SERVER_ERROR, message).into_response()
}
