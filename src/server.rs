//! HTTP transport: `GET /{sender}/{calldata}` → proof task JSON.
//!
//! Thin I/O wrapper over the lookup core. Maps the error taxonomy onto
//! status codes: unsupported signature → 404, malformed calldata → 400 with
//! the decode message, upstream failure → 400 with the detail logged but
//! not leaked.

use std::net::SocketAddr;
use std::sync::Arc;

use alloy_primitives::Address;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use axum::Router;
use serde_json::json;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{info, warn};

use crate::chain::ChainReader;
use crate::errors::GatewayError;
use crate::gateway::Gateway;

/// Build the gateway router.
pub fn router<R: ChainReader + 'static>(gateway: Arc<Gateway<R>>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/{sender}/{calldata}", get(lookup::<R>))
        .with_state(gateway)
}

/// Serve the gateway until ctrl-c.
pub async fn serve<R: ChainReader + 'static>(
    gateway: Arc<Gateway<R>>,
    listen_addr: SocketAddr,
) -> eyre::Result<()> {
    let listener = TcpListener::bind(listen_addr).await?;
    info!(address = %listener.local_addr()?, "gateway listening");
    axum::serve(listener, router(gateway))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn healthz() -> impl IntoResponse {
    StatusCode::OK
}

async fn lookup<R: ChainReader + 'static>(
    Path((sender, calldata)): Path<(String, String)>,
    State(gateway): State<Arc<Gateway<R>>>,
) -> Response {
    let sender: Address = match sender.parse() {
        Ok(address) => address,
        Err(_) => return error_response(StatusCode::BAD_REQUEST, "invalid sender address"),
    };

    // Lookup clients may append `.json` to the data segment of the
    // gateway URL template.
    let calldata = calldata.strip_suffix(".json").unwrap_or(&calldata);
    let calldata = match decode_hex_calldata(calldata) {
        Ok(bytes) => bytes,
        Err(message) => return error_response(StatusCode::BAD_REQUEST, message),
    };

    match gateway.handle(sender, &calldata).await {
        Ok(Some(response)) => (StatusCode::OK, Json(response)).into_response(),
        Ok(None) => error_response(StatusCode::NOT_FOUND, "unsupported signature"),
        Err(GatewayError::Decode(message)) => {
            warn!(%sender, error = %message, "calldata decode failed");
            error_response(StatusCode::BAD_REQUEST, &format!("malformed calldata: {message}"))
        }
        Err(GatewayError::Upstream(message)) => {
            warn!(%sender, error = %message, "upstream rpc failure");
            error_response(StatusCode::BAD_REQUEST, "unknown error")
        }
    }
}

fn decode_hex_calldata(raw: &str) -> Result<Vec<u8>, &'static str> {
    let stripped = raw.strip_prefix("0x").unwrap_or(raw);
    hex::decode(stripped).map_err(|_| "calldata is not valid hex")
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "message": message }))).into_response()
}

async fn shutdown_signal() {
    let _ = signal::ctrl_c().await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_hex_calldata_accepts_prefixed_and_bare() {
        assert_eq!(decode_hex_calldata("0xdeadbeef").unwrap(), vec![0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(decode_hex_calldata("deadbeef").unwrap(), vec![0xde, 0xad, 0xbe, 0xef]);
    }

    #[test]
    fn test_decode_hex_calldata_rejects_garbage() {
        assert!(decode_hex_calldata("0xzz").is_err());
    }
}
