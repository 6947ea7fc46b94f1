// HTTP request handlers

use super::routes::AppState;
use crate::error::ProxyError;
use crate::proxy::ProxyOutcome;
use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, StatusCode};
use axum::response::{IntoResponse, Response};
use tracing::{debug, info};

/// Catch-all handler funneling every request through the forwarding
/// pipeline.
pub async fn relay_handler(
    State(state): State<AppState>,
    request: Request<Body>,
) -> Result<Response, ProxyError> {
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    match state.proxy.handle(request).await? {
        ProxyOutcome::Forwarded(response) => {
            info!(%method, %path, status = %response.status, "forwarded");
            Ok(response.into_response())
        }
        ProxyOutcome::Handled => {
            debug!(%method, %path, "response delivered by intercept hook");
            Ok(StatusCode::OK.into_response())
        }
        ProxyOutcome::Skipped => {
            // The binary has no next-in-chain to hand the request to, so a
            // filtered request falls out as 404. Library embedders can route
            // Skipped to their own next handler instead.
            debug!(%method, %path, "request skipped by filter");
            Ok(StatusCode::NOT_FOUND.into_response())
        }
    }
}
