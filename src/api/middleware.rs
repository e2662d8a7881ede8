//! API Middleware
//!
//! Caller authentication and request logging.

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, HeaderValue, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::domain::OperationContext;

/// Caller identity from the X-Request-User-Id header
#[derive(Debug, Clone, Copy)]
pub struct RequestUser {
    pub user_id: Uuid,
}

/// State for [`auth_middleware`]: the SHA-256 digest of the gateway key
#[derive(Debug, Clone)]
pub struct AuthState {
    api_key_hash: String,
}

impl AuthState {
    pub fn new(api_key: &str) -> Self {
        Self {
            api_key_hash: hash_api_key(api_key),
        }
    }

    fn accepts(&self, presented: &str) -> bool {
        hash_api_key(presented) == self.api_key_hash
    }
}

/// Hex encoded SHA-256 of an API key
pub fn hash_api_key(key: &str) -> String {
    hex::encode(Sha256::digest(key.as_bytes()))
}

fn reject(status: StatusCode, error: &str, error_code: &str) -> Response {
    (
        status,
        Json(json!({
            "error": error,
            "error_code": error_code
        })),
    )
        .into_response()
}

// =========================================================================
// Authentication
// =========================================================================

/// Validate the gateway API key and extract the caller identity.
///
/// On success the request carries a [`RequestUser`] and an
/// [`OperationContext`] in its extensions.
pub async fn auth_middleware(
    State(auth): State<AuthState>,
    headers: HeaderMap,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, Response> {
    let api_key = headers
        .get("X-API-Key")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            reject(
                StatusCode::UNAUTHORIZED,
                "Missing X-API-Key header",
                "missing_api_key",
            )
        })?;

    if !auth.accepts(api_key) {
        return Err(reject(
            StatusCode::UNAUTHORIZED,
            "Invalid API key",
            "invalid_api_key",
        ));
    }

    let user_id_str = headers
        .get("X-Request-User-Id")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            reject(
                StatusCode::UNAUTHORIZED,
                "Missing X-Request-User-Id header",
                "missing_user_id",
            )
        })?;

    let user_id = Uuid::parse_str(user_id_str.trim()).map_err(|_| {
        reject(
            StatusCode::BAD_REQUEST,
            "Invalid X-Request-User-Id header format",
            "invalid_user_id",
        )
    })?;

    let mut context = OperationContext::new().with_request_user(user_id);
    if let Some(correlation_id) = headers
        .get("X-Correlation-Id")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| Uuid::parse_str(s.trim()).ok())
    {
        context = context.with_correlation_id(correlation_id);
    }
    // generated when absent or unparseable
    context.ensure_correlation_id();

    request.extensions_mut().insert(RequestUser { user_id });
    request.extensions_mut().insert(context);

    Ok(next.run(request).await)
}

// =========================================================================
// Header masking
// =========================================================================

/// Headers that should be masked in logs
const SENSITIVE_HEADERS: &[&str] = &["x-api-key", "authorization", "cookie", "set-cookie"];

/// Mask sensitive headers for logging
pub fn mask_headers_for_logging(headers: &HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(name, value)| {
            let name_lower = name.as_str().to_lowercase();
            let masked_value = if SENSITIVE_HEADERS.contains(&name_lower.as_str()) {
                "[REDACTED]".to_string()
            } else {
                value.to_str().unwrap_or("[invalid utf8]").to_string()
            };
            (name.to_string(), masked_value)
        })
        .collect()
}

// =========================================================================
// Request logging
// =========================================================================

/// Request logging middleware.
///
/// Runs inside [`auth_middleware`], so the operation context is available.
/// Echoes the correlation ID back in `X-Correlation-Id`.
pub async fn logging_middleware(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();

    let headers = mask_headers_for_logging(request.headers());

    let context = request
        .extensions()
        .get::<OperationContext>()
        .cloned()
        .unwrap_or_default();
    let correlation_id = context.correlation_id;
    let user_id = context.request_user_id;

    let start = std::time::Instant::now();

    tracing::info!(
        method = %method,
        uri = %uri,
        correlation_id = ?correlation_id,
        user_id = ?user_id,
        headers = ?headers,
        "Incoming request"
    );

    let mut response = next.run(request).await;

    let duration = start.elapsed();
    let status = response.status();

    tracing::info!(
        method = %method,
        uri = %uri,
        status = %status,
        duration_ms = %duration.as_millis(),
        correlation_id = ?correlation_id,
        "Request completed"
    );

    if let Some(id) = correlation_id {
        if let Ok(value) = HeaderValue::from_str(&id.to_string()) {
            response.headers_mut().insert("x-correlation-id", value);
        }
    }

    response
}
