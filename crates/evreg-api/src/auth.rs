//! # Caller Authentication
//!
//! Bearer token middleware that establishes which submitter is calling.
//!
//! ## Token Format
//!
//! ```text
//! Bearer {submitter}:{secret}   when AUTH_TOKEN is configured
//! Bearer {submitter}            development mode (no AUTH_TOKEN)
//! ```
//!
//! The secret is split off at the last `:`, so submitter identities may
//! contain colons themselves (`did:key:z6Mk...:secret`).
//!
//! ## CallerIdentity
//!
//! A request with valid credentials gets a [`CallerIdentity`] injected into
//! its extensions. Requests without an `Authorization` header pass through
//! anonymously; handlers that mutate state extract [`CallerIdentity`] and
//! reject anonymous callers with 401.

use axum::extract::Request;
use axum::http::request::Parts;
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use evreg_core::SubmitterId;
use subtle::ConstantTimeEq;

use crate::error::{AppError, ErrorBody, ErrorDetail};

/// Identity of the authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    /// The submitter this request acts as.
    pub submitter: SubmitterId,
}

/// Extracts the identity that the auth middleware injected into extensions.
/// Returns 401 if the request carried no credentials.
#[axum::async_trait]
impl<S: Send + Sync> axum::extract::FromRequestParts<S> for CallerIdentity {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CallerIdentity>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("this operation requires a bearer token".into()))
    }
}

// ── Auth Configuration ──────────────────────────────────────────────────────

/// Auth configuration injected into request extensions.
///
/// Custom `Debug` redacts the token value.
#[derive(Clone)]
pub struct AuthConfig {
    pub token: Option<String>,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

// ── Token Validation ────────────────────────────────────────────────────────

/// Constant-time comparison of bearer secrets.
///
/// When lengths differ, performs a dummy comparison so the mismatch costs
/// the same as a same-length comparison.
fn constant_time_token_eq(provided: &str, expected: &str) -> bool {
    let provided = provided.as_bytes();
    let expected = expected.as_bytes();
    if provided.len() != expected.len() {
        let _ = expected.ct_eq(expected);
        return false;
    }
    provided.ct_eq(expected).into()
}

/// Parse a bearer value into a [`CallerIdentity`].
///
/// With `expected_secret` set, the value must be `{submitter}:{secret}`
/// and the secret must match. Without it, the whole value names the
/// submitter. The submitter must be non-blank either way.
pub fn parse_bearer_token(
    provided: &str,
    expected_secret: Option<&str>,
) -> Result<CallerIdentity, String> {
    let submitter = match expected_secret {
        Some(expected) => {
            let (submitter, secret) = provided.rsplit_once(':').ok_or_else(|| {
                "invalid token format, expected {submitter}:{secret}".to_string()
            })?;
            if !constant_time_token_eq(secret, expected) {
                return Err("invalid bearer token".into());
            }
            submitter
        }
        None => provided,
    };

    let submitter = SubmitterId::validated(submitter).map_err(|e| e.to_string())?;
    Ok(CallerIdentity { submitter })
}

// ── Middleware ───────────────────────────────────────────────────────────────

/// Validate the Bearer token, if any, and inject the caller's identity.
///
/// Absent credentials are not an error here: reads are public. Present but
/// invalid credentials are always rejected with 401. A router mounted
/// without an [`AuthConfig`] extension answers every request with 500
/// rather than falling back to development mode.
pub async fn auth_middleware(mut request: Request, next: Next) -> Response {
    let Some(config) = request.extensions().get::<AuthConfig>().cloned() else {
        tracing::error!("auth middleware mounted without AuthConfig extension");
        return AppError::Internal("auth configuration missing".into()).into_response();
    };
    let expected = config.token;

    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .map(|v| v.to_str().map(str::to_owned));

    match auth_header {
        None => next.run(request).await,
        Some(Ok(value)) => match value.strip_prefix("Bearer ") {
            Some(provided) => match parse_bearer_token(provided, expected.as_deref()) {
                Ok(identity) => {
                    tracing::debug!(submitter = %identity.submitter, "caller authenticated");
                    request.extensions_mut().insert(identity);
                    next.run(request).await
                }
                Err(msg) => {
                    tracing::warn!(reason = %msg, "authentication failed: invalid bearer token");
                    unauthorized_response(&msg)
                }
            },
            None => {
                tracing::warn!("authentication failed: non-Bearer authorization scheme");
                unauthorized_response("authorization header must use Bearer scheme")
            }
        },
        Some(Err(_)) => {
            tracing::warn!("authentication failed: non-ASCII authorization header");
            unauthorized_response("authorization header is not valid ASCII")
        }
    }
}

fn unauthorized_response(message: &str) -> Response {
    let body = ErrorBody {
        error: ErrorDetail {
            code: "UNAUTHORIZED".to_string(),
            message: message.to_string(),
            details: None,
        },
    };
    (StatusCode::UNAUTHORIZED, Json(body)).into_response()
}
