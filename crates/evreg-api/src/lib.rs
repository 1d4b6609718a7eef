//! # evreg-api — HTTP Service for the Evidence Registry
//!
//! Exposes one shared [`EvidenceRegistry`](evreg_registry::EvidenceRegistry)
//! over HTTP. Establishes caller identity from bearer tokens; all ownership
//! rules live in the registry.
//!
//! ## API Surface
//!
//! | Method | Path                                  | Caller     |
//! |--------|---------------------------------------|------------|
//! | POST   | `/v1/evidence`                        | required   |
//! | GET    | `/v1/evidence/:id`                    | public     |
//! | PUT    | `/v1/evidence/:id`                    | submitter  |
//! | POST   | `/v1/evidence/:id/verify`             | public     |
//! | GET    | `/v1/submitters/:submitter/evidence`  | public     |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → AuthMiddleware → Handler
//! ```
//!
//! ## OpenAPI
//!
//! Generated via utoipa derive macros at `/openapi.json`.

pub mod auth;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod server;
pub mod state;

use axum::middleware::from_fn;
use axum::Router;

use crate::auth::AuthConfig;
use crate::state::AppState;

/// Assemble the full application router with all routes and middleware.
///
/// Health probes (`/health/*`) are mounted outside the auth middleware
/// so they never fail on a bad token.
pub fn app(state: AppState) -> Router {
    let auth_config = AuthConfig {
        token: state.config.auth_token.clone(),
    };

    let api = Router::new()
        .merge(routes::evidence::router())
        .merge(openapi::router())
        .layer(from_fn(auth::auth_middleware))
        .layer(middleware::tracing_layer::layer())
        .layer(axum::Extension(auth_config))
        .with_state(state);

    let health = Router::new()
        .route("/health/liveness", axum::routing::get(liveness))
        .route("/health/readiness", axum::routing::get(readiness));

    Router::new().merge(health).merge(api)
}

/// Liveness probe — always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe — returns 200 when the application is ready to serve.
async fn readiness() -> &'static str {
    "ready"
}
