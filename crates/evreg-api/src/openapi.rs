//! # OpenAPI Specification Assembly
//!
//! Assembles the utoipa-documented routes into one OpenAPI document,
//! served at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// Assembled OpenAPI spec for the entire API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Evidence Registry API",
        version = "0.1.0",
        description = "Register evidence by content hash, let its submitter amend the \
                       description and locator, and let anyone verify a file against \
                       the recorded hash.",
        license(name = "BUSL-1.1")
    ),
    paths(
        crate::routes::evidence::submit_evidence,
        crate::routes::evidence::get_evidence,
        crate::routes::evidence::update_evidence,
        crate::routes::evidence::verify_hash,
        crate::routes::evidence::get_submitter_evidence,
    ),
    components(schemas(
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
        crate::routes::evidence::SubmitEvidenceRequest,
        crate::routes::evidence::UpdateEvidenceRequest,
        crate::routes::evidence::VerifyHashRequest,
        crate::routes::evidence::EvidenceIdResponse,
        crate::routes::evidence::EvidenceResponse,
        crate::routes::evidence::UserEvidenceResponse,
        crate::routes::evidence::VerifyHashResponse,
    )),
    tags(
        (name = "evidence", description = "Evidence Registry API"),
    )
)]
pub struct ApiDoc;

/// Build the OpenAPI router.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

/// GET /openapi.json — Return the generated OpenAPI specification.
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
