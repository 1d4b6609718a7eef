//! # Evidence API
//!
//! Submission and owner-only update of evidence records, public lookup,
//! per-submitter listings and content-hash verification.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use evreg_core::{ContentHash, EvidenceId, SubmitterId};
use evreg_registry::{EvidenceRecord, NewEvidence, UserEvidenceIndex};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::CallerIdentity;
use crate::error::{AppError, ErrorBody};
use crate::extractors::{extract_json, extract_validated_json, Validate};
use crate::state::AppState;

// ── DTOs ────────────────────────────────────────────────────────────────────

/// Submit evidence request.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SubmitEvidenceRequest {
    /// Identifier to register the evidence under. Must be unused.
    pub id: String,
    /// Free-text description.
    pub description: String,
    /// Digest of the evidentiary content, compared byte-for-byte on verify.
    pub content_hash: String,
    /// Classification tag, e.g. "image" or "document".
    pub evidence_type: String,
    /// Locator of the underlying content.
    pub url: String,
}

impl Validate for SubmitEvidenceRequest {
    fn validate(&self) -> Result<(), String> {
        EvidenceId::validated(self.id.as_str())
            .map(|_| ())
            .map_err(|e| e.to_string())
    }
}

impl From<SubmitEvidenceRequest> for NewEvidence {
    fn from(req: SubmitEvidenceRequest) -> Self {
        NewEvidence {
            id: EvidenceId::new(req.id),
            description: req.description,
            content_hash: ContentHash::new(req.content_hash),
            evidence_type: req.evidence_type,
            url: req.url,
        }
    }
}

/// Update evidence request. Replaces both mutable fields.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateEvidenceRequest {
    /// New description.
    pub description: String,
    /// New content locator.
    pub url: String,
}

/// Verify content hash request.
#[derive(Debug, Deserialize, ToSchema)]
pub struct VerifyHashRequest {
    /// Candidate digest to compare with the recorded one.
    pub content_hash: String,
}

/// Identifier of the evidence a mutation applied to.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EvidenceIdResponse {
    /// Evidence identifier.
    pub id: String,
}

/// Full evidence record.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EvidenceResponse {
    /// Evidence identifier.
    pub id: String,
    /// Identity that submitted the evidence. Only it may update the record.
    pub submitter: String,
    /// Free-text description.
    pub description: String,
    /// Digest recorded at submission. Never changes.
    pub content_hash: String,
    /// Classification tag.
    pub evidence_type: String,
    /// Locator of the underlying content.
    pub url: String,
    /// When the registry accepted the submission (UTC).
    pub submission_date: DateTime<Utc>,
}

impl From<EvidenceRecord> for EvidenceResponse {
    fn from(record: EvidenceRecord) -> Self {
        Self {
            id: record.id.into_inner(),
            submitter: record.submitter.to_string(),
            description: record.description,
            content_hash: record.content_hash.as_str().to_string(),
            evidence_type: record.evidence_type,
            url: record.url,
            submission_date: *record.submission_date.as_datetime(),
        }
    }
}

/// Evidence ids registered by one submitter, oldest first.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserEvidenceResponse {
    /// Submitter the listing is for.
    pub submitter: String,
    /// Ids in submission order.
    pub evidence_ids: Vec<String>,
}

impl From<UserEvidenceIndex> for UserEvidenceResponse {
    fn from(index: UserEvidenceIndex) -> Self {
        Self {
            submitter: index.submitter.to_string(),
            evidence_ids: index
                .evidence_ids
                .into_iter()
                .map(EvidenceId::into_inner)
                .collect(),
        }
    }
}

/// Outcome of a hash verification.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VerifyHashResponse {
    /// Evidence identifier.
    pub id: String,
    /// True iff the candidate equals the recorded hash exactly.
    pub matches: bool,
}

// ── Router ──────────────────────────────────────────────────────────────────

/// Build the evidence router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/evidence", post(submit_evidence))
        .route("/v1/evidence/:id", get(get_evidence).put(update_evidence))
        .route("/v1/evidence/:id/verify", post(verify_hash))
        .route(
            "/v1/submitters/:submitter/evidence",
            get(get_submitter_evidence),
        )
}

/// POST /v1/evidence — Register new evidence as the calling submitter.
#[utoipa::path(
    post,
    path = "/v1/evidence",
    request_body = SubmitEvidenceRequest,
    responses(
        (status = 201, description = "Evidence registered", body = EvidenceIdResponse),
        (status = 401, description = "No caller identity", body = ErrorBody),
        (status = 409, description = "Evidence id already registered", body = ErrorBody),
        (status = 422, description = "Blank evidence id", body = ErrorBody),
    ),
    tag = "evidence"
)]
async fn submit_evidence(
    State(state): State<AppState>,
    caller: CallerIdentity,
    body: Result<Json<SubmitEvidenceRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<EvidenceIdResponse>), AppError> {
    let req = extract_validated_json(body)?;
    let id = state.registry.submit(&caller.submitter, req.into())?;
    Ok((
        StatusCode::CREATED,
        Json(EvidenceIdResponse {
            id: id.into_inner(),
        }),
    ))
}

/// GET /v1/evidence/:id — Full record for one piece of evidence.
#[utoipa::path(
    get,
    path = "/v1/evidence/{id}",
    params(("id" = String, Path, description = "Evidence ID")),
    responses(
        (status = 200, description = "Evidence found", body = EvidenceResponse),
        (status = 404, description = "Not found", body = ErrorBody),
    ),
    tag = "evidence"
)]
async fn get_evidence(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<EvidenceResponse>, AppError> {
    state
        .registry
        .get_evidence_details(&EvidenceId::new(id.as_str()))
        .map(|record| Json(record.into()))
        .ok_or_else(|| AppError::NotFound(format!("evidence {id} not found")))
}

/// PUT /v1/evidence/:id — Replace description and url. Submitter only.
#[utoipa::path(
    put,
    path = "/v1/evidence/{id}",
    params(("id" = String, Path, description = "Evidence ID")),
    request_body = UpdateEvidenceRequest,
    responses(
        (status = 200, description = "Evidence updated", body = EvidenceIdResponse),
        (status = 401, description = "No caller identity", body = ErrorBody),
        (status = 403, description = "Caller is not the submitter", body = ErrorBody),
        (status = 404, description = "Not found", body = ErrorBody),
    ),
    tag = "evidence"
)]
async fn update_evidence(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<String>,
    body: Result<Json<UpdateEvidenceRequest>, JsonRejection>,
) -> Result<Json<EvidenceIdResponse>, AppError> {
    let req = extract_json(body)?;
    let id = EvidenceId::new(id);
    state
        .registry
        .update(&caller.submitter, &id, req.description, req.url)?;
    Ok(Json(EvidenceIdResponse {
        id: id.into_inner(),
    }))
}

/// POST /v1/evidence/:id/verify — Compare a candidate hash with the record.
#[utoipa::path(
    post,
    path = "/v1/evidence/{id}/verify",
    params(("id" = String, Path, description = "Evidence ID")),
    request_body = VerifyHashRequest,
    responses(
        (status = 200, description = "Comparison result", body = VerifyHashResponse),
        (status = 404, description = "Not found", body = ErrorBody),
    ),
    tag = "evidence"
)]
async fn verify_hash(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<VerifyHashRequest>, JsonRejection>,
) -> Result<Json<VerifyHashResponse>, AppError> {
    let req = extract_json(body)?;
    let id = EvidenceId::new(id);
    let matches = state
        .registry
        .verify_evidence_hash(&id, &ContentHash::new(req.content_hash))?;
    Ok(Json(VerifyHashResponse {
        id: id.into_inner(),
        matches,
    }))
}

/// GET /v1/submitters/:submitter/evidence — Ids a submitter has registered.
#[utoipa::path(
    get,
    path = "/v1/submitters/{submitter}/evidence",
    params(("submitter" = String, Path, description = "Submitter identity")),
    responses(
        (status = 200, description = "Submitter's evidence ids", body = UserEvidenceResponse),
        (status = 404, description = "Submitter has registered nothing", body = ErrorBody),
    ),
    tag = "evidence"
)]
async fn get_submitter_evidence(
    State(state): State<AppState>,
    Path(submitter): Path<String>,
) -> Result<Json<UserEvidenceResponse>, AppError> {
    state
        .registry
        .get_user_evidence(&SubmitterId::new(submitter.as_str()))
        .map(|index| Json(index.into()))
        .ok_or_else(|| AppError::NotFound(format!("submitter {submitter} has no evidence")))
}
