use std::sync::Arc;
use std::time::Instant;

use axum::extract::State;
use axum::Json;
use fz152_core::AuditEntry;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::TextRequest;
use crate::context::AppContext;
use crate::error::ApiResult;
use crate::utils::logging::log_request_execution;

/// Body of `POST /audit`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditResponse {
    /// Detected entities, without their values.
    pub entities: Vec<AuditEntry>,
}

/// `POST /audit`: list detected entities without their values.
///
/// Offsets in the response count characters, not bytes.
pub async fn audit(
    State(context): State<Arc<AppContext>>,
    Json(request): Json<TextRequest>,
) -> ApiResult<Json<AuditResponse>> {
    let request_id = Uuid::new_v4();
    let text_len = request.text.len();
    let start = Instant::now();

    let result = context.audit(request.text).await;
    log_request_execution(
        "audit",
        request_id,
        text_len,
        result.as_ref().ok().map(|report| report.len()),
        start.elapsed(),
    );

    Ok(Json(AuditResponse { entities: result?.entities }))
}
