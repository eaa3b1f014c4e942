use std::sync::Arc;
use std::time::Instant;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::TextRequest;
use crate::context::AppContext;
use crate::error::ApiResult;
use crate::utils::logging::log_request_execution;

/// Body of `POST /anonymize`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnonymizeResponse {
    /// Input text with every detected entity replaced.
    pub anonymized_text: String,
}

/// `POST /anonymize`: replace every detected entity with its placeholder.
pub async fn anonymize(
    State(context): State<Arc<AppContext>>,
    Json(request): Json<TextRequest>,
) -> ApiResult<Json<AnonymizeResponse>> {
    let request_id = Uuid::new_v4();
    let text_len = request.text.len();
    let start = Instant::now();

    let result = context.anonymize(request.text).await;
    log_request_execution(
        "anonymize",
        request_id,
        text_len,
        result.as_ref().ok().map(|output| output.items.len()),
        start.elapsed(),
    );

    Ok(Json(AnonymizeResponse { anonymized_text: result?.text }))
}
