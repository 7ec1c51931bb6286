use actix_web::{post, web, HttpResponse};
use chrono::Utc;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;
use crate::timeout::with_timeout;
use crate::types::{SummarizeRequest, SummarizeResponse};

/// Summarize a document with focus on an inquiry
#[post("/summarize")]
pub async fn summarize(
    req: web::Json<SummarizeRequest>,
    state: web::Data<Arc<AppState>>,
) -> Result<HttpResponse, ApiError> {
    let request_id = Uuid::new_v4().to_string();
    info!(
        request_id = %request_id,
        "Summarize request - Text length: {}, Inquiry: {}",
        req.text.len(),
        req.inquiry
    );

    let report = with_timeout(
        state.summarizer.summarize_with_report(&req.text, &req.inquiry),
        state.config.summarize_timeout_secs,
    )
    .await?;

    info!(
        request_id = %request_id,
        "Summary ready - Rounds: {}, Calls: {}",
        report.rounds,
        report.completion_calls
    );

    Ok(HttpResponse::Ok().json(SummarizeResponse {
        request_id,
        summary: report.summary,
        rounds: report.rounds,
        completion_calls: report.completion_calls,
        completed_at: Utc::now(),
    }))
}
