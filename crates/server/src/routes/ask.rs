use actix_web::{post, web, HttpResponse};
use distill_common::DistillError;
use distill_llm::{CompletionOptions, CompletionRequest};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;
use crate::timeout::with_timeout;
use crate::types::{AskRequest, AskResponse};

const ASK_TEMPERATURE: f32 = 0.6;
const ASK_MAX_TOKENS: u32 = 1024;

/// Forward a prompt to the ask model as-is
#[post("/ask")]
pub async fn ask(
    req: web::Json<AskRequest>,
    state: web::Data<Arc<AppState>>,
) -> Result<HttpResponse, ApiError> {
    if req.prompt.trim().is_empty() {
        return Err(DistillError::invalid_input("Prompt cannot be empty").into());
    }

    let request_id = Uuid::new_v4().to_string();
    info!(request_id = %request_id, "Ask request - Prompt: {}", req.prompt);

    let request = CompletionRequest::new(
        state.config.ask_model.clone(),
        req.prompt.clone(),
        CompletionOptions {
            temperature: Some(ASK_TEMPERATURE),
            max_tokens: Some(ASK_MAX_TOKENS),
        },
    );

    let answer = with_timeout(
        state.completion.complete(request),
        state.config.request_timeout_secs,
    )
    .await?;

    Ok(HttpResponse::Ok().json(AskResponse { request_id, answer }))
}
