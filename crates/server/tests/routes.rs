use actix_web::{http::StatusCode, test, web, App};
use async_trait::async_trait;
use distill_common::{AppConfig, DistillError, Result};
use distill_llm::{CompletionRequest, CompletionService};
use distill_server::routes;
use distill_server::types::{AskResponse, ErrorResponse, HealthResponse, SummarizeResponse};
use distill_server::AppState;
use std::sync::{Arc, Mutex};
use std::time::Duration;

enum Behavior {
    Fixed(&'static str),
    Fail(u16),
    Hang,
}

struct StubCompletion {
    behavior: Behavior,
    calls: Mutex<Vec<CompletionRequest>>,
}

impl StubCompletion {
    fn new(behavior: Behavior) -> Arc<Self> {
        Arc::new(Self {
            behavior,
            calls: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl CompletionService for StubCompletion {
    async fn complete(&self, request: CompletionRequest) -> Result<String> {
        self.calls.lock().unwrap().push(request);
        match self.behavior {
            Behavior::Fixed(text) => Ok(text.to_string()),
            Behavior::Fail(status) => Err(DistillError::api(status, "upstream said no")),
            Behavior::Hang => {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok("too late".to_string())
            }
        }
    }
}

fn state(stub: Arc<StubCompletion>) -> web::Data<Arc<AppState>> {
    let config = AppConfig {
        openai_api_key: "sk-test".to_string(),
        request_timeout_secs: 1,
        summarize_timeout_secs: 2,
        ..AppConfig::default()
    };
    web::Data::new(Arc::new(AppState::with_completion(config, stub).unwrap()))
}

#[actix_web::test]
async fn test_health() {
    let app = test::init_service(
        App::new()
            .app_data(state(StubCompletion::new(Behavior::Fixed("ok"))))
            .configure(routes::configure),
    )
    .await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let body: HealthResponse = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body.status, "ok");
    assert_eq!(body.model, "gpt-3.5-turbo");
}

#[actix_web::test]
async fn test_summarize_returns_summary_and_counters() {
    let stub = StubCompletion::new(Behavior::Fixed("Claims open Feb 23."));
    let app = test::init_service(
        App::new()
            .app_data(state(stub.clone()))
            .configure(routes::configure),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/summarize")
        .set_json(serde_json::json!({
            "text": "What is the token claim period?\n\n".repeat(100),
            "inquiry": "When can I claim?"
        }))
        .to_request();
    let body: SummarizeResponse = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body.summary, "Claims open Feb 23.");
    assert_eq!(body.rounds, 1);
    assert_eq!(body.completion_calls, stub.calls.lock().unwrap().len());
    assert!(!body.request_id.is_empty());
}

#[actix_web::test]
async fn test_summarize_rejects_empty_text() {
    let stub = StubCompletion::new(Behavior::Fixed("unused"));
    let app = test::init_service(
        App::new()
            .app_data(state(stub.clone()))
            .configure(routes::configure),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/summarize")
        .set_json(serde_json::json!({ "text": "", "inquiry": "anything" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: ErrorResponse = test::read_body_json(resp).await;
    assert!(body.error.contains("empty"));
    assert!(stub.calls.lock().unwrap().is_empty());
}

#[actix_web::test]
async fn test_upstream_failure_maps_to_bad_gateway() {
    let app = test::init_service(
        App::new()
            .app_data(state(StubCompletion::new(Behavior::Fail(500))))
            .configure(routes::configure),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/summarize")
        .set_json(serde_json::json!({ "text": "Some document.", "inquiry": "What?" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
}

#[actix_web::test]
async fn test_slow_service_times_out() {
    let app = test::init_service(
        App::new()
            .app_data(state(StubCompletion::new(Behavior::Hang)))
            .configure(routes::configure),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/ask")
        .set_json(serde_json::json!({ "prompt": "Hello?" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::GATEWAY_TIMEOUT);
    let body: ErrorResponse = test::read_body_json(resp).await;
    assert_eq!(body.error, "Timeout: LLM did not respond in 1 seconds");
}

#[actix_web::test]
async fn test_slow_summary_times_out_on_summarize_deadline() {
    let app = test::init_service(
        App::new()
            .app_data(state(StubCompletion::new(Behavior::Hang)))
            .configure(routes::configure),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/summarize")
        .set_json(serde_json::json!({ "text": "Some document.", "inquiry": "What?" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::GATEWAY_TIMEOUT);
    let body: ErrorResponse = test::read_body_json(resp).await;
    assert_eq!(body.error, "Timeout: LLM did not respond in 2 seconds");
}

#[actix_web::test]
async fn test_ask_forwards_prompt_to_ask_model() {
    let stub = StubCompletion::new(Behavior::Fixed("Collab.Land is a bot."));
    let app = test::init_service(
        App::new()
            .app_data(state(stub.clone()))
            .configure(routes::configure),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/ask")
        .set_json(serde_json::json!({ "prompt": "What is Collab.Land?" }))
        .to_request();
    let body: AskResponse = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body.answer, "Collab.Land is a bot.");

    let calls = stub.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].model, "gpt-4");
    assert_eq!(calls[0].prompt, "What is Collab.Land?");
    assert_eq!(calls[0].options.temperature, Some(0.6));
    assert_eq!(calls[0].options.max_tokens, Some(1024));
}
