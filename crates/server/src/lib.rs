//! Distill HTTP server
//!
//! Actix-web REST API in front of the recursive summarizer

mod error;
pub mod routes;
mod state;
mod timeout;
pub mod types;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use distill_common::{AppConfig, Result};
use distill_llm::OpenAiClient;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_actix_web::TracingLogger;

pub use error::ApiError;
pub use state::AppState;
pub use timeout::with_timeout;

/// Build state from configuration and serve until shutdown
pub async fn start_server(config: AppConfig) -> Result<()> {
    config.validate()?;

    let bind_addr = config.server_bind_address();
    let client = OpenAiClient::from_config(&config)?;
    check_completion_api(&client).await;

    let state = Arc::new(AppState::with_completion(config, Arc::new(client))?);
    let data = web::Data::new(state);

    info!("Starting HTTP server on {}", bind_addr);

    HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .wrap(Cors::permissive())
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind(&bind_addr)?
    .run()
    .await?;

    info!("HTTP server stopped");
    Ok(())
}

/// Log whether the completion API answers; the server starts either way
async fn check_completion_api(client: &OpenAiClient) -> bool {
    match client.check_connection().await {
        Ok(true) => {
            info!("Completion API reachable at {}", client.base_url());
            true
        }
        Ok(false) => {
            warn!(
                "Completion API at {} answered with an error status, check OPENAI_API_KEY",
                client.base_url()
            );
            false
        }
        Err(e) => {
            warn!("Completion API not reachable: {}", e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_unreachable_completion_api_does_not_block_startup() {
        // Nothing listens on port 9 locally
        let client = OpenAiClient::new("http://127.0.0.1:9", "sk-test", Duration::from_secs(2)).unwrap();
        assert!(!check_completion_api(&client).await);
    }
}
