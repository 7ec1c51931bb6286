use distill_common::{AppConfig, Result};
use distill_llm::{CompletionService, RecursiveSummarizer, SummarizerConfig};
use std::sync::Arc;

/// Shared application state
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,

    /// Completion backend used by every route
    pub completion: Arc<dyn CompletionService>,

    /// Summarizer built on the same backend
    pub summarizer: RecursiveSummarizer,
}

impl AppState {
    /// Create state around an existing completion backend
    pub fn with_completion(config: AppConfig, completion: Arc<dyn CompletionService>) -> Result<Self> {
        let summarizer = RecursiveSummarizer::new(completion.clone(), SummarizerConfig::from(&config))?;

        Ok(Self {
            config,
            completion,
            summarizer,
        })
    }
}
