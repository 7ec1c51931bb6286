use async_trait::async_trait;
use distill_common::Result;
use std::sync::Arc;

use crate::types::CompletionRequest;

/// Text generation backend
///
/// Implementations report every failure as an error; they never return a
/// partial completion.
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Generate text for a rendered prompt
    async fn complete(&self, request: CompletionRequest) -> Result<String>;
}

#[async_trait]
impl<T: CompletionService + ?Sized> CompletionService for Arc<T> {
    async fn complete(&self, request: CompletionRequest) -> Result<String> {
        (**self).complete(request).await
    }
}
