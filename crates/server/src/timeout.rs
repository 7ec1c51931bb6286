use distill_common::{DistillError, Result};
use std::future::Future;
use std::time::Duration;

/// Fail with [`DistillError::Timeout`] when `fut` outlives `secs` seconds
///
/// The inner future is dropped on expiry; an in-flight HTTP request is
/// abandoned, not cancelled upstream.
pub async fn with_timeout<T, F>(fut: F, secs: u64) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(Duration::from_secs(secs), fut).await {
        Ok(result) => result,
        Err(_) => Err(DistillError::timeout(format!(
            "Timeout: LLM did not respond in {} seconds",
            secs
        ))),
    }
}
