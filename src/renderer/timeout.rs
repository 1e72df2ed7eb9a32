//! Timeout wrapper for browser operations

use anyhow::Result;
use std::future::Future;
use std::time::Duration;

/// Run `operation` under `timeout`, naming the step in the timeout error
pub async fn with_page_timeout<F, T>(operation: F, timeout: Duration, operation_name: &str) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(timeout, operation).await {
        Ok(result) => result,
        Err(_) => Err(anyhow::anyhow!(
            "{operation_name} timeout after {} ms",
            timeout.as_millis()
        )),
    }
}
