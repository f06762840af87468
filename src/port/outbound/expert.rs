//! Expert port: a black-box probabilistic forecaster.

use async_trait::async_trait;

use crate::error::Result;

/// A forecasting expert, usually wrapping an LLM backend.
///
/// Implementations must honour future cancellation: a dropped `complete`
/// future must abort the underlying transport call.
#[async_trait]
pub trait Expert: Send + Sync {
    /// Expert identity for registry lookup and logging. Names should be
    /// unique within one forecaster registry.
    fn name(&self) -> &str;

    /// Send a completion request and return the raw response text.
    async fn complete(&self, user_prompt: &str, system_prompt: &str) -> Result<String>;
}
