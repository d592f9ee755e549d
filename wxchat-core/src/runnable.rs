use async_trait::async_trait;

use crate::WxchatError;

/// A unit of async work in a pipeline: graph nodes, LLM clients, and
/// classifiers all implement this.
#[async_trait]
pub trait Runnable<Input: Send + 'static, Output: Send + 'static> {
    async fn invoke(&self, input: Input) -> Result<Output, WxchatError>;
}
