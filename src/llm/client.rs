use async_trait::async_trait;

use crate::analysis::Prompt;
use crate::error::AnalysisError;

/// Outbound text generation. Returns the model's raw reply text.
#[async_trait]
pub trait ModelClient: Send + Sync {
    async fn generate(&self, prompt: &Prompt) -> Result<String, AnalysisError>;

    /// Short name for logs.
    fn name(&self) -> &'static str;
}
