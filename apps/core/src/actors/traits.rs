use crate::actors::messages::{AppError, ChatMessage, Completion, FunctionSpec};
use async_trait::async_trait;

/// Defines the public interface for an LLM (Large Language Model) actor.
///
/// This trait abstracts the specific chat-completion backend so the email
/// coach can run against OpenAI, Azure OpenAI or a test double.
#[async_trait]
pub trait LlmActor: Send + Sync + 'static {
    /// Runs one chat completion over `messages`. When `function` is given the
    /// model must answer with a call to it.
    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        function: Option<FunctionSpec>,
    ) -> Result<Completion, AppError>;

    /// Free-text completion.
    async fn complete_text(&self, messages: Vec<ChatMessage>) -> Result<String, AppError> {
        Ok(self.complete(messages, None).await?.into_content())
    }
}
