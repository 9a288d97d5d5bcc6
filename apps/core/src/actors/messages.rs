use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

/// Defines errors that can occur within the actor system.
#[derive(Debug, thiserror::Error, Serialize, Clone)]
pub enum ActorError {
    /// The HTTP request could not be sent or its body could not be read.
    #[error("LLM request failed: {0}")]
    Request(String),
    /// The completion endpoint answered with a non-success status.
    #[error("Completion request failed with status {status}: {body}")]
    Status { status: u16, body: String },
    /// The actor's mailbox is closed or dropped the reply.
    #[error("Actor mailbox error: {0}")]
    Mailbox(String),
    /// An error indicating that an actor operation timed out.
    #[error("Operation timed out: {0}")]
    Timeout(String),
    /// The endpoint answered 2xx with a body we could not interpret.
    #[error("Malformed completion response: {0}")]
    MalformedResponse(String),
}

impl From<tokio::time::error::Elapsed> for ActorError {
    fn from(err: tokio::time::error::Elapsed) -> Self {
        ActorError::Timeout(format!("Actor operation timed out: {}", err))
    }
}

impl From<reqwest::Error> for ActorError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ActorError::Timeout(err.to_string())
        } else {
            ActorError::Request(err.to_string())
        }
    }
}

// Re-export AppError for convenience
pub use crate::error::AppError;

/// Speaker of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One role-tagged message of a chat completion request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: Role::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into() }
    }
}

/// JSON-schema function the model is forced to call for structured output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionSpec {
    pub name: String,
    pub description: String,
    /// JSON schema of the arguments object
    pub parameters: serde_json::Value,
}

/// What the model produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    /// Free text from `message.content`.
    Text(String),
    /// Raw, unparsed arguments of a function call.
    FunctionCall { name: String, arguments: String },
}

impl Completion {
    /// Text content, or the raw arguments of a function call.
    pub fn into_content(self) -> String {
        match self {
            Completion::Text(text) => text,
            Completion::FunctionCall { arguments, .. } => arguments,
        }
    }
}

/// Messages that can be sent to the `LlmActor`.
#[derive(Debug)]
pub enum LlmMessage {
    /// A request for one chat completion.
    Complete {
        messages: Vec<ChatMessage>,
        /// When set, the model is forced to call this function.
        function: Option<FunctionSpec>,
        /// A channel to send the completion back.
        responder: oneshot::Sender<Result<Completion, AppError>>,
    },
}
