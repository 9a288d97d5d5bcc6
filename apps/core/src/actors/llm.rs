use crate::actors::messages::{ActorError, AppError, ChatMessage, Completion, FunctionSpec, LlmMessage};
use crate::actors::traits::LlmActor;
use crate::config::LlmSettings;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::time::timeout;
use tracing::{debug, error, info, instrument};

/// Extra time the handle waits beyond the HTTP timeout before giving up on a reply.
const REPLY_GRACE: Duration = Duration::from_secs(5);

/// A handle to the `LlmActor`.
///
/// This struct provides a public, cloneable interface for sending messages to the
/// running LLM actor. It abstracts away the `mpsc::Sender`.
#[derive(Clone)]
pub struct LlmActorHandle {
    sender: mpsc::Sender<LlmMessage>,
    reply_timeout: Duration,
}

impl LlmActorHandle {
    /// Creates a new `LlmActor` and returns a handle to it.
    ///
    /// This will spawn the `LlmActorRunner` in a new Tokio task, so it must be
    /// called from within a runtime.
    pub fn new(settings: LlmSettings) -> Result<Self, AppError> {
        settings.check()?;

        let (sender, receiver) = mpsc::channel(32);
        let reply_timeout = Duration::from_secs(settings.timeout_secs) + REPLY_GRACE;
        let actor = LlmActorRunner::new(receiver, settings)?;
        tokio::spawn(async move { actor.run().await });

        Ok(Self { sender, reply_timeout })
    }
}

#[async_trait]
impl LlmActor for LlmActorHandle {
    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        function: Option<FunctionSpec>,
    ) -> Result<Completion, AppError> {
        let (send, recv) = oneshot::channel();
        let msg = LlmMessage::Complete {
            messages,
            function,
            responder: send,
        };

        self.sender
            .send(msg)
            .await
            .map_err(|e| ActorError::Mailbox(e.to_string()))?;
        timeout(self.reply_timeout, recv)
            .await?
            .map_err(|e| ActorError::Mailbox(e.to_string()))?
    }
}

// --- Actor Runner (Internal Logic) ---
struct LlmActorRunner {
    receiver: mpsc::Receiver<LlmMessage>,
    client: Client,
    settings: LlmSettings,
    request_timeout: Duration,
}

impl LlmActorRunner {
    fn new(receiver: mpsc::Receiver<LlmMessage>, settings: LlmSettings) -> Result<Self, AppError> {
        let request_timeout = Duration::from_secs(settings.timeout_secs);
        let client = Client::builder()
            .default_headers(auth_headers(&settings)?)
            .build()?;

        Ok(Self {
            receiver,
            client,
            settings,
            request_timeout,
        })
    }

    async fn run(mut self) {
        info!(
            model = %self.settings.model,
            azure = self.settings.is_azure(),
            "LlmActor started"
        );

        while let Some(msg) = self.receiver.recv().await {
            self.handle_message(msg).await;
        }

        info!("LlmActor stopped");
    }

    async fn handle_message(&mut self, msg: LlmMessage) {
        match msg {
            LlmMessage::Complete {
                messages,
                function,
                responder,
            } => {
                let result = self.chat_completion(messages, function).await;
                if let Err(e) = &result {
                    error!("Chat completion failed: {}", e);
                }
                let _ = responder.send(result);
            }
        }
    }

    /// `{endpoint}/chat/completions`, or the Azure deployment URL.
    fn completion_url(&self) -> String {
        let endpoint = self.settings.endpoint.trim_end_matches('/');
        match &self.settings.api_version {
            Some(version) => format!(
                "{}/openai/deployments/{}/chat/completions?api-version={}",
                endpoint, self.settings.model, version
            ),
            None => format!("{}/chat/completions", endpoint),
        }
    }

    fn build_payload(&self, messages: &[ChatMessage], function: Option<&FunctionSpec>) -> Value {
        let mut payload = serde_json::json!({
            "model": self.settings.model,
            "messages": messages,
            "temperature": self.settings.temperature,
        });

        if let Some(function) = function {
            payload["functions"] = serde_json::json!([function]);
            payload["function_call"] = serde_json::json!({ "name": function.name });
        }

        payload
    }

    #[instrument(skip_all, fields(messages = messages.len(), function = function.as_ref().map(|f| f.name.as_str())))]
    async fn chat_completion(
        &self,
        messages: Vec<ChatMessage>,
        function: Option<FunctionSpec>,
    ) -> Result<Completion, AppError> {
        let payload = self.build_payload(&messages, function.as_ref());
        debug!("Posting chat completion request");

        let request_future = self
            .client
            .post(self.completion_url())
            .json(&payload)
            .send();

        let res = timeout(self.request_timeout, request_future)
            .await?
            .map_err(ActorError::from)?;

        let status = res.status();

        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(ActorError::Status {
                status: status.as_u16(),
                body,
            }
            .into());
        }

        let json: Value = res
            .json()
            .await
            .map_err(|e| ActorError::MalformedResponse(e.to_string()))?;

        Ok(parse_completion(&json)?)
    }
}

fn auth_headers(settings: &LlmSettings) -> Result<HeaderMap, AppError> {
    let mut headers = HeaderMap::new();
    let Some(key) = &settings.api_key else {
        return Ok(headers);
    };

    let invalid = |_| AppError::Config("API key contains invalid header characters".to_string());
    if settings.is_azure() {
        let mut value = HeaderValue::from_str(key).map_err(invalid)?;
        value.set_sensitive(true);
        headers.insert("api-key", value);
    } else {
        let mut value = HeaderValue::from_str(&format!("Bearer {}", key)).map_err(invalid)?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
    }

    Ok(headers)
}

/// Extract the first choice's message: a legacy `function_call`, the first
/// `tool_calls` entry, or plain `content`.
fn parse_completion(json: &Value) -> Result<Completion, ActorError> {
    let message = json
        .pointer("/choices/0/message")
        .ok_or_else(|| ActorError::MalformedResponse("response has no choices[0].message".to_string()))?;

    let call = message
        .get("function_call")
        .or_else(|| message.pointer("/tool_calls/0/function"));

    if let Some(call) = call {
        let name = call["name"].as_str().unwrap_or_default().to_string();
        let arguments = match &call["arguments"] {
            Value::String(s) => s.clone(),
            Value::Null => {
                return Err(ActorError::MalformedResponse(
                    "function call has no arguments".to_string(),
                ))
            }
            other => other.to_string(),
        };
        return Ok(Completion::FunctionCall { name, arguments });
    }

    match message["content"].as_str() {
        Some(content) => Ok(Completion::Text(content.trim().to_string())),
        None => Err(ActorError::MalformedResponse(
            "message has neither content nor a function call".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn text_response(content: &str) -> Value {
        json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "choices": [{
                "index": 0,
                "message": { "role": "assistant", "content": content },
                "finish_reason": "stop"
            }]
        })
    }

    #[tokio::test]
    async fn test_chat_completion_success() {
        // 1. Arrange
        let mock_server = MockServer::start().await;
        let handle =
            LlmActorHandle::new(LlmSettings::new(mock_server.uri()).with_api_key("sk-test")).unwrap();

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_partial_json(json!({ "model": "gpt-4o" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(text_response("  Shorten the opening.  ")))
            .mount(&mock_server)
            .await;

        // 2. Act
        let result = handle
            .complete_text(vec![ChatMessage::system("coach"), ChatMessage::user("Hello")])
            .await;

        // 3. Assert
        assert_eq!(result.unwrap(), "Shorten the opening.");
    }

    #[tokio::test]
    async fn test_function_call_is_returned_raw() {
        // 1. Arrange
        let mock_server = MockServer::start().await;
        let handle = LlmActorHandle::new(LlmSettings::new(mock_server.uri())).unwrap();

        let body = json!({
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": null,
                    "function_call": { "name": "edit_email", "arguments": "{\"Subjects\": [" }
                }
            }]
        });
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_partial_json(json!({ "function_call": { "name": "edit_email" } })))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&mock_server)
            .await;

        let spec = FunctionSpec {
            name: "edit_email".to_string(),
            description: "Edit".to_string(),
            parameters: json!({ "type": "object" }),
        };

        // 2. Act
        let result = handle.complete(vec![ChatMessage::user("Edit this")], Some(spec)).await;

        // 3. Assert
        assert_eq!(
            result.unwrap(),
            Completion::FunctionCall {
                name: "edit_email".to_string(),
                arguments: "{\"Subjects\": [".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_azure_url_and_header() {
        // 1. Arrange
        let mock_server = MockServer::start().await;
        let settings = LlmSettings::new(mock_server.uri())
            .with_api_key("azure-key")
            .with_api_version("2024-06-01")
            .with_model("mail-deployment");
        let handle = LlmActorHandle::new(settings).unwrap();

        Mock::given(method("POST"))
            .and(path("/openai/deployments/mail-deployment/chat/completions"))
            .and(query_param("api-version", "2024-06-01"))
            .and(header("api-key", "azure-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(text_response("ok")))
            .expect(1)
            .mount(&mock_server)
            .await;

        // 2. Act
        let result = handle.complete_text(vec![ChatMessage::user("ping")]).await;

        // 3. Assert
        assert_eq!(result.unwrap(), "ok");
    }

    #[tokio::test]
    async fn test_chat_completion_server_error() {
        // 1. Arrange
        let mock_server = MockServer::start().await;
        let handle = LlmActorHandle::new(LlmSettings::new(mock_server.uri())).unwrap();

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
            .mount(&mock_server)
            .await;

        // 2. Act
        let result = handle.complete_text(vec![ChatMessage::user("Hello")]).await;

        // 3. Assert
        match result {
            Err(AppError::Actor(ActorError::Status { status, body })) => {
                assert_eq!(status, 500);
                assert!(body.contains("Internal Server Error"));
            }
            other => panic!("Expected a status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_response() {
        // 1. Arrange
        let mock_server = MockServer::start().await;
        let handle = LlmActorHandle::new(LlmSettings::new(mock_server.uri())).unwrap();

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
            .mount(&mock_server)
            .await;

        // 2. Act
        let result = handle.complete_text(vec![ChatMessage::user("Hello")]).await;

        // 3. Assert
        assert!(matches!(result, Err(AppError::Actor(ActorError::MalformedResponse(_)))));
    }

    #[test]
    fn test_parse_tool_calls() {
        let json = json!({
            "choices": [{
                "message": {
                    "tool_calls": [{
                        "type": "function",
                        "function": { "name": "edit_email", "arguments": { "Subjects": [] } }
                    }]
                }
            }]
        });

        match parse_completion(&json).unwrap() {
            Completion::FunctionCall { name, arguments } => {
                assert_eq!(name, "edit_email");
                assert_eq!(arguments, "{\"Subjects\":[]}");
            }
            other => panic!("unexpected completion {:?}", other),
        }
    }
}
