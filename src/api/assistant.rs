//! AI assistant conversations (`POST /assistant/messages`).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::ApiClient;
use crate::error::{Result, SiteworkError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssistantReply {
    pub reply: ChatMessage,
}

/// Something that answers a conversation
#[async_trait]
pub trait Assistant: Send + Sync {
    async fn reply(&self, request: &AssistantRequest) -> Result<ChatMessage>;
}

#[async_trait]
impl Assistant for ApiClient {
    async fn reply(&self, request: &AssistantRequest) -> Result<ChatMessage> {
        Ok(self.post_assistant(request).await?.reply)
    }
}

/// Offline assistant used with the mock backend
#[derive(Debug, Clone, Copy, Default)]
pub struct CannedAssistant;

#[async_trait]
impl Assistant for CannedAssistant {
    async fn reply(&self, request: &AssistantRequest) -> Result<ChatMessage> {
        let question = request
            .messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
            .unwrap_or_default();
        Ok(ChatMessage::assistant(format!(
            "The assistant is not connected in mock mode. You asked: \"{question}\""
        )))
    }
}

/// One conversation with the assistant, scoped to a project
#[derive(Debug, Clone, Default)]
pub struct AssistantSession {
    pub project_id: Option<String>,
    messages: Vec<ChatMessage>,
}

impl AssistantSession {
    pub fn new(project_id: Option<String>) -> Self {
        Self {
            project_id,
            messages: Vec::new(),
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Send `prompt` with the conversation so far. On failure the
    /// conversation is left as it was, so the prompt can be retried.
    pub async fn ask(&mut self, assistant: &dyn Assistant, prompt: &str) -> Result<&ChatMessage> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(SiteworkError::Validation("message cannot be empty".to_string()));
        }

        let mut messages = self.messages.clone();
        messages.push(ChatMessage::user(prompt));
        let request = AssistantRequest {
            project_id: self.project_id.clone(),
            messages,
        };
        debug!(turns = request.messages.len(), "asking assistant");
        let reply = assistant.reply(&request).await?;

        self.messages = request.messages;
        self.messages.push(reply);
        Ok(&self.messages[self.messages.len() - 1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Failing;

    #[async_trait]
    impl Assistant for Failing {
        async fn reply(&self, _request: &AssistantRequest) -> Result<ChatMessage> {
            Err(SiteworkError::request_failed("POST", "/assistant/messages", Some(500), "down"))
        }
    }

    #[test]
    fn test_request_wire_format() {
        let request = AssistantRequest {
            project_id: Some("prj-1".to_string()),
            messages: vec![ChatMessage::user("hi")],
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({"projectId": "prj-1", "messages": [{"role": "user", "content": "hi"}]})
        );
    }

    #[tokio::test]
    async fn test_ask_appends_both_turns() {
        let mut session = AssistantSession::new(None);
        let reply = session.ask(&CannedAssistant, "  open RFIs?  ").await.unwrap();
        assert!(reply.content.contains("open RFIs?"));
        assert_eq!(session.messages().len(), 2);
        assert_eq!(session.messages()[0], ChatMessage::user("open RFIs?"));
    }

    #[tokio::test]
    async fn test_failed_ask_leaves_conversation_untouched() {
        let mut session = AssistantSession::new(Some("prj-1".to_string()));
        session.ask(&CannedAssistant, "first").await.unwrap();
        assert!(session.ask(&Failing, "second").await.is_err());
        assert_eq!(session.messages().len(), 2);
    }

    #[tokio::test]
    async fn test_empty_prompt_is_rejected() {
        let mut session = AssistantSession::default();
        let err = session.ask(&CannedAssistant, "   ").await.unwrap_err();
        assert!(matches!(err, SiteworkError::Validation(_)));
    }
}
