//! Pipeline nodes: classify, route, and the two agent stages.

use std::sync::Arc;

use async_trait::async_trait;

use wxchat_core::{LlmRequest, Message, Runnable, WxchatError};
use wxchat_graph::{GraphState, StateUpdate};
use wxchat_llm::ChatModel;
use wxchat_mcp::ToolInvoker;

use crate::{Category, ChatState, Classify};

/// First stage: assign a category from the latest user message.
pub struct ClassifierNode {
    classifier: Box<dyn Classify>,
}

impl ClassifierNode {
    pub fn new(classifier: impl Classify + 'static) -> Self {
        Self {
            classifier: Box::new(classifier),
        }
    }
}

#[async_trait]
impl Runnable<GraphState<ChatState>, StateUpdate<ChatState>> for ClassifierNode {
    async fn invoke(
        &self,
        input: GraphState<ChatState>,
    ) -> Result<StateUpdate<ChatState>, WxchatError> {
        let message = input.data.last_user_message().unwrap_or("").to_string();
        let category = self.classifier.classify(&message).await;
        tracing::debug!(category = %category, "message classified");

        let mut data = input.data;
        data.category = Some(category);
        Ok(StateUpdate::new(data))
    }
}

/// Second stage: normalize the category before the conditional hand-off. A
/// missing category resolves to the default rather than failing the turn.
pub struct RouterNode {
    default: Category,
}

impl RouterNode {
    pub fn new(default: Category) -> Self {
        Self { default }
    }
}

#[async_trait]
impl Runnable<GraphState<ChatState>, StateUpdate<ChatState>> for RouterNode {
    async fn invoke(
        &self,
        input: GraphState<ChatState>,
    ) -> Result<StateUpdate<ChatState>, WxchatError> {
        let mut data = input.data;
        if data.category.is_none() {
            data.category = Some(self.default);
        }
        Ok(StateUpdate::new(data))
    }
}

/// Terminal stage: fetch context through the tool host, then generate a
/// reply grounded in it. Both agents share this shape; only the category
/// differs.
pub struct AgentNode {
    category: Category,
    tools: Arc<dyn ToolInvoker>,
    model: Arc<dyn ChatModel + Send + Sync>,
    model_id: String,
}

impl AgentNode {
    pub fn new(
        category: Category,
        tools: Arc<dyn ToolInvoker>,
        model: Arc<dyn ChatModel + Send + Sync>,
        model_id: impl Into<String>,
    ) -> Self {
        Self {
            category,
            tools,
            model,
            model_id: model_id.into(),
        }
    }

    fn system_prompt(&self, context: &str) -> String {
        let intro = match self.category {
            Category::PowerVs => {
                "You are a knowledgeable and courteous AI assistant that helps users \
                 with IBM Cloud Power Virtual Server (PowerVS) services."
            }
            Category::Schematics => {
                "You are a knowledgeable and courteous AI assistant that helps users \
                 with IBM Cloud Schematics (platform automation) services."
            }
        };
        format!("{intro}\nUse the following context to help answer questions:\n{context}")
    }
}

#[async_trait]
impl Runnable<GraphState<ChatState>, StateUpdate<ChatState>> for AgentNode {
    async fn invoke(
        &self,
        input: GraphState<ChatState>,
    ) -> Result<StateUpdate<ChatState>, WxchatError> {
        // A failed tool call becomes inline context; the turn still gets a
        // reply, possibly one that apologizes for missing data.
        let context = match self.tools.call(self.category.tool_name()).await {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!(category = %self.category, error = %err, "context fetch failed");
                format!("Error fetching {} workspaces: {err}", self.category)
            }
        };

        let user_message = input.data.last_user_message().unwrap_or("").to_string();
        let request = LlmRequest {
            model: self.model_id.clone(),
            messages: vec![
                Message::system(self.system_prompt(&context)),
                Message::user(user_message),
            ],
        };
        let response = self.model.invoke(request).await?;

        let mut data = input.data;
        data.messages.push(Message::assistant(response.content));
        data.context = Some(context);
        Ok(StateUpdate::new(data))
    }
}
