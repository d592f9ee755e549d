//! The conversation pipeline: classify -> route -> agent -> reply.

use std::sync::Arc;

use wxchat_core::Message;
use wxchat_graph::{ExecutableGraph, GraphBuilder, GraphError, GraphState};
use wxchat_llm::ChatModel;
use wxchat_mcp::ToolInvoker;

use crate::{AgentNode, Category, ChatState, Classify, ClassifierNode, RouterNode};

const DEFAULT_CATEGORY: Category = Category::PowerVs;

/// Wire the four-stage graph. The router's conditional edge picks the agent
/// named after the resolved category; both agent nodes are terminal.
pub fn build_chat_graph(
    classifier: impl Classify + 'static,
    tools: Arc<dyn ToolInvoker>,
    model: Arc<dyn ChatModel + Send + Sync>,
    model_id: impl Into<String>,
) -> Result<ExecutableGraph<ChatState>, GraphError> {
    let model_id = model_id.into();
    GraphBuilder::new()
        .add_node("classifier", ClassifierNode::new(classifier))
        .add_node("router", RouterNode::new(DEFAULT_CATEGORY))
        .add_node(
            Category::PowerVs.as_str(),
            AgentNode::new(
                Category::PowerVs,
                Arc::clone(&tools),
                Arc::clone(&model),
                model_id.clone(),
            ),
        )
        .add_node(
            Category::Schematics.as_str(),
            AgentNode::new(Category::Schematics, tools, model, model_id),
        )
        .set_entry("classifier")
        .add_edge("classifier", "router")
        .add_conditional_edge("router", |state: &GraphState<ChatState>| {
            state
                .data
                .category
                .unwrap_or(DEFAULT_CATEGORY)
                .as_str()
                .to_string()
        })
        .build()
}

/// Holds the graph plus the running history; one instance per conversation.
pub struct Chatbot {
    graph: ExecutableGraph<ChatState>,
    state: ChatState,
}

impl Chatbot {
    pub fn new(graph: ExecutableGraph<ChatState>) -> Self {
        Self {
            graph,
            state: ChatState::default(),
        }
    }

    /// Run one user turn through the pipeline and return the assistant reply.
    pub async fn turn(&mut self, input: &str) -> Result<String, GraphError> {
        self.state.messages.push(Message::user(input));
        let out = self.graph.invoke(GraphState::new(self.state.clone())).await?;
        self.state = out.data;
        Ok(self
            .state
            .last_assistant_message()
            .unwrap_or_default()
            .to_string())
    }

    pub fn history(&self) -> &[Message] {
        &self.state.messages
    }

    pub fn reset(&mut self) {
        self.state = ChatState::default();
    }
}
