use serde::{Deserialize, Serialize};

use wxchat_core::{Message, Role};
use wxchat_graph::StateSchema;

/// Which downstream agent handles a turn.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    PowerVs,
    Schematics,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::PowerVs => "powervs",
            Category::Schematics => "schematics",
        }
    }

    /// Name of the remote tool that fetches this category's context.
    pub fn tool_name(&self) -> &'static str {
        match self {
            Category::PowerVs => "fetch_powervs_workspaces",
            Category::Schematics => "fetch_schematics_workspaces",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "powervs" => Some(Category::PowerVs),
            "schematics" => Some(Category::Schematics),
            _ => None,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Running conversation state carried through the pipeline. The message
/// history is append-only; `category` and `context` are rewritten each turn.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct ChatState {
    pub messages: Vec<Message>,
    pub category: Option<Category>,
    pub context: Option<String>,
}

impl StateSchema for ChatState {}

impl ChatState {
    pub fn last_user_message(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
    }

    pub fn last_assistant_message(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == Role::Assistant)
            .map(|m| m.content.as_str())
    }
}
