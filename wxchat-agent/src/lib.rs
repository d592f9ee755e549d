mod chatbot;
mod classifier;
mod nodes;
mod state;

pub use chatbot::{build_chat_graph, Chatbot};
pub use classifier::{Classify, ClassifierConfig, KeywordClassifier, KeywordMatch, LlmClassifier};
pub use nodes::{AgentNode, ClassifierNode, RouterNode};
pub use state::{Category, ChatState};
