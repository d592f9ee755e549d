mod error;
mod llm;
mod runnable;

pub use error::WxchatError;
pub use llm::{LlmRequest, LlmResponse, Message, Role};
pub use runnable::Runnable;
