mod openai_compatible;
mod watsonx;

pub use openai_compatible::{OpenAiCompatibleBuilder, OpenAiCompatibleClient};
pub use watsonx::{WatsonxBuilder, WatsonxClient};
pub use wxchat_core::{LlmRequest, LlmResponse, Message, Role};

use wxchat_core::Runnable;

pub trait ChatModel: Runnable<LlmRequest, LlmResponse> {}

impl<T> ChatModel for T where T: Runnable<LlmRequest, LlmResponse> {}
