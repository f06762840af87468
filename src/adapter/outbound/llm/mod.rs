//! LLM expert adapters.

mod anthropic;
mod openai;

pub use anthropic::Anthropic;
pub use openai::OpenAi;
