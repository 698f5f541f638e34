pub mod prompt;
pub mod provider;
pub mod providers;

pub use prompt::build_prompt;
pub use provider::{LlmError, LlmProvider, Message, Role};
pub use providers::create_provider;
