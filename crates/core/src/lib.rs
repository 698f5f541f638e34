pub mod config;
pub mod error;
pub mod prompt;
pub mod record;

pub use config::Config;
pub use error::*;
pub use prompt::{ContextLabels, PromptTemplate};
pub use record::*;
