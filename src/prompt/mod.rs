mod kind;
mod manager;

pub use kind::PromptKind;
pub use manager::{PromptKeyResult, PromptManager, PromptView};
