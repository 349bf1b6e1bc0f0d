mod dispatch;
mod parse;
mod registry;
mod types;

pub use dispatch::{CommandDispatchResult, dispatch, field_prompt_seed};
pub use parse::{parse_command_text, parse_pair};
pub use registry::{command_registry, find_command_spec};
pub use types::{ActionId, ArgKind, ArgSpec, Command, CommandOutcome, CommandSpec};
