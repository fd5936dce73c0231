/// Censor Service Library
///
/// Accepts or rejects comment text before it is stored. A comment is
/// rejected when its lowercased text contains any banned token.
pub mod config;
pub mod error;
pub mod handlers;
pub mod moderation;

pub use config::Config;
pub use error::{CensorError, Result};
pub use moderation::{Censor, ModerationResult};
