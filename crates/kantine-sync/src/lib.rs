//! External HTTP surfaces: the message backend the menus are read from and
//! the Slack webhook they are posted to.

mod error;
pub use error::SyncError;

pub mod slack;
pub mod source;

pub use slack::{SlackClient, build_blocks};
pub use source::{ParseClient, ParseConfig, load_messages_file, messages_from_response};
