//! MIME message builder implementation

pub mod address;
pub mod config;
pub mod email;
pub mod error;
pub mod message;
pub mod session;

pub use config::{DraftConfig, MailConfig};
pub use email::{BuildState, Email};
pub use error::{EmailError, EmailErrors};
pub use message::MimeMessage;
pub use session::{MailSession, MessageParts, SessionConfig};
