//! # MogiMail Compose
//!
//! MogiMail Compose builds a single, validated MIME message from
//! host configuration, recipients, headers and a body.
//!
//! ## Quick Start
//!
//! ```rust
//! use mogimail_compose::Email;
//!
//! # fn main() -> Result<(), mogimail_compose::EmailError> {
//! let mut email = Email::new();
//! email.set_host_name("smtp.example.com");
//! email.add_to("recipient@example.com")?;
//! email.set_from("sender@example.com")?;
//! email.set_subject("Test Subject");
//! email.add_header("X-Mailer", "MyApp Mailer")?;
//! email.set_msg("Hello World")?;
//!
//! let message = email.build_mime_message()?;
//! let raw = String::from_utf8(message.formatted()).unwrap();
//! assert!(raw.contains("Subject: Test Subject"));
//!
//! // A builder produces exactly one message
//! assert!(email.build_mime_message().is_err());
//! # Ok(())
//! # }
//! ```
//!
//! ## Build Rules
//!
//! `build_mime_message` checks, in order:
//! - the message has not been built already
//! - a host name is set so a mail session can be created
//! - at least one To, Cc or Bcc recipient exists
//! - a From address is set
//!
//! A failed build leaves the builder untouched. Without a body the message
//! gets an empty `text/plain` part.
//!
//! ## Notes
//!
//! - Addresses are validated when they are added.
//! - Header names and values must be non-empty.
//! - Creating a mail session never opens a connection. Delivery is left to the
//!   caller through [`MailSession::transport`].
//! - Bcc recipients are part of the envelope but not of the formatted message.
//!
//! ## Configuration
//!
//! [`MailConfig`] reads a `[session]` and a `[message]` table from TOML and
//! turns them into an [`Email`].

mod mail;

pub use mail::{
    BuildState, DraftConfig, Email, EmailError, EmailErrors, MailConfig, MailSession,
    MessageParts, MimeMessage, SessionConfig,
};
pub use mail::address::{parse_address, parse_mailbox, parse_named_mailbox};
