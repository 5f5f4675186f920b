//! TOML configuration for a session and a message draft

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::mail::email::Email;
use crate::mail::error::EmailError;
use crate::mail::session::SessionConfig;

/// The message half of a configuration file
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DraftConfig {
    pub from: Option<String>,
    pub to: Vec<String>,
    pub cc: Vec<String>,
    pub bcc: Vec<String>,
    pub reply_to: Vec<String>,
    pub bounce_address: Option<String>,
    pub subject: Option<String>,
    pub headers: HashMap<String, String>,
    pub body: Option<String>,
    pub content_type: Option<String>,
}

/// A complete configuration file
///
/// ```toml
/// [session]
/// host_name = "smtp.example.com"
/// smtp_port = 587
///
/// [message]
/// from = "sender@example.com"
/// to = ["recipient@example.com"]
/// subject = "Hello"
/// body = "Hi there"
///
/// [message.headers]
/// X-Mailer = "mogimail-compose"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MailConfig {
    pub session: SessionConfig,
    pub message: DraftConfig,
}

impl MailConfig {
    /// Parse a configuration from TOML text
    pub fn from_toml(config: &str) -> Result<Self, EmailError> {
        Ok(toml::from_str(config)?)
    }

    /// Read and parse a configuration file
    ///
    /// # Errors
    ///
    /// If the file doesn't exist or is not readable, or if its contents
    /// are not a valid configuration.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, EmailError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading configuration");
        Self::from_toml(&fs::read_to_string(path)?)
    }

    /// Apply the configuration to a fresh builder
    ///
    /// Every value goes through the builder's own validation.
    pub fn into_email(self) -> Result<Email, EmailError> {
        let MailConfig { session, message } = self;

        let mut email = Email::new();
        email.set_session_config(session);

        if let Some(from) = &message.from {
            email.set_from(from)?;
        }
        if !message.to.is_empty() {
            email.add_to_all(&message.to)?;
        }
        if !message.cc.is_empty() {
            email.add_cc_all(&message.cc)?;
        }
        if !message.bcc.is_empty() {
            email.add_bcc_all(&message.bcc)?;
        }
        for reply_to in &message.reply_to {
            email.add_reply_to(reply_to)?;
        }
        if let Some(bounce) = &message.bounce_address {
            email.set_bounce_address(bounce)?;
        }
        if let Some(subject) = &message.subject {
            email.set_subject(subject);
        }
        if !message.headers.is_empty() {
            email.set_headers(message.headers)?;
        }
        match (&message.body, &message.content_type) {
            (Some(body), Some(content_type)) => {
                email.set_content(body, content_type)?;
            }
            (Some(body), None) => {
                email.set_msg(body)?;
            }
            (None, _) => {}
        }

        Ok(email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    const CONFIG: &str = r#"
[session]
host_name = "smtp.example.com"
smtp_port = 2525
socket_connection_timeout_ms = 5000

[message]
from = "sender@example.com"
to = ["recipient@example.com", "other@example.com"]
bcc = ["hidden@example.com"]
reply_to = ["Tony Soprano <a.b@c.com>"]
subject = "Test Subject"
body = "Hello World"

[message.headers]
X-Priority = "1 (Highest)"
X-Mailer = "MyApp Mailer"
"#;

    #[test]
    fn test_parse_config() {
        let config = MailConfig::from_toml(CONFIG).unwrap();
        assert_eq!(config.session.host_name.as_deref(), Some("smtp.example.com"));
        assert_eq!(config.session.smtp_port, 2525);
        assert_eq!(config.session.socket_connection_timeout_ms, 5000);
        assert_eq!(config.session.socket_timeout_ms, 60_000);
        assert_eq!(config.message.to.len(), 2);
        assert_eq!(config.message.headers.len(), 2);
        assert!(config.message.content_type.is_none());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = MailConfig::from_toml("").unwrap();
        assert_eq!(config, MailConfig::default());
    }

    #[test]
    fn test_invalid_config() {
        let result = MailConfig::from_toml("[session]\nsmtp_port = \"not a port\"");
        assert!(matches!(result, Err(EmailError::Config(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = MailConfig::from_file("/nonexistent/compose.toml");
        assert!(matches!(result, Err(EmailError::Io(_))));
    }

    #[test]
    fn test_into_email() {
        let mut email = MailConfig::from_toml(CONFIG).unwrap().into_email().unwrap();
        assert_eq!(email.host_name(), Some("smtp.example.com"));
        assert_eq!(email.smtp_port(), 2525);
        assert_eq!(email.socket_connection_timeout(), Duration::from_millis(5000));
        assert_eq!(email.to_addresses().len(), 2);
        assert_eq!(email.bcc_addresses().len(), 1);
        assert_eq!(email.reply_to_addresses()[0].name.as_deref(), Some("Tony Soprano"));
        assert_eq!(email.header("X-Mailer"), Some("MyApp Mailer"));
        assert_eq!(email.content(), Some("Hello World"));

        let message = email.build_mime_message().unwrap();
        assert_eq!(message.recipient_count(), 3);
        assert_eq!(message.body(), "Hello World");
    }

    #[test]
    fn test_into_email_rejects_bad_address() {
        let config = MailConfig::from_toml("[message]\nto = [\"broken\"]").unwrap();
        assert!(matches!(
            config.into_email(),
            Err(EmailError::InvalidAddress { .. })
        ));
    }
}
