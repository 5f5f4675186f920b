//! Mail session configuration and message materialization

use std::collections::HashMap;
use std::fmt;
use std::time::{Duration, SystemTime};

use lettre::address::Envelope;
use lettre::message::header::{ContentType, HeaderName, HeaderValue};
use lettre::message::{Mailbox, Message};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, SmtpTransport};
use serde::Deserialize;
use tracing::debug;

use crate::mail::error::{EmailError, EmailErrors};

/// Default SMTP port
pub const DEFAULT_SMTP_PORT: u16 = 25;

/// Default socket connection and I/O timeout in milliseconds
pub const DEFAULT_SOCKET_TIMEOUT_MS: u64 = 60_000;

/// Host and connection settings a session is created from
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub host_name: Option<String>,
    pub smtp_port: u16,
    pub socket_connection_timeout_ms: u64,
    pub socket_timeout_ms: u64,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            host_name: None,
            smtp_port: DEFAULT_SMTP_PORT,
            socket_connection_timeout_ms: DEFAULT_SOCKET_TIMEOUT_MS,
            socket_timeout_ms: DEFAULT_SOCKET_TIMEOUT_MS,
            username: None,
            password: None,
        }
    }
}

impl SessionConfig {
    /// The configured host name, if it is set and non-empty
    pub fn host(&self) -> Option<&str> {
        self.host_name.as_deref().filter(|host| !host.trim().is_empty())
    }
}

/// Everything the session needs to materialize one message
#[derive(Debug, Clone, Copy)]
pub struct MessageParts<'a> {
    pub from: &'a Mailbox,
    pub to: &'a [Mailbox],
    pub cc: &'a [Mailbox],
    pub bcc: &'a [Mailbox],
    pub reply_to: &'a [Mailbox],
    pub bounce_address: Option<&'a Address>,
    pub subject: Option<&'a str>,
    pub headers: &'a HashMap<String, String>,
    pub sent_date: SystemTime,
    pub body: &'a str,
    pub content_type: &'a ContentType,
}

/// A transport handle bound to one host configuration
///
/// Creating a session never opens a connection.
pub struct MailSession {
    host_name: String,
    smtp_port: u16,
    connection_timeout: Duration,
    socket_timeout: Duration,
    username: Option<String>,
    transport: SmtpTransport,
}

impl MailSession {
    /// Create a session from the given configuration
    pub fn new(config: &SessionConfig) -> Result<Self, EmailError> {
        let host_name = config
            .host()
            .ok_or_else(|| EmailError::MailConfiguration(EmailErrors::NO_HOST_NAME.to_string()))?
            .to_string();

        let connection_timeout = Duration::from_millis(config.socket_connection_timeout_ms);
        let socket_timeout = Duration::from_millis(config.socket_timeout_ms);

        let mut builder = SmtpTransport::builder_dangerous(host_name.as_str())
            .port(config.smtp_port)
            .timeout(Some(connection_timeout));

        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        debug!(host = %host_name, port = config.smtp_port, "created mail session");

        Ok(Self {
            host_name,
            smtp_port: config.smtp_port,
            connection_timeout,
            socket_timeout,
            username: config.username.clone(),
            transport: builder.build(),
        })
    }

    pub fn host_name(&self) -> &str {
        &self.host_name
    }

    pub fn smtp_port(&self) -> u16 {
        self.smtp_port
    }

    pub fn connection_timeout(&self) -> Duration {
        self.connection_timeout
    }

    pub fn socket_timeout(&self) -> Duration {
        self.socket_timeout
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// The underlying SMTP transport, for callers that deliver the message
    pub fn transport(&self) -> &SmtpTransport {
        &self.transport
    }

    /// Materialize a transport-native message from the given parts
    pub fn create_message(&self, parts: MessageParts<'_>) -> Result<Message, EmailError> {
        let mut builder = Message::builder()
            .from(parts.from.clone())
            .date(parts.sent_date);

        if let Some(subject) = parts.subject.filter(|subject| !subject.is_empty()) {
            builder = builder.subject(subject);
        }

        for mailbox in parts.to {
            builder = builder.to(mailbox.clone());
        }
        for mailbox in parts.cc {
            builder = builder.cc(mailbox.clone());
        }
        for mailbox in parts.bcc {
            builder = builder.bcc(mailbox.clone());
        }
        for mailbox in parts.reply_to {
            builder = builder.reply_to(mailbox.clone());
        }

        for (name, value) in parts.headers {
            builder = builder.raw_header(HeaderValue::new(header_name(name)?, value.clone()));
        }

        if let Some(bounce) = parts.bounce_address {
            let recipients = parts
                .to
                .iter()
                .chain(parts.cc)
                .chain(parts.bcc)
                .map(|mailbox| mailbox.email.clone())
                .collect();
            let envelope = Envelope::new(Some(bounce.clone()), recipients)
                .map_err(|e| EmailError::MailConfiguration(e.to_string()))?;
            builder = builder.envelope(envelope);
        }

        let message = builder
            .header(parts.content_type.clone())
            .body(parts.body.to_string())?;

        Ok(message)
    }
}

impl fmt::Debug for MailSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailSession")
            .field("host_name", &self.host_name)
            .field("smtp_port", &self.smtp_port)
            .field("connection_timeout", &self.connection_timeout)
            .field("socket_timeout", &self.socket_timeout)
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Validate a custom header field name
pub(crate) fn header_name(name: &str) -> Result<HeaderName, EmailError> {
    HeaderName::new_from_ascii(name.to_string())
        .map_err(|_| EmailError::InvalidArgument(EmailErrors::HEADER_NAME_INVALID))
}
