//! The one-shot message builder

use std::collections::HashMap;
use std::time::{Duration, SystemTime};

use lettre::Address;
use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use tracing::{debug, info, warn};

use crate::mail::address::{parse_address, parse_all, parse_mailbox, parse_named_mailbox};
use crate::mail::error::{EmailError, EmailErrors};
use crate::mail::message::MimeMessage;
use crate::mail::session::{MailSession, MessageParts, SessionConfig, header_name};

/// Headers that the builder writes from its own fields
const MANAGED_HEADERS: [&str; 11] = [
    "From",
    "To",
    "Cc",
    "Bcc",
    "Reply-To",
    "Subject",
    "Date",
    "Content-Type",
    "Content-Transfer-Encoding",
    "MIME-Version",
    "Message-ID",
];

/// Where the builder is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildState {
    /// Configuration may still change and a build may be attempted
    Unbuilt,
    /// A message has been built; further builds are rejected
    Built,
}

#[derive(Debug, Clone, Copy)]
enum AddressKind {
    To,
    Cc,
    Bcc,
    ReplyTo,
}

impl AddressKind {
    fn as_str(self) -> &'static str {
        match self {
            AddressKind::To => "to",
            AddressKind::Cc => "cc",
            AddressKind::Bcc => "bcc",
            AddressKind::ReplyTo => "reply-to",
        }
    }
}

/// Accumulates message configuration and builds exactly one [`MimeMessage`]
///
/// Mutators return `&mut Self` so calls can be chained with `?`:
///
/// ```rust
/// use mogimail_compose::Email;
///
/// # fn main() -> Result<(), mogimail_compose::EmailError> {
/// let mut email = Email::new();
/// email
///     .set_host_name("smtp.example.com")
///     .add_to("recipient@example.com")?
///     .set_from("sender@example.com")?
///     .set_subject("Test Subject");
///
/// let message = email.build_mime_message()?;
/// assert_eq!(message.subject(), Some("Test Subject"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct Email {
    session_config: SessionConfig,
    session: Option<MailSession>,
    from: Option<Mailbox>,
    to: Vec<Mailbox>,
    cc: Vec<Mailbox>,
    bcc: Vec<Mailbox>,
    reply_to: Vec<Mailbox>,
    bounce_address: Option<Address>,
    subject: Option<String>,
    headers: HashMap<String, String>,
    content: Option<(String, ContentType)>,
    sent_date: Option<SystemTime>,
    built: Option<MimeMessage>,
}

impl Email {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    fn list_mut(&mut self, kind: AddressKind) -> &mut Vec<Mailbox> {
        match kind {
            AddressKind::To => &mut self.to,
            AddressKind::Cc => &mut self.cc,
            AddressKind::Bcc => &mut self.bcc,
            AddressKind::ReplyTo => &mut self.reply_to,
        }
    }

    fn append(
        &mut self,
        kind: AddressKind,
        parsed: Result<Vec<Mailbox>, EmailError>,
    ) -> Result<&mut Self, EmailError> {
        let mailboxes =
            parsed.inspect_err(|e| warn!(kind = kind.as_str(), "rejected address: {e}"))?;
        debug!(kind = kind.as_str(), count = mailboxes.len(), "added addresses");
        self.list_mut(kind).extend(mailboxes);
        Ok(self)
    }

    fn replace(
        &mut self,
        kind: AddressKind,
        mailboxes: Vec<Mailbox>,
    ) -> Result<&mut Self, EmailError> {
        if mailboxes.is_empty() {
            warn!(kind = kind.as_str(), "rejected empty address list");
            return Err(EmailError::InvalidArgument(EmailErrors::ADDRESS_LIST_INVALID));
        }

        debug!(kind = kind.as_str(), count = mailboxes.len(), "replaced addresses");
        *self.list_mut(kind) = mailboxes;
        Ok(self)
    }

    /// Add a recipient to the To list
    pub fn add_to(&mut self, address: &str) -> Result<&mut Self, EmailError> {
        self.append(AddressKind::To, parse_mailbox(address).map(|m| vec![m]))
    }

    /// Add a recipient with a display name to the To list
    pub fn add_to_named(&mut self, address: &str, name: &str) -> Result<&mut Self, EmailError> {
        self.append(AddressKind::To, parse_named_mailbox(address, name).map(|m| vec![m]))
    }

    /// Add several recipients to the To list; nothing is added if any is malformed
    pub fn add_to_all<I, S>(&mut self, addresses: I) -> Result<&mut Self, EmailError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.append(AddressKind::To, parse_all(addresses))
    }

    /// Replace the To list
    pub fn set_to(&mut self, mailboxes: Vec<Mailbox>) -> Result<&mut Self, EmailError> {
        self.replace(AddressKind::To, mailboxes)
    }

    /// Add a recipient to the Cc list
    pub fn add_cc(&mut self, address: &str) -> Result<&mut Self, EmailError> {
        self.append(AddressKind::Cc, parse_mailbox(address).map(|m| vec![m]))
    }

    /// Add a recipient with a display name to the Cc list
    pub fn add_cc_named(&mut self, address: &str, name: &str) -> Result<&mut Self, EmailError> {
        self.append(AddressKind::Cc, parse_named_mailbox(address, name).map(|m| vec![m]))
    }

    /// Add several recipients to the Cc list; nothing is added if any is malformed
    pub fn add_cc_all<I, S>(&mut self, addresses: I) -> Result<&mut Self, EmailError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.append(AddressKind::Cc, parse_all(addresses))
    }

    /// Replace the Cc list
    pub fn set_cc(&mut self, mailboxes: Vec<Mailbox>) -> Result<&mut Self, EmailError> {
        self.replace(AddressKind::Cc, mailboxes)
    }

    /// Add a recipient to the Bcc list
    pub fn add_bcc(&mut self, address: &str) -> Result<&mut Self, EmailError> {
        self.append(AddressKind::Bcc, parse_mailbox(address).map(|m| vec![m]))
    }

    /// Add a recipient with a display name to the Bcc list
    pub fn add_bcc_named(&mut self, address: &str, name: &str) -> Result<&mut Self, EmailError> {
        self.append(AddressKind::Bcc, parse_named_mailbox(address, name).map(|m| vec![m]))
    }

    /// Add several recipients to the Bcc list; nothing is added if any is malformed
    pub fn add_bcc_all<I, S>(&mut self, addresses: I) -> Result<&mut Self, EmailError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.append(AddressKind::Bcc, parse_all(addresses))
    }

    /// Replace the Bcc list
    pub fn set_bcc(&mut self, mailboxes: Vec<Mailbox>) -> Result<&mut Self, EmailError> {
        self.replace(AddressKind::Bcc, mailboxes)
    }

    /// Add a Reply-To address
    pub fn add_reply_to(&mut self, address: &str) -> Result<&mut Self, EmailError> {
        self.append(AddressKind::ReplyTo, parse_mailbox(address).map(|m| vec![m]))
    }

    /// Add a Reply-To address with a display name
    pub fn add_reply_to_named(
        &mut self,
        address: &str,
        name: &str,
    ) -> Result<&mut Self, EmailError> {
        self.append(
            AddressKind::ReplyTo,
            parse_named_mailbox(address, name).map(|m| vec![m]),
        )
    }

    /// Replace the Reply-To list
    pub fn set_reply_to(&mut self, mailboxes: Vec<Mailbox>) -> Result<&mut Self, EmailError> {
        self.replace(AddressKind::ReplyTo, mailboxes)
    }

    /// Set the sender address
    pub fn set_from(&mut self, address: &str) -> Result<&mut Self, EmailError> {
        let mailbox = parse_mailbox(address)
            .inspect_err(|e| warn!("rejected from address: {e}"))?;
        debug!(from = %mailbox, "set from address");
        self.from = Some(mailbox);
        Ok(self)
    }

    /// Set the sender address with a display name
    pub fn set_from_named(&mut self, address: &str, name: &str) -> Result<&mut Self, EmailError> {
        let mailbox = parse_named_mailbox(address, name)
            .inspect_err(|e| warn!("rejected from address: {e}"))?;
        debug!(from = %mailbox, "set from address");
        self.from = Some(mailbox);
        Ok(self)
    }

    /// Set the envelope sender used for bounces instead of the From address
    pub fn set_bounce_address(&mut self, address: &str) -> Result<&mut Self, EmailError> {
        let address =
            parse_address(address).inspect_err(|e| warn!("rejected bounce address: {e}"))?;
        debug!(bounce = %address, "set bounce address");
        self.bounce_address = Some(address);
        Ok(self)
    }

    /// Add a custom header
    ///
    /// Both name and value must be non-empty, and the name must be a valid
    /// header field name. Headers such as `Subject` or `Content-Type` that have
    /// their own setter are rejected. On error the headers are left untouched.
    pub fn add_header(&mut self, name: &str, value: &str) -> Result<&mut Self, EmailError> {
        validate_header(name, value)
            .inspect_err(|e| warn!(header = name, "rejected header: {e}"))?;
        debug!(header = name, "added header");
        self.headers.insert(name.to_string(), value.to_string());
        Ok(self)
    }

    /// Replace all custom headers; nothing changes if any entry is invalid
    pub fn set_headers(
        &mut self,
        headers: HashMap<String, String>,
    ) -> Result<&mut Self, EmailError> {
        for (name, value) in &headers {
            validate_header(name, value)
                .inspect_err(|e| warn!(header = name.as_str(), "rejected header: {e}"))?;
        }
        debug!(count = headers.len(), "replaced headers");
        self.headers = headers;
        Ok(self)
    }

    /// Set the subject; an empty subject clears it
    pub fn set_subject(&mut self, subject: &str) -> &mut Self {
        self.subject = (!subject.is_empty()).then(|| subject.to_string());
        self
    }

    /// Set a plain text body
    pub fn set_msg(&mut self, text: &str) -> Result<&mut Self, EmailError> {
        if text.is_empty() {
            return Err(EmailError::InvalidArgument(EmailErrors::MESSAGE_EMPTY));
        }
        self.content = Some((text.to_string(), ContentType::TEXT_PLAIN));
        Ok(self)
    }

    /// Set a body with an explicit content type such as `text/html; charset=utf-8`
    pub fn set_content(&mut self, text: &str, mime_type: &str) -> Result<&mut Self, EmailError> {
        let content_type = ContentType::parse(mime_type)
            .map_err(|_| EmailError::InvalidArgument(EmailErrors::CONTENT_TYPE_INVALID))
            .inspect_err(|e| warn!(mime_type, "rejected content: {e}"))?;
        self.content = Some((text.to_string(), content_type));
        Ok(self)
    }

    /// Fix the sent date
    pub fn set_sent_date(&mut self, date: SystemTime) -> &mut Self {
        self.sent_date = Some(date);
        self
    }

    /// Set the host the mail session is created for
    pub fn set_host_name(&mut self, host_name: &str) -> &mut Self {
        self.session_config.host_name = Some(host_name.to_string());
        self.session = None;
        self
    }

    /// Clear the host name; a session can no longer be created afterwards
    pub fn clear_host_name(&mut self) -> &mut Self {
        self.session_config.host_name = None;
        self.session = None;
        self
    }

    /// Set the SMTP port
    pub fn set_smtp_port(&mut self, port: u16) -> &mut Self {
        self.session_config.smtp_port = port;
        self.session = None;
        self
    }

    /// Set SMTP credentials for the session
    pub fn set_authentication(&mut self, username: &str, password: &str) -> &mut Self {
        self.session_config.username = Some(username.to_string());
        self.session_config.password = Some(password.to_string());
        self.session = None;
        self
    }

    /// Stored with millisecond precision
    pub fn set_socket_connection_timeout(&mut self, timeout: Duration) -> &mut Self {
        self.session_config.socket_connection_timeout_ms = as_millis(timeout);
        self.session = None;
        self
    }

    /// Stored with millisecond precision
    pub fn set_socket_timeout(&mut self, timeout: Duration) -> &mut Self {
        self.session_config.socket_timeout_ms = as_millis(timeout);
        self.session = None;
        self
    }

    /// Replace the whole session configuration
    pub fn set_session_config(&mut self, config: SessionConfig) -> &mut Self {
        self.session_config = config;
        self.session = None;
        self
    }

    /// The configured host name, if any
    pub fn host_name(&self) -> Option<&str> {
        self.session_config.host_name.as_deref()
    }

    pub fn smtp_port(&self) -> u16 {
        self.session_config.smtp_port
    }

    pub fn socket_connection_timeout(&self) -> Duration {
        Duration::from_millis(self.session_config.socket_connection_timeout_ms)
    }

    pub fn socket_timeout(&self) -> Duration {
        Duration::from_millis(self.session_config.socket_timeout_ms)
    }

    pub fn session_config(&self) -> &SessionConfig {
        &self.session_config
    }

    /// The sent date, or the current time if none has been set
    pub fn sent_date(&self) -> SystemTime {
        self.sent_date.unwrap_or_else(SystemTime::now)
    }

    /// The sender, if one has been set
    pub fn from_address(&self) -> Option<&Mailbox> {
        self.from.as_ref()
    }

    pub fn to_addresses(&self) -> &[Mailbox] {
        &self.to
    }

    pub fn cc_addresses(&self) -> &[Mailbox] {
        &self.cc
    }

    pub fn bcc_addresses(&self) -> &[Mailbox] {
        &self.bcc
    }

    pub fn reply_to_addresses(&self) -> &[Mailbox] {
        &self.reply_to
    }

    pub fn bounce_address(&self) -> Option<&Address> {
        self.bounce_address.as_ref()
    }

    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Look up a custom header by name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    /// The body text, if one has been set
    pub fn content(&self) -> Option<&str> {
        self.content.as_ref().map(|(text, _)| text.as_str())
    }

    /// Get the mail session, creating it from the host configuration if needed
    ///
    /// The session is cached until a host, port, timeout or credential setter
    /// changes the configuration.
    pub fn mail_session(&mut self) -> Result<&MailSession, EmailError> {
        let session = match self.session.take() {
            Some(session) => session,
            None => MailSession::new(&self.session_config)
                .inspect_err(|e| warn!("failed to create mail session: {e}"))?,
        };
        Ok(self.session.insert(session))
    }

    /// The current lifecycle state
    pub fn state(&self) -> BuildState {
        if self.built.is_some() {
            BuildState::Built
        } else {
            BuildState::Unbuilt
        }
    }

    pub fn is_built(&self) -> bool {
        self.built.is_some()
    }

    /// The message produced by the successful build, if any
    pub fn mime_message(&self) -> Option<&MimeMessage> {
        self.built.as_ref()
    }

    /// Validate the configuration and build the message
    ///
    /// Succeeds at most once. A failed build leaves the builder unbuilt so the
    /// configuration can be fixed and the build attempted again; a second call
    /// after a success fails with [`EmailError::IllegalState`].
    pub fn build_mime_message(&mut self) -> Result<&MimeMessage, EmailError> {
        if self.built.is_some() {
            warn!("rejected rebuild of an already built message");
            return Err(EmailError::IllegalState(EmailErrors::ALREADY_BUILT));
        }

        self.mail_session()?;

        if self.to.is_empty() && self.cc.is_empty() && self.bcc.is_empty() {
            warn!("build failed: no recipients");
            return Err(EmailError::MailConfiguration(
                EmailErrors::NO_RECIPIENTS.to_string(),
            ));
        }

        let Some(from) = self.from.as_ref() else {
            warn!("build failed: no from address");
            return Err(EmailError::MailConfiguration(EmailErrors::NO_FROM.to_string()));
        };

        let session = self
            .session
            .as_ref()
            .ok_or_else(|| EmailError::MailConfiguration(EmailErrors::NO_HOST_NAME.to_string()))?;

        let (body, content_type) = match &self.content {
            Some((text, content_type)) => (text.clone(), content_type.clone()),
            None => (String::new(), ContentType::TEXT_PLAIN),
        };
        let sent_date = self.sent_date();

        let message = session.create_message(MessageParts {
            from,
            to: &self.to,
            cc: &self.cc,
            bcc: &self.bcc,
            reply_to: &self.reply_to,
            bounce_address: self.bounce_address.as_ref(),
            subject: self.subject.as_deref(),
            headers: &self.headers,
            sent_date,
            body: &body,
            content_type: &content_type,
        })?;

        let built = MimeMessage {
            from: from.clone(),
            to: self.to.clone(),
            cc: self.cc.clone(),
            bcc: self.bcc.clone(),
            reply_to: self.reply_to.clone(),
            bounce_address: self.bounce_address.clone(),
            subject: self.subject.clone(),
            headers: self.headers.clone(),
            sent_date,
            body,
            content_type,
            message,
        };

        info!(
            host = session.host_name(),
            recipients = built.recipient_count(),
            "built mime message"
        );

        Ok(self.built.insert(built))
    }
}

fn validate_header(name: &str, value: &str) -> Result<(), EmailError> {
    if name.is_empty() {
        return Err(EmailError::InvalidArgument(EmailErrors::HEADER_NAME_EMPTY));
    }
    if value.is_empty() {
        return Err(EmailError::InvalidArgument(EmailErrors::HEADER_VALUE_EMPTY));
    }
    header_name(name)?;
    if MANAGED_HEADERS
        .iter()
        .any(|managed| managed.eq_ignore_ascii_case(name))
    {
        return Err(EmailError::InvalidArgument(EmailErrors::HEADER_NAME_MANAGED));
    }
    Ok(())
}

fn as_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
