//! The immutable artifact produced by a successful build

use std::collections::HashMap;
use std::time::SystemTime;

use lettre::address::Envelope;
use lettre::message::header::ContentType;
use lettre::message::{Mailbox, Message};
use lettre::Address;

/// A built message: a snapshot of the builder plus the materialized message
#[derive(Debug, Clone)]
pub struct MimeMessage {
    pub(crate) from: Mailbox,
    pub(crate) to: Vec<Mailbox>,
    pub(crate) cc: Vec<Mailbox>,
    pub(crate) bcc: Vec<Mailbox>,
    pub(crate) reply_to: Vec<Mailbox>,
    pub(crate) bounce_address: Option<Address>,
    pub(crate) subject: Option<String>,
    pub(crate) headers: HashMap<String, String>,
    pub(crate) sent_date: SystemTime,
    pub(crate) body: String,
    pub(crate) content_type: ContentType,
    pub(crate) message: Message,
}

impl MimeMessage {
    pub fn from(&self) -> &Mailbox {
        &self.from
    }

    pub fn to(&self) -> &[Mailbox] {
        &self.to
    }

    pub fn cc(&self) -> &[Mailbox] {
        &self.cc
    }

    pub fn bcc(&self) -> &[Mailbox] {
        &self.bcc
    }

    pub fn reply_to(&self) -> &[Mailbox] {
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

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    pub fn sent_date(&self) -> SystemTime {
        self.sent_date
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn content_type(&self) -> &ContentType {
        &self.content_type
    }

    /// Total number of envelope recipients across to, cc and bcc
    pub fn recipient_count(&self) -> usize {
        self.to.len() + self.cc.len() + self.bcc.len()
    }

    /// Check if the message is addressed to a specific recipient in any list
    pub fn has_recipient(&self, address: &str) -> bool {
        self.to
            .iter()
            .chain(&self.cc)
            .chain(&self.bcc)
            .any(|mailbox| mailbox.email.to_string() == address)
    }

    /// The SMTP envelope the transport would use
    pub fn envelope(&self) -> &Envelope {
        self.message.envelope()
    }

    /// The transport-native message
    pub fn as_message(&self) -> &Message {
        &self.message
    }

    /// The message serialized as RFC 5322 bytes
    pub fn formatted(&self) -> Vec<u8> {
        self.message.formatted()
    }
}
