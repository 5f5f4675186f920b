//! Error types for the message builder

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EmailError {
    /// A required primitive argument was empty or malformed.
    #[error("{0}")]
    InvalidArgument(&'static str),

    #[error("Invalid email address {address:?}: {reason}")]
    InvalidAddress { address: String, reason: String },

    /// The builder is missing configuration needed for a session or a build.
    #[error("{0}")]
    MailConfiguration(String),

    #[error("{0}")]
    IllegalState(&'static str),

    #[error("Failed to materialize message: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("Invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Fixed error messages surfaced to callers
pub struct EmailErrors;

impl EmailErrors {
    pub const HEADER_NAME_EMPTY: &'static str = "name can not be null or empty";

    pub const HEADER_VALUE_EMPTY: &'static str = "value can not be null or empty";

    pub const HEADER_NAME_INVALID: &'static str = "name is not a valid header field name";

    pub const HEADER_NAME_MANAGED: &'static str =
        "name belongs to a header with a dedicated setter";

    pub const ADDRESS_LIST_INVALID: &'static str = "address list provided was invalid";

    pub const MESSAGE_EMPTY: &'static str = "message can not be null or empty";

    pub const CONTENT_TYPE_INVALID: &'static str = "content type is not a valid MIME type";

    pub const NO_HOST_NAME: &'static str = "cannot find valid hostname for mail session";

    pub const NO_RECIPIENTS: &'static str = "at least one receiver address required";

    pub const NO_FROM: &'static str = "from address required";

    pub const ALREADY_BUILT: &'static str = "the MimeMessage is already built";
}

impl EmailError {
    pub(crate) fn invalid_address(address: &str, reason: impl ToString) -> Self {
        EmailError::InvalidAddress {
            address: address.to_string(),
            reason: reason.to_string(),
        }
    }
}
