//! Address record parsing

use lettre::Address;
use lettre::message::Mailbox;

use crate::mail::error::EmailError;

/// Parse a bare address or a `Name <local@domain>` form into a mailbox
pub fn parse_mailbox(address: &str) -> Result<Mailbox, EmailError> {
    let trimmed = address.trim();
    if trimmed.is_empty() {
        return Err(EmailError::invalid_address(address, "address is empty"));
    }

    trimmed
        .parse::<Mailbox>()
        .map_err(|e| EmailError::invalid_address(address, e))
}

/// Parse an address and attach a display name to it
///
/// An empty or blank name leaves the mailbox without a display name.
pub fn parse_named_mailbox(address: &str, name: &str) -> Result<Mailbox, EmailError> {
    let email = parse_address(address)?;
    let name = name.trim();
    let name = (!name.is_empty()).then(|| name.to_string());
    Ok(Mailbox::new(name, email))
}

/// Parse a bare `local@domain` address
pub fn parse_address(address: &str) -> Result<Address, EmailError> {
    let trimmed = address.trim();
    if trimmed.is_empty() {
        return Err(EmailError::invalid_address(address, "address is empty"));
    }

    trimmed
        .parse::<Address>()
        .map_err(|e| EmailError::invalid_address(address, e))
}

/// Parse every address, failing on the first malformed one
pub fn parse_all<I, S>(addresses: I) -> Result<Vec<Mailbox>, EmailError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    addresses
        .into_iter()
        .map(|address| parse_mailbox(address.as_ref()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_address() {
        let mailbox = parse_mailbox("abc@bc.com").unwrap();
        assert_eq!(mailbox.email.to_string(), "abc@bc.com");
        assert!(mailbox.name.is_none());
    }

    #[test]
    fn test_parse_address_with_display_name() {
        let mailbox = parse_mailbox("Tony Soprano <a.b@c.com>").unwrap();
        assert_eq!(mailbox.email.to_string(), "a.b@c.com");
        assert_eq!(mailbox.name.as_deref(), Some("Tony Soprano"));
    }

    #[test]
    fn test_parse_named_mailbox() {
        let mailbox = parse_named_mailbox("a.b@c.com", "Tony Soprano").unwrap();
        assert_eq!(mailbox.name.as_deref(), Some("Tony Soprano"));

        let unnamed = parse_named_mailbox("a.b@c.com", "  ").unwrap();
        assert!(unnamed.name.is_none());
    }

    #[test]
    fn test_rejects_malformed_addresses() {
        for bad in ["", "   ", "no-at-sign", "user@", "@example.com"] {
            let result = parse_mailbox(bad);
            assert!(
                matches!(result, Err(EmailError::InvalidAddress { .. })),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_parse_all_fails_on_first_bad_entry() {
        let result = parse_all(["abc@bc.com", "broken", "a.b@c.com"]);
        match result {
            Err(EmailError::InvalidAddress { address, .. }) => assert_eq!(address, "broken"),
            other => panic!("unexpected result: {other:?}"),
        }

        let all = parse_all(["abc@bc.com", "a.b@c.com"]).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[1].email.to_string(), "a.b@c.com");
    }
}
