//! Email notifications are handed to the client's mail handler as a
//! `mailto:` link. There is no delivery confirmation.

use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct MailtoLink {
    pub to: String,
    pub subject: String,
    pub body: String,
    /// Ready-to-open `mailto:` URL.
    pub href: String,
}

impl MailtoLink {
    pub fn new(to: impl Into<String>, subject: impl Into<String>, body: impl Into<String>) -> Self {
        let to = to.into();
        let subject = subject.into();
        let body = body.into();
        let href = format!(
            "mailto:{}?subject={}&body={}",
            to,
            encode_component(&subject),
            encode_component(&body)
        );
        Self {
            to,
            subject,
            body,
            href,
        }
    }

    /// `None` when there is no usable address on file.
    pub fn to_address(
        to: Option<&str>,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> Option<Self> {
        let to = to.map(str::trim).filter(|t| !t.is_empty())?;
        Some(Self::new(to, subject, body))
    }
}

/// Percent-encodes everything except `A-Z a-z 0-9 - _ . ! ~ * ' ( )`, the
/// same set browsers leave alone in `encodeURIComponent`.
pub fn encode_component(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => out.push(byte as char),
            other => out.push_str(&format!("%{other:02X}")),
        }
    }
    out
}
