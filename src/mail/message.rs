//! Captured message data structures

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A single address as it appeared in a From/To/Cc header
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mailbox {
    /// Display name, if the header carried one
    pub name: Option<String>,
    /// The bare address
    pub address: String,
}

impl Mailbox {
    /// Create a mailbox without a display name
    pub fn new(address: &str) -> Self {
        Self {
            name: None,
            address: address.to_owned(),
        }
    }

    /// Create a mailbox with a display name
    pub fn named(name: &str, address: &str) -> Self {
        Self {
            name: Some(name.to_owned()),
            address: address.to_owned(),
        }
    }
}

/// A raw header line, kept in the order it was received
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Header {
    pub name: String,
    pub value: String,
}

/// The SMTP envelope of one mail transaction
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Envelope {
    /// Reverse-path from `MAIL FROM`
    pub from: String,
    /// Forward-paths from `RCPT TO`, in order
    pub to: Vec<String>,
}

impl Envelope {
    /// Create an envelope from the reverse-path and forward-paths
    pub fn new(from: String, to: Vec<String>) -> Self {
        Self { from, to }
    }
}

/// A message accepted by the sink.
///
/// Messages are shared behind `Arc` once stored and are never mutated
/// afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Sender identities from the From header
    pub from: Vec<Mailbox>,

    /// Recipients from the To header
    pub to: Vec<Mailbox>,

    /// Recipients from the Cc header
    pub cc: Vec<Mailbox>,

    pub subject: Option<String>,

    pub message_id: Option<String>,

    /// The Date header, or the receive time when absent
    pub date: DateTime<Utc>,

    /// First text/plain body part
    pub text: Option<String>,

    /// First text/html body part
    pub html: Option<String>,

    /// Every header of the message, in order
    pub headers: Vec<Header>,

    /// Reverse-path given at `MAIL FROM`
    pub envelope_from: String,

    /// Forward-paths given at `RCPT TO`
    pub envelope_to: Vec<String>,

    /// When the sink finished receiving the message
    pub received_at: DateTime<Utc>,
}

impl Message {
    /// Create a message with the given header addresses and date.
    ///
    /// The envelope mirrors the header addresses; every other field is empty.
    pub fn new(from: Vec<Mailbox>, to: Vec<Mailbox>, date: DateTime<Utc>) -> Self {
        let envelope_from = from
            .first()
            .map(|mailbox| mailbox.address.clone())
            .unwrap_or_default();
        let envelope_to = to.iter().map(|mailbox| mailbox.address.clone()).collect();

        Self {
            from,
            to,
            cc: Vec::new(),
            subject: None,
            message_id: None,
            date,
            text: None,
            html: None,
            headers: Vec::new(),
            envelope_from,
            envelope_to,
            received_at: Utc::now(),
        }
    }

    /// Set the subject line
    pub fn with_subject(mut self, subject: &str) -> Self {
        self.subject = Some(subject.to_owned());
        self
    }

    /// Set the plain-text body
    pub fn with_text(mut self, text: &str) -> Self {
        self.text = Some(text.to_owned());
        self
    }

    /// Addresses of every sender identity
    pub fn sender_addresses(&self) -> impl Iterator<Item = &str> {
        self.from.iter().map(|mailbox| mailbox.address.as_str())
    }

    /// Addresses of every To recipient
    pub fn recipient_addresses(&self) -> impl Iterator<Item = &str> {
        self.to.iter().map(|mailbox| mailbox.address.as_str())
    }

    /// Check if this message was addressed to a specific recipient
    pub fn has_recipient(&self, recipient: &str) -> bool {
        self.recipient_addresses().any(|addr| addr == recipient)
    }

    /// Check if any sender identity matches
    pub fn is_from_sender(&self, sender: &str) -> bool {
        self.sender_addresses().any(|addr| addr == sender)
    }

    /// Look up the first header with this name (case-insensitive)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|header| header.name.eq_ignore_ascii_case(name))
            .map(|header| header.value.as_str())
    }
}
