//! Error types for the ingestion core

use thiserror::Error;

/// Reasons an inbound message is refused before it reaches the store
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MailError {
    /// The allow-set is non-empty and the sender is not a member
    #[error("Invalid email from: {address}")]
    SenderRejected { address: String },

    /// The message body contained nothing but whitespace
    #[error("Message body is empty")]
    EmptyMessage,

    /// The message body could not be decoded into a structured message
    #[error("Message could not be parsed")]
    MalformedMessage,
}

impl MailError {
    /// Whether this error came from the message parser rather than the gate
    pub fn is_parse_failure(&self) -> bool {
        matches!(self, MailError::EmptyMessage | MailError::MalformedMessage)
    }
}
