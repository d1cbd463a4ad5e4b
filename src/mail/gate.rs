//! Sender allow-list checked at `MAIL FROM`

use std::collections::HashSet;

use crate::mail::error::MailError;

/// Decides whether a declared sender may hand over a message.
///
/// An empty allow-set accepts everyone. The set is fixed at construction, so
/// checks need no locking.
#[derive(Debug, Clone, Default)]
pub struct IngestionGate {
    allowed: HashSet<String>,
}

impl IngestionGate {
    /// Create a gate from the configured addresses
    pub fn new<I, S>(allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed: allowed.into_iter().map(Into::into).collect(),
        }
    }

    /// Create a gate that accepts every sender
    pub fn open() -> Self {
        Self::default()
    }

    /// Whether every sender is accepted
    pub fn is_open(&self) -> bool {
        self.allowed.is_empty()
    }

    /// Accept or reject a sender address (exact match)
    pub fn check_sender(&self, address: &str) -> Result<(), MailError> {
        if self.is_open() || self.allowed.contains(address) {
            Ok(())
        } else {
            Err(MailError::SenderRejected {
                address: address.to_owned(),
            })
        }
    }
}
