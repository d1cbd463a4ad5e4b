//! Ingestion gate, bounded store and query engine

pub mod error;
pub mod filter;
pub mod gate;
pub mod message;
pub mod parser;
pub mod query;
pub mod store;

pub use error::MailError;
pub use filter::Criteria;
pub use gate::IngestionGate;
pub use message::{Envelope, Header, Mailbox, Message};
pub use query::QueryService;
pub use store::MailStore;

use std::num::NonZeroUsize;
use std::sync::Arc;

use tracing::{debug, info, warn};

/// Entry point the protocol layer calls into.
///
/// Holds the allow-set and the shared store. Cloning is cheap and every
/// clone feeds the same store.
#[derive(Debug, Clone)]
pub struct MailSink {
    gate: Arc<IngestionGate>,
    store: Arc<MailStore>,
}

impl MailSink {
    /// Create a sink with an allow-set (empty accepts all) and a capacity
    pub fn new(gate: IngestionGate, capacity: NonZeroUsize) -> Self {
        Self {
            gate: Arc::new(gate),
            store: Arc::new(MailStore::new(capacity)),
        }
    }

    /// Hook for `MAIL FROM`: accept or reject the declared sender
    pub fn on_sender_declared(&self, address: &str) -> Result<(), MailError> {
        self.gate.check_sender(address).inspect_err(|_| {
            warn!(address, "rejected sender not in whitelist");
        })
    }

    /// Hook for a completed DATA body.
    ///
    /// Parsing happens before the store lock is taken; a body that fails to
    /// parse is dropped and nothing is stored.
    pub fn on_body_received(
        &self,
        envelope: &Envelope,
        raw: &[u8],
    ) -> Result<Arc<Message>, MailError> {
        let message = parser::parse_message(envelope, raw).inspect_err(|e| {
            warn!(from = %envelope.from, error = %e, "discarding unparseable message");
        })?;

        info!(
            from = %message.envelope_from,
            to = ?message.envelope_to,
            subject = message.subject.as_deref().unwrap_or(""),
            "received message"
        );
        if let Ok(json) = serde_json::to_string(&message) {
            debug!(message = %json, "message contents");
        }

        Ok(self.store.insert(message))
    }

    /// Query service reading from this sink's store
    pub fn query(&self) -> QueryService {
        QueryService::new(Arc::clone(&self.store))
    }

    /// The store backing this sink
    pub fn store(&self) -> &MailStore {
        &self.store
    }
}
