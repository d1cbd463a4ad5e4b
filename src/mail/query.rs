//! Read side of the sink

use std::sync::Arc;

use crate::mail::filter::{self, Criteria};
use crate::mail::message::Message;
use crate::mail::store::MailStore;

/// Answers message queries from a fresh store snapshot on every call
#[derive(Debug, Clone)]
pub struct QueryService {
    store: Arc<MailStore>,
}

impl QueryService {
    /// Create a service over a shared store
    pub fn new(store: Arc<MailStore>) -> Self {
        Self { store }
    }

    /// All stored messages matching `criteria`, newest first
    pub fn get_emails(&self, criteria: &Criteria) -> Vec<Arc<Message>> {
        filter::select(&self.store.snapshot(), criteria)
    }

    /// Messages addressed to `address` that match the rest of `criteria`.
    ///
    /// Any `to` constraint in `criteria` is replaced by `address`.
    pub fn get_emails_to(&self, address: &str, criteria: &Criteria) -> Vec<Arc<Message>> {
        self.get_emails(&criteria.addressed_to(address))
    }
}
