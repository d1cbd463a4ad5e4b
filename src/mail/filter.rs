//! Message selection criteria

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::mail::message::Message;

/// Optional constraints a caller puts on the messages it wants.
///
/// Each unset field leaves that dimension unconstrained; an all-empty value
/// matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Criteria {
    /// Inclusive lower bound on the message date
    pub since: Option<DateTime<Utc>>,
    /// Inclusive upper bound on the message date
    pub until: Option<DateTime<Utc>>,
    /// Required To recipient
    pub to: Option<String>,
    /// Required sender
    pub from: Option<String>,
}

impl Criteria {
    /// Criteria that match every message
    pub fn any() -> Self {
        Self::default()
    }

    /// Keep messages dated at or after `since`
    pub fn since(mut self, since: DateTime<Utc>) -> Self {
        self.since = Some(since);
        self
    }

    /// Keep messages dated at or before `until`
    pub fn until(mut self, until: DateTime<Utc>) -> Self {
        self.until = Some(until);
        self
    }

    /// Keep messages with `address` among the recipients
    pub fn to(mut self, address: &str) -> Self {
        self.to = Some(address.to_owned());
        self
    }

    /// Keep messages with `address` among the senders
    pub fn from(mut self, address: &str) -> Self {
        self.from = Some(address.to_owned());
        self
    }

    /// Copy of these criteria with the recipient replaced by `address`
    pub fn addressed_to(&self, address: &str) -> Self {
        self.clone().to(address)
    }

    /// Whether a message satisfies every constraint that is set
    pub fn matches(&self, message: &Message) -> bool {
        matches(message, self)
    }
}

/// Evaluate a message against criteria
pub fn matches(message: &Message, criteria: &Criteria) -> bool {
    if let Some(since) = criteria.since
        && message.date < since
    {
        return false;
    }

    if let Some(until) = criteria.until
        && message.date > until
    {
        return false;
    }

    if let Some(to) = &criteria.to
        && !message.has_recipient(to)
    {
        return false;
    }

    if let Some(from) = &criteria.from
        && !message.is_from_sender(from)
    {
        return false;
    }

    true
}

/// Keep the matching messages, preserving their order
pub fn select<'a, I>(messages: I, criteria: &Criteria) -> Vec<Arc<Message>>
where
    I: IntoIterator<Item = &'a Arc<Message>>,
{
    messages
        .into_iter()
        .filter(|message| matches(message, criteria))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mail::message::Mailbox;
    use chrono::{Duration, TimeZone};

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 10, hour, 0, 0).unwrap()
    }

    fn message(from: &[&str], to: &[&str], date: DateTime<Utc>) -> Message {
        Message::new(
            from.iter().map(|addr| Mailbox::new(addr)).collect(),
            to.iter().map(|addr| Mailbox::new(addr)).collect(),
            date,
        )
    }

    #[test]
    fn test_empty_criteria_match_everything() {
        let message = message(&["a@x.com"], &["b@x.com"], at(12));

        assert!(matches(&message, &Criteria::any()));
    }

    #[test]
    fn test_since_is_inclusive() {
        let message = message(&["a@x.com"], &["b@x.com"], at(12));

        assert!(matches(&message, &Criteria::any().since(at(12))));
        assert!(matches(&message, &Criteria::any().since(at(11))));
        assert!(!matches(
            &message,
            &Criteria::any().since(at(12) + Duration::seconds(1))
        ));
    }

    #[test]
    fn test_until_is_inclusive() {
        let message = message(&["a@x.com"], &["b@x.com"], at(12));

        assert!(matches(&message, &Criteria::any().until(at(12))));
        assert!(matches(&message, &Criteria::any().until(at(13))));
        assert!(!matches(
            &message,
            &Criteria::any().until(at(12) - Duration::seconds(1))
        ));
    }

    #[test]
    fn test_date_window() {
        let criteria = Criteria::any().since(at(10)).until(at(14));

        assert!(criteria.matches(&message(&["a@x.com"], &["b@x.com"], at(10))));
        assert!(criteria.matches(&message(&["a@x.com"], &["b@x.com"], at(14))));
        assert!(!criteria.matches(&message(&["a@x.com"], &["b@x.com"], at(9))));
        assert!(!criteria.matches(&message(&["a@x.com"], &["b@x.com"], at(15))));
    }

    #[test]
    fn test_to_matches_any_recipient() {
        let message = message(&["a@x.com"], &["x@y.com", "y@y.com"], at(12));

        assert!(matches(&message, &Criteria::any().to("y@y.com")));
        assert!(matches(&message, &Criteria::any().to("x@y.com")));
        assert!(!matches(&message, &Criteria::any().to("z@y.com")));
    }

    #[test]
    fn test_from_matches_any_sender() {
        let message = message(&["a@x.com", "b@x.com"], &["c@x.com"], at(12));

        assert!(matches(&message, &Criteria::any().from("b@x.com")));
        assert!(!matches(&message, &Criteria::any().from("c@x.com")));
    }

    #[test]
    fn test_address_match_is_exact() {
        let message = message(&["a@x.com"], &["b@x.com"], at(12));

        assert!(!matches(&message, &Criteria::any().to("B@x.com")));
        assert!(!matches(&message, &Criteria::any().from("a@x")));
    }

    #[test]
    fn test_all_constraints_must_hold() {
        let message = message(&["a@x.com"], &["b@x.com"], at(12));
        let criteria = Criteria::any()
            .since(at(11))
            .until(at(13))
            .to("b@x.com")
            .from("a@x.com");

        assert!(matches(&message, &criteria));
        assert!(!matches(&message, &criteria.clone().from("other@x.com")));
        assert!(!matches(&message, &criteria.clone().to("other@x.com")));
        assert!(!matches(&message, &criteria.since(at(13))));
    }

    #[test]
    fn test_addressed_to_leaves_original_untouched() {
        let original = Criteria::any().to("q@x.com").from("a@x.com");
        let scoped = original.addressed_to("z@x.com");

        assert_eq!(scoped.to.as_deref(), Some("z@x.com"));
        assert_eq!(scoped.from.as_deref(), Some("a@x.com"));
        assert_eq!(original.to.as_deref(), Some("q@x.com"));
    }

    #[test]
    fn test_select_preserves_order() {
        let messages: Vec<Arc<Message>> = vec![
            Arc::new(message(&["a@x.com"], &["b@x.com"], at(14))),
            Arc::new(message(&["a@x.com"], &["c@x.com"], at(13))),
            Arc::new(message(&["a@x.com"], &["b@x.com"], at(12))),
        ];

        let selected = select(&messages, &Criteria::any().to("b@x.com"));

        assert_eq!(selected.len(), 2);
        assert!(Arc::ptr_eq(&selected[0], &messages[0]));
        assert!(Arc::ptr_eq(&selected[1], &messages[2]));
    }
}
