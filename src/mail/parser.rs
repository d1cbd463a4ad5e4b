//! Decoding of raw DATA bodies into [`Message`]s

use chrono::{DateTime, Utc};
use mail_parser::{Address, MessageParser};

use crate::mail::error::MailError;
use crate::mail::message::{Envelope, Header, Mailbox, Message};

/// Parse a received body into a structured message.
///
/// Header addresses take precedence; the envelope fills in a missing From or
/// To header. A missing or unreadable Date header falls back to the receive
/// time.
pub fn parse_message(envelope: &Envelope, raw: &[u8]) -> Result<Message, MailError> {
    if raw.iter().all(u8::is_ascii_whitespace) {
        return Err(MailError::EmptyMessage);
    }

    let parsed = MessageParser::default()
        .parse(raw)
        .ok_or(MailError::MalformedMessage)?;
    let received_at = Utc::now();

    let mut from = mailboxes(parsed.from());
    if from.is_empty() && !envelope.from.is_empty() {
        from.push(Mailbox::new(&envelope.from));
    }

    let mut to = mailboxes(parsed.to());
    if to.is_empty() {
        to = envelope.to.iter().map(|addr| Mailbox::new(addr)).collect();
    }

    let date = parsed
        .date()
        .and_then(|date| DateTime::from_timestamp(date.to_timestamp(), 0))
        .unwrap_or(received_at);

    Ok(Message {
        from,
        to,
        cc: mailboxes(parsed.cc()),
        subject: parsed.subject().map(str::to_owned),
        message_id: parsed.message_id().map(str::to_owned),
        date,
        text: parsed.body_text(0).map(|text| text.into_owned()),
        html: parsed.body_html(0).map(|html| html.into_owned()),
        headers: raw_headers(raw),
        envelope_from: envelope.from.clone(),
        envelope_to: envelope.to.clone(),
        received_at,
    })
}

/// Flatten an address header, groups included
fn mailboxes(address: Option<&Address<'_>>) -> Vec<Mailbox> {
    let addrs: Vec<&mail_parser::Addr<'_>> = match address {
        Some(Address::List(list)) => list.iter().collect(),
        Some(Address::Group(groups)) => groups
            .iter()
            .flat_map(|group| group.addresses.iter())
            .collect(),
        None => Vec::new(),
    };

    addrs
        .into_iter()
        .filter_map(|addr| {
            let address = addr.address.as_deref()?;
            Some(Mailbox {
                name: addr.name.as_deref().map(str::to_owned),
                address: address.to_owned(),
            })
        })
        .collect()
}

/// Undecoded header block as ordered name/value pairs, continuation lines
/// folded into the preceding header
fn raw_headers(raw: &[u8]) -> Vec<Header> {
    let text = String::from_utf8_lossy(raw);
    let mut headers: Vec<Header> = Vec::new();

    for line in text.lines() {
        let line = line.trim_end_matches('\r');
        if line.is_empty() {
            break;
        }

        if line.starts_with(' ') || line.starts_with('\t') {
            if let Some(last) = headers.last_mut() {
                last.value.push(' ');
                last.value.push_str(line.trim());
            }
        } else if let Some((name, value)) = line.split_once(':') {
            headers.push(Header {
                name: name.trim().to_owned(),
                value: value.trim().to_owned(),
            });
        }
    }

    headers
}
