//! # MailSink
//!
//! MailSink is a local SMTP sink for development.
//!
//! It accepts outbound mail instead of delivering it, keeps the most recent
//! messages in memory, and lets you query them over HTTP.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mailsink::{Criteria, IngestionGate, MailSink, SmtpServer};
//! use std::num::NonZeroUsize;
//! use std::thread;
//!
//! let sink = MailSink::new(IngestionGate::open(), NonZeroUsize::new(100).unwrap());
//! let server = SmtpServer::new("test.local", sink.clone());
//!
//! thread::spawn(move || {
//!     server.start("127.0.0.1:2525").unwrap();
//! });
//!
//! // Application sends email to localhost:2525
//! // ...
//!
//! // Check what was sent to a given address
//! for message in sink.query().get_emails_to("user@example.com", &Criteria::any()) {
//!     println!("Received {:?} from {:?}", message.subject, message.from);
//! }
//! ```
//!
//! ## HTTP routes
//!
//! - `GET /emails` - HTML list of all messages
//! - `GET /emails/<address>` - HTML list of messages to one address
//! - `GET /api/emails` - JSON array of all messages
//! - `GET /api/emails/<address>` - JSON array of messages to one address
//!
//! Every route accepts the optional query parameters `since`, `until`, `to`
//! and `from`. Values that cannot be parsed are ignored.
//!
//! ## Supported SMTP commands
//!
//! - `HELO` / `EHLO` - Identify the sender
//! - `MAIL FROM` - Specify the sender's address (checked against the whitelist)
//! - `RCPT TO` - Specify the destination (multiple destinations are supported)
//! - `DATA` - Send the email body
//! - `RSET` - Reset the current transaction
//! - `NOOP` - Do nothing
//! - `QUIT` - Close connection
//!
//! ## Notes
//!
//! - Runs in-memory only. Messages are lost on restart.
//! - Only the newest `max` messages are kept; older ones are dropped.
//! - SMTP authentication, SSL/TLS and relaying are not supported.

pub mod config;
pub mod http;
pub mod mail;
mod smtp;

pub use config::Config;
pub use mail::{
    Criteria, Envelope, IngestionGate, MailError, MailSink, MailStore, Mailbox, Message,
    QueryService,
};
pub use smtp::{SmtpError, SmtpLimits, SmtpResponse, SmtpServer, SmtpSession, SmtpState};
