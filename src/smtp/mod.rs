//! SMTP front end that hands transactions to the mail sink

pub mod commands;
pub mod error;
pub mod response;
pub mod server;
pub mod session;

pub use error::{SmtpError, SmtpLimits};
pub use response::SmtpResponse;
pub use server::SmtpServer;
pub use session::{SmtpSession, SmtpState};
