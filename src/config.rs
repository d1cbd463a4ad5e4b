//! Command-line configuration

use std::net::{IpAddr, Ipv4Addr};
use std::num::NonZeroUsize;

use clap::Parser;

use crate::mail::IngestionGate;

/// Local SMTP sink keeping the latest e-mails in memory
#[derive(Debug, Clone, Parser)]
#[command(name = "mailsink", version)]
pub struct Config {
    /// SMTP port to listen on
    #[arg(short = 's', long, env = "MAILSINK_SMTP_PORT", default_value_t = 1025)]
    pub smtp_port: u16,

    /// HTTP port to listen on
    #[arg(short = 'p', long, env = "MAILSINK_HTTP_PORT", default_value_t = 1080)]
    pub http_port: u16,

    /// Only accept e-mails from these addresses (comma-separated)
    #[arg(short, long, value_delimiter = ',', value_name = "ADDRESSES")]
    pub whitelist: Vec<String>,

    /// Max number of e-mails to keep
    #[arg(short, long, default_value = "100")]
    pub max: NonZeroUsize,

    /// Interface both listeners bind to
    #[arg(long, default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub bind: IpAddr,

    /// Hostname announced in SMTP replies
    #[arg(long, default_value = "mailsink.local")]
    pub hostname: String,

    /// Verbose logging (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Config {
    /// Allow-set built from the whitelist, blank entries dropped
    pub fn gate(&self) -> IngestionGate {
        IngestionGate::new(
            self.whitelist
                .iter()
                .map(|address| address.trim())
                .filter(|address| !address.is_empty()),
        )
    }

    /// Default log filter for the chosen verbosity
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}
