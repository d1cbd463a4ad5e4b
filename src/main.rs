use std::net::{SocketAddr, TcpListener};
use std::thread;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};

use mailsink::{Config, MailSink, SmtpServer};

#[rocket::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    setup_logging(config.log_level());

    let sink = MailSink::new(config.gate(), config.max);
    info!(
        capacity = config.max.get(),
        whitelist = ?config.whitelist,
        "starting mailsink"
    );

    let smtp_addr = SocketAddr::new(config.bind, config.smtp_port);
    let listener = TcpListener::bind(smtp_addr)
        .with_context(|| format!("failed to bind SMTP listener on {smtp_addr}"))?;
    let server = SmtpServer::new(&config.hostname, sink.clone());

    thread::Builder::new()
        .name("smtp".to_string())
        .spawn(move || {
            if let Err(e) = server.start_with_listener(listener) {
                error!(error = %e, "SMTP server stopped");
            }
        })
        .context("failed to spawn SMTP thread")?;

    info!(
        "HTTP server listening on {}:{}, e-mails are available on /emails",
        config.bind, config.http_port
    );
    mailsink::http::build(sink.query(), config.bind, config.http_port)
        .launch()
        .await
        .map_err(|e| anyhow::anyhow!("HTTP server failed: {e}"))?;

    Ok(())
}

/// Set up tracing to stderr, honouring `RUST_LOG` when set.
fn setup_logging(level: &str) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}
