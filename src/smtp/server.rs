//! SMTP server implementation

use crate::mail::MailSink;
use crate::smtp::commands::SmtpCommandHandler;
use crate::smtp::error::{SmtpError, SmtpLimits};
use crate::smtp::response::SmtpResponse;
use crate::smtp::session::SmtpSession;

use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream, ToSocketAddrs};
use std::thread;

use tracing::{debug, error, info, warn};

/// SMTP server that feeds every accepted message into a [`MailSink`]
#[derive(Debug, Clone)]
pub struct SmtpServer {
    /// Server hostname
    hostname: String,
    sink: MailSink,
}

impl SmtpServer {
    /// Create a new SMTP server
    pub fn new(hostname: &str, sink: MailSink) -> Self {
        Self {
            hostname: hostname.to_owned(),
            sink,
        }
    }

    /// Start the server on the specified address (blocking)
    pub fn start<A: ToSocketAddrs>(&self, addr: A) -> Result<(), SmtpError> {
        let listener = TcpListener::bind(addr)?;
        self.start_with_listener(listener)
    }

    /// Start the server with an existing listener (blocking).
    ///
    /// Each connection is served on its own thread.
    pub fn start_with_listener(&self, listener: TcpListener) -> Result<(), SmtpError> {
        info!(addr = %listener.local_addr()?, "SMTP server listening");

        for stream in listener.incoming() {
            match stream {
                Ok(stream) => {
                    let server = self.clone();
                    thread::spawn(move || {
                        let peer = stream
                            .peer_addr()
                            .map(|addr| addr.to_string())
                            .unwrap_or_else(|_| "unknown".to_string());
                        debug!(%peer, "connection accepted");

                        if let Err(e) = server.handle_client(stream) {
                            error!(%peer, error = %e, "error handling client");
                        }
                    });
                }
                Err(e) => {
                    error!(error = %e, "error accepting connection");
                }
            }
        }

        Ok(())
    }

    /// Handle a client connection
    fn handle_client(&self, mut stream: TcpStream) -> Result<(), SmtpError> {
        let command_handler = SmtpCommandHandler::new(&self.hostname, &self.sink);
        let mut session = SmtpSession::new();
        let mut reader = BufReader::new(stream.try_clone()?);

        // Send greeting
        self.send_response(&mut stream, &SmtpResponse::greeting(&self.hostname))?;

        let mut line_buffer = Vec::new();
        loop {
            line_buffer.clear();

            match reader.read_until(b'\n', &mut line_buffer) {
                Ok(0) => break, // Connection closed
                Ok(_) => {
                    let line = strip_line_ending(&line_buffer);

                    // DATA lines are raw bytes; only the terminator gets a reply
                    if session.in_data_mode {
                        if let Some(response) = self.handle_data_line(line, &mut session) {
                            self.send_response(&mut stream, &response)?;
                        }
                        continue;
                    }

                    let command = match std::str::from_utf8(line) {
                        Ok(command) => command.trim(),
                        Err(_) => {
                            let response = SmtpResponse::from_error(&SmtpError::NonUtf8Data);
                            self.send_response(&mut stream, &response)?;
                            continue;
                        }
                    };
                    if command.is_empty() {
                        continue;
                    }

                    match command_handler.process_command(command, &mut session) {
                        Ok(response) => {
                            self.send_response(&mut stream, &response)?;
                            if response.code == "221" {
                                break; // QUIT command
                            }
                        }
                        Err(e) => {
                            self.send_response(&mut stream, &SmtpResponse::from_error(&e))?;
                        }
                    }
                }
                Err(e) => {
                    warn!(error = %e, "error reading from client");
                    break;
                }
            }
        }

        Ok(())
    }

    /// Handle a line of data during DATA mode.
    ///
    /// Returns the transaction reply once the terminating `.` arrives.
    fn handle_data_line(&self, line: &[u8], session: &mut SmtpSession) -> Option<SmtpResponse> {
        if line != b"." {
            if let Err(e) = session.add_data_line(line) {
                session.record_data_error(e);
            }
            return None;
        }

        let result = session
            .finish_data_collection()
            .and_then(|(envelope, data)| {
                self.sink
                    .on_body_received(&envelope, &data)
                    .map_err(SmtpError::from)
            });
        session.reset();

        Some(match result {
            Ok(_) => SmtpResponse::ok(),
            Err(e) => SmtpResponse::from_error(&e),
        })
    }

    /// Send a response to the client
    fn send_response(
        &self,
        stream: &mut TcpStream,
        response: &SmtpResponse,
    ) -> Result<(), SmtpError> {
        // Ensure response doesn't exceed maximum line length
        let formatted = response.format();
        if formatted.len() > SmtpLimits::REPLY_LINE_MAX_LENGTH {
            // Truncate message if too long
            let truncated_response =
                SmtpResponse::new(&response.code, "Response too long (truncated)");
            stream.write_all(truncated_response.format().as_bytes())?;
        } else {
            stream.write_all(formatted.as_bytes())?;
        }
        stream.flush()?;
        Ok(())
    }
}

/// Drop a trailing LF or CRLF
fn strip_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}
