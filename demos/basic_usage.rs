//! Basic usage example for the MailSink library
//!
//! Starts an SMTP sink on an ephemeral port, sends two messages over a raw
//! SMTP conversation and queries what was captured.

use mailsink::{Criteria, IngestionGate, MailSink, SmtpServer};
use std::io::{BufRead, BufReader, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::num::NonZeroUsize;
use std::thread;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("MailSink Basic Usage Example");
    println!("============================");

    // Keep at most 10 messages and only accept mail from one sender
    let gate = IngestionGate::new(["sender@example.com"]);
    let sink = MailSink::new(gate, NonZeroUsize::new(10).ok_or("zero capacity")?);

    let listener = TcpListener::bind("127.0.0.1:0")?;
    let addr = listener.local_addr()?;
    let server = SmtpServer::new("example.local", sink.clone());

    thread::spawn(move || {
        if let Err(e) = server.start_with_listener(listener) {
            eprintln!("Server error: {e}");
        }
    });
    println!("Server started on {addr}");

    println!("\nSending test email...");
    send_email(
        addr,
        "sender@example.com",
        &["recipient@example.com"],
        &[
            "From: sender@example.com",
            "To: recipient@example.com",
            "Subject: Test Email from MailSink",
            "",
            "This is a test email sent to demonstrate",
            "the MailSink SMTP server functionality.",
        ],
    )?;

    println!("\nSending second test email...");
    send_email(
        addr,
        "sender@example.com",
        &["recipient@example.com", "another@example.com"],
        &[
            "From: sender@example.com",
            "To: recipient@example.com, another@example.com",
            "Subject: Second Test Email",
            "",
            "This is the second test email with multiple recipients.",
        ],
    )?;

    println!("\nSending from a sender outside the whitelist...");
    send_email(
        addr,
        "stranger@example.com",
        &["recipient@example.com"],
        &["Subject: Never stored", "", "Rejected at MAIL FROM."],
    )?;

    let query = sink.query();
    let emails = query.get_emails(&Criteria::any());
    println!("\nCaptured {} email(s), newest first:", emails.len());
    for email in &emails {
        println!("  {} | {:?}", email.date, email.subject);
    }

    let for_another = query.get_emails_to("another@example.com", &Criteria::any());
    println!("Emails for another@example.com: {}", for_another.len());

    let from_sender = query.get_emails(&Criteria::any().from("sender@example.com"));
    println!("Emails from sender@example.com: {}", from_sender.len());

    Ok(())
}

fn send_email(
    addr: SocketAddr,
    from: &str,
    to: &[&str],
    body: &[&str],
) -> Result<(), Box<dyn std::error::Error>> {
    let mut stream = TcpStream::connect(addr)?;
    let mut reader = BufReader::new(stream.try_clone()?);

    let mut response = String::new();
    reader.read_line(&mut response)?;
    print!("S: {response}");

    exchange(&mut stream, &mut reader, "HELO client.example.com")?;
    if !exchange(&mut stream, &mut reader, &format!("MAIL FROM:<{from}>"))?.starts_with("250") {
        exchange(&mut stream, &mut reader, "QUIT")?;
        return Ok(());
    }
    for recipient in to {
        exchange(&mut stream, &mut reader, &format!("RCPT TO:<{recipient}>"))?;
    }
    exchange(&mut stream, &mut reader, "DATA")?;

    // Body lines get no reply; the server answers the terminating dot
    for line in body {
        writeln!(stream, "{line}")?;
    }
    exchange(&mut stream, &mut reader, ".")?;
    exchange(&mut stream, &mut reader, "QUIT")?;

    Ok(())
}

/// Send one line and print the single-line reply
fn exchange(
    stream: &mut TcpStream,
    reader: &mut BufReader<TcpStream>,
    line: &str,
) -> Result<String, std::io::Error> {
    writeln!(stream, "{line}")?;
    let mut response = String::new();
    reader.read_line(&mut response)?;
    print!("C: {line}\nS: {response}");
    Ok(response)
}
