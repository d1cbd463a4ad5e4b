use lettre::message::{Mailbox, Message as LettreMessage};
use lettre::{SmtpTransport, Transport};
use mailsink::{Criteria, IngestionGate, MailSink, SmtpServer};
use std::error::Error;
use std::net::TcpListener;
use std::num::NonZeroUsize;
use std::thread;

fn start_server(gate: IngestionGate) -> Result<(u16, MailSink), Box<dyn Error>> {
    let listener = TcpListener::bind("127.0.0.1:0")?;
    let port = listener.local_addr()?.port();
    let sink = MailSink::new(gate, NonZeroUsize::new(10).unwrap());
    let server = SmtpServer::new("localhost", sink.clone());

    thread::spawn(move || {
        server
            .start_with_listener(listener)
            .expect("server start failed")
    });

    Ok((port, sink))
}

#[test]
fn basic_lettre_send() -> Result<(), Box<dyn Error>> {
    let (port, sink) = start_server(IngestionGate::open())?;

    let message = LettreMessage::builder()
        .from("花子 <hanako@example.com>".parse::<Mailbox>()?)
        .to("太郎 <tarou@example.com>".parse::<Mailbox>()?)
        .subject("件名")
        .body("本文".to_owned())?;

    let mailer = SmtpTransport::builder_dangerous("127.0.0.1")
        .port(port)
        .build();

    mailer.send(&message)?;

    let emails = sink
        .query()
        .get_emails_to("tarou@example.com", &Criteria::any());
    assert_eq!(emails.len(), 1);

    let email = &emails[0];
    assert_eq!(email.envelope_from, "hanako@example.com");
    assert_eq!(email.envelope_to, vec!["tarou@example.com"]);
    assert_eq!(email.subject.as_deref(), Some("件名"));
    assert_eq!(email.from[0].name.as_deref(), Some("花子"));
    assert_eq!(email.text.as_deref().map(str::trim), Some("本文"));

    Ok(())
}

#[test]
fn lettre_send_rejected_by_whitelist() -> Result<(), Box<dyn Error>> {
    let (port, sink) = start_server(IngestionGate::new(["hanako@example.com"]))?;

    let message = LettreMessage::builder()
        .from("jirou@example.com".parse::<Mailbox>()?)
        .to("tarou@example.com".parse::<Mailbox>()?)
        .subject("Blocked")
        .body("nope".to_owned())?;

    let mailer = SmtpTransport::builder_dangerous("127.0.0.1")
        .port(port)
        .build();

    let error = mailer.send(&message).unwrap_err();
    assert!(error.is_permanent());
    assert!(sink.store().is_empty());

    Ok(())
}
