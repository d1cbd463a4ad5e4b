//! Human-readable HTML view of captured messages

use std::sync::Arc;

use crate::mail::{Mailbox, Message};

/// Render a full HTML page listing `messages` in the given order
pub fn emails_page(title: &str, messages: &[Arc<Message>]) -> String {
    let mut html = String::with_capacity(1024 + messages.len() * 512);

    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>{}</title>\n", escape(title)));
    html.push_str(STYLE);
    html.push_str("</head>\n<body>\n");
    html.push_str(&format!("<h1>{}</h1>\n", escape(title)));

    if messages.is_empty() {
        html.push_str("<p class=\"empty\">No e-mails</p>\n");
    }

    for message in messages {
        render_message(&mut html, message);
    }

    html.push_str("</body>\n</html>\n");
    html
}

fn render_message(html: &mut String, message: &Message) {
    html.push_str("<article class=\"email\">\n<dl>\n");
    html.push_str(&format!(
        "<dt>Date</dt><dd>{}</dd>\n",
        message.date.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    html.push_str(&format!("<dt>From</dt><dd>{}</dd>\n", mailbox_list(&message.from)));
    html.push_str(&format!("<dt>To</dt><dd>{}</dd>\n", mailbox_list(&message.to)));
    if !message.cc.is_empty() {
        html.push_str(&format!("<dt>Cc</dt><dd>{}</dd>\n", mailbox_list(&message.cc)));
    }
    html.push_str(&format!(
        "<dt>Subject</dt><dd>{}</dd>\n",
        escape(message.subject.as_deref().unwrap_or("(no subject)"))
    ));
    html.push_str("</dl>\n");

    if let Some(text) = message.text.as_deref() {
        html.push_str(&format!("<pre>{}</pre>\n", escape(text)));
    }

    html.push_str("</article>\n");
}

fn mailbox_list(mailboxes: &[Mailbox]) -> String {
    mailboxes
        .iter()
        .map(|mailbox| match mailbox.name.as_deref() {
            Some(name) => format!("{} &lt;{}&gt;", escape(name), escape(&mailbox.address)),
            None => escape(&mailbox.address),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Escape text for inclusion in HTML element content or attributes
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

const STYLE: &str = "<style>
body { font-family: sans-serif; margin: 2em; }
.email { border: 1px solid #ccc; border-radius: 4px; margin-bottom: 1em; padding: 0.5em 1em; }
dl { display: grid; grid-template-columns: max-content auto; gap: 0.2em 1em; }
dt { font-weight: bold; }
dd { margin: 0; }
pre { white-space: pre-wrap; background: #f6f6f6; padding: 0.5em; }
.empty { color: #666; }
</style>
";

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn message() -> Arc<Message> {
        Arc::new(
            Message::new(
                vec![Mailbox::named("Ann <Admin>", "ann@example.com")],
                vec![Mailbox::new("bob@example.com")],
                Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap(),
            )
            .with_subject("Tom & Jerry")
            .with_text("<script>alert(1)</script>"),
        )
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("a<b>&\"'"), "a&lt;b&gt;&amp;&quot;&#39;");
        assert_eq!(escape("plain"), "plain");
    }

    #[test]
    fn test_empty_page() {
        let page = emails_page("E-mails", &[]);

        assert!(page.contains("<h1>E-mails</h1>"));
        assert!(page.contains("No e-mails"));
    }

    #[test]
    fn test_message_fields_escaped() {
        let page = emails_page("E-mails", &[message()]);

        assert!(page.contains("Tom &amp; Jerry"));
        assert!(page.contains("Ann &lt;Admin&gt; &lt;ann@example.com&gt;"));
        assert!(page.contains("bob@example.com"));
        assert!(page.contains("2024-05-10 12:00:00 UTC"));
        assert!(page.contains("&lt;script&gt;"));
        assert!(!page.contains("<script>"));
        assert!(!page.contains("No e-mails"));
    }

    #[test]
    fn test_cc_and_missing_subject() {
        let mut message = Message::new(
            vec![Mailbox::new("a@example.com")],
            vec![Mailbox::new("b@example.com")],
            Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap(),
        );
        message.cc = vec![Mailbox::new("c@example.com")];

        let page = emails_page("E-mails", &[Arc::new(message)]);

        assert!(page.contains("<dt>Cc</dt><dd>c@example.com</dd>\n"));
        assert!(page.contains("<dt>Subject</dt><dd>(no subject)</dd>\n"));
        assert!(!page.contains("<pre>"));
    }

    #[test]
    fn test_order_preserved() {
        let first = Arc::new(Message::new(vec![], vec![], Utc::now()).with_subject("first"));
        let second = Arc::new(Message::new(vec![], vec![], Utc::now()).with_subject("second"));

        let page = emails_page("E-mails", &[first, second]);

        let a = page.find("first").unwrap();
        let b = page.find("second").unwrap();
        assert!(a < b);
    }
}
