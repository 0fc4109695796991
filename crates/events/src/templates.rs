//! HTML bodies for operator mail.
//!
//! Payload fields are plain text. Every interpolated value goes through
//! [`escape_html`] exactly once; subjects are left unescaped.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use convex_core::inquiry::phone_digits;
use convex_core::types::ist;

use crate::mail::{ErrorMail, InquiryMail, MailPayload};

/// A message ready to hand to the SMTP transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMail {
    pub subject: String,
    pub html: String,
}

/// Render the subject and HTML body for `payload`.
pub fn render(payload: &MailPayload) -> RenderedMail {
    match payload {
        MailPayload::Inquiry(inquiry) => RenderedMail {
            subject: format!("New Solar Inquiry from {}", inquiry.name),
            html: inquiry_html(inquiry),
        },
        MailPayload::Error(error) => RenderedMail {
            subject: format!("[{}] {}", error.severity.as_str().to_uppercase(), error.title),
            html: error_html(error),
        },
    }
}

/// Escape the five HTML-significant characters.
pub fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Format a timestamp the way Indian locales print it, e.g.
/// `18/10/2026, 3:30:00 pm IST`.
pub fn format_ist(at: DateTime<Utc>) -> String {
    format!("{} IST", at.with_timezone(&ist()).format("%-d/%-m/%Y, %-I:%M:%S %P"))
}

fn detail_row(html: &mut String, label: &str, value: &str) {
    let _ = write!(
        html,
        r#"<tr><td class="label">{label}</td><td class="value">{}</td></tr>"#,
        escape_html(value)
    );
}

const INQUIRY_STYLE: &str = "body { font-family: Arial, sans-serif; line-height: 1.6; color: #333; }
.container { max-width: 600px; margin: 0 auto; padding: 20px; }
.header { background: #f97316; color: white; padding: 20px; border-radius: 8px 8px 0 0; }
.content { background: #f9fafb; padding: 20px; border: 1px solid #e5e7eb; }
.footer { background: #1f2937; color: #9ca3af; padding: 15px; text-align: center; border-radius: 0 0 8px 8px; font-size: 12px; }
table { width: 100%; border-collapse: collapse; }
td { padding: 10px; border-bottom: 1px solid #e5e7eb; }
.label { font-weight: bold; color: #6b7280; width: 120px; }
.message-box { background: white; padding: 15px; border-radius: 8px; border-left: 4px solid #f97316; margin-top: 15px; }
.btn { display: inline-block; padding: 10px 20px; background: #f97316; color: white; text-decoration: none; border-radius: 6px; margin: 5px; }";

fn inquiry_html(inquiry: &InquiryMail) -> String {
    let mut html = String::with_capacity(4096);
    let _ = write!(
        html,
        "<!DOCTYPE html><html><head><style>{INQUIRY_STYLE}</style></head><body>\
         <div class=\"container\"><div class=\"header\">\
         <h1 style=\"margin:0;\">New Lead Alert!</h1>\
         <p style=\"margin:5px 0 0 0;\">You have received a new inquiry from your website.</p>\
         </div><div class=\"content\">\
         <h2 style=\"color:#f97316;margin-top:0;\">Customer Details</h2><table>"
    );
    detail_row(&mut html, "Name", &inquiry.name);
    let phone = escape_html(&inquiry.phone);
    let _ = write!(
        html,
        r#"<tr><td class="label">Phone</td><td class="value"><a href="tel:{phone}">{phone}</a></td></tr>"#
    );
    detail_row(&mut html, "Email", inquiry.email.as_deref().unwrap_or("Not provided"));
    detail_row(&mut html, "City", &inquiry.location);
    if let Some(address) = &inquiry.address {
        detail_row(&mut html, "Address", address);
    }
    html.push_str("</table><h2 style=\"color:#f97316;\">Energy Requirements</h2><table>");
    detail_row(
        &mut html,
        "System Size",
        inquiry.energy_needs.as_deref().unwrap_or("Not specified"),
    );
    html.push_str("</table>");

    if let Some(message) = &inquiry.message {
        let _ = write!(
            html,
            "<h2 style=\"color:#f97316;\">Customer Message</h2>\
             <div class=\"message-box\">&quot;{}&quot;</div>",
            escape_html(message)
        );
    }

    let _ = write!(
        html,
        "<div style=\"margin-top:20px;text-align:center;\">\
         <a href=\"tel:{phone}\" class=\"btn\">Call Customer</a>\
         <a href=\"https://wa.me/{}\" class=\"btn\" style=\"background:#25D366;\">WhatsApp</a>\
         </div></div><div class=\"footer\">\
         This is an automated notification from Convex Solar website.<br>\
         Received at: {}</div></div></body></html>",
        phone_digits(&inquiry.phone),
        format_ist(inquiry.received_at),
    );
    html
}

fn error_html(error: &ErrorMail) -> String {
    let severity = error.severity.as_str().to_uppercase();
    let mut html = String::with_capacity(4096);
    let _ = write!(
        html,
        "<!DOCTYPE html><html><head><style>\
         body {{ font-family: monospace; line-height: 1.6; color: #333; background: #1f2937; }}\
         .container {{ max-width: 600px; margin: 0 auto; padding: 20px; }}\
         .header {{ background: {color}; color: white; padding: 20px; border-radius: 8px 8px 0 0; }}\
         .content {{ background: #111827; padding: 20px; color: #e5e7eb; }}\
         .footer {{ background: #374151; color: #9ca3af; padding: 15px; text-align: center; border-radius: 0 0 8px 8px; font-size: 12px; }}\
         .label {{ color: #9ca3af; }}\
         .value {{ color: #f3f4f6; }}\
         .stack {{ background: #0f172a; padding: 15px; border-radius: 4px; font-size: 11px; color: #94a3b8; white-space: pre-wrap; }}\
         </style></head><body><div class=\"container\"><div class=\"header\">\
         <h1 style=\"margin:0;\">ERROR ALERT</h1>\
         <p style=\"margin:5px 0 0 0;\">Severity: <strong>{severity}</strong></p>\
         </div><div class=\"content\">",
        color = error.severity.color(),
    );

    let mut field = |label: &str, value: &str| {
        let _ = write!(
            html,
            r#"<p><span class="label">{label}:</span> <span class="value">{}</span></p>"#,
            escape_html(value)
        );
    };
    field("Title", &error.title);
    field("Message", &error.message);
    if let Some(code) = &error.error_code {
        field("Error Code", code);
    }
    field("Timestamp", &format_ist(error.timestamp));
    if let Some(url) = &error.url {
        field("URL", url);
    }
    if let Some(context) = &error.context {
        let pretty = serde_json::to_string_pretty(context).unwrap_or_default();
        field("Context", &pretty);
    }

    if let Some(stack) = &error.stack {
        let _ = write!(
            html,
            "<p style=\"margin-top:20px;\"><span class=\"label\">Stack Trace:</span></p>\
             <div class=\"stack\">{}</div>",
            escape_html(stack)
        );
    }

    html.push_str(
        "</div><div class=\"footer\">Automated error alert from Convex Solar website.<br>\
         Please investigate if severity is HIGH or CRITICAL.</div></div></body></html>",
    );
    html
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use convex_core::alert::Severity;
    use convex_core::sanitize::sanitize_text;

    use super::*;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 18, 10, 0, 0).unwrap()
    }

    fn inquiry() -> InquiryMail {
        InquiryMail {
            name: "Ravi <Admin>".into(),
            email: None,
            phone: "+91 9876543210".into(),
            location: "Ahmednagar".into(),
            address: Some("Savedi Road".into()),
            energy_needs: None,
            message: Some("Call \"after\" 6".into()),
            received_at: at(),
        }
    }

    fn alert(severity: Severity) -> ErrorMail {
        ErrorMail {
            severity,
            title: "Database Error: Add inquiry".into(),
            message: "relation <inquiries> does not exist".into(),
            error_code: Some("42P01".into()),
            stack: None,
            url: None,
            context: Some(serde_json::json!({"id": 4})),
            timestamp: at(),
        }
    }

    #[test]
    fn ist_formatting() {
        assert_eq!(format_ist(at()), "18/10/2026, 3:30:00 pm IST");
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(escape_html(r#"<a href="x">'&'</a>"#), "&lt;a href=&quot;x&quot;&gt;&#x27;&amp;&#x27;&lt;/a&gt;");
    }

    #[test]
    fn inquiry_mail_content() {
        let mail = render(&MailPayload::Inquiry(inquiry()));
        assert_eq!(mail.subject, "New Solar Inquiry from Ravi <Admin>");
        assert!(mail.html.contains("Ravi &lt;Admin&gt;"));
        assert!(!mail.html.contains("<Admin>"));
        assert!(mail.html.contains("https://wa.me/919876543210"));
        assert!(mail.html.contains("Not provided"));
        assert!(mail.html.contains("Not specified"));
        assert!(mail.html.contains("Savedi Road"));
        assert!(mail.html.contains("&quot;after&quot;"));
        assert!(mail.html.contains("18/10/2026, 3:30:00 pm IST"));
    }

    #[test]
    fn stored_text_is_escaped_once() {
        let stored = InquiryMail {
            name: sanitize_text("Sharma & Sons"),
            address: Some(sanitize_text("D'Souza Colony")),
            message: Some(sanitize_text("Roof is <10m> wide")),
            ..inquiry()
        };
        assert_eq!(stored.name, "Sharma &amp; Sons");

        let mail = render(&MailPayload::Inquiry(stored.unescaped()));
        assert_eq!(mail.subject, "New Solar Inquiry from Sharma & Sons");
        assert!(mail.html.contains(">Sharma &amp; Sons<"));
        assert!(mail.html.contains("D&#x27;Souza Colony"));
        assert!(!mail.html.contains("&amp;amp;"));
        assert!(!mail.html.contains("&amp;#x27;"));
    }

    #[test]
    fn address_row_is_optional() {
        let mut inquiry = inquiry();
        inquiry.address = None;
        let mail = render(&MailPayload::Inquiry(inquiry));
        assert!(!mail.html.contains(">Address<"));
    }

    #[test]
    fn error_mail_uses_severity_colour() {
        let mail = render(&MailPayload::Error(alert(Severity::Critical)));
        assert_eq!(mail.subject, "[CRITICAL] Database Error: Add inquiry");
        assert!(mail.html.contains("#dc2626"));
        assert!(mail.html.contains("&lt;inquiries&gt;"));
        assert!(mail.html.contains("42P01"));
        assert!(!mail.html.contains("Stack Trace"));

        let mail = render(&MailPayload::Error(alert(Severity::High)));
        assert!(mail.html.contains("#ef4444"));
    }
}
