//! The one message this crate exists to send.

use crate::{Email, MailerError};

/// Builder for the passcode email. Plain text with a minimal HTML
/// alternative; the code is the entire payload, so there is nothing to
/// template.
pub struct PasscodeEmail;

impl PasscodeEmail {
    pub fn build(from: &str, to: &str, code: &str, app_name: &str) -> Result<Email, MailerError> {
        let text = format!(
            "Your {app_name} verification code is: {code}\n\n\
             The code expires in 10 minutes. If you did not try to sign in, \
             you can ignore this email."
        );
        let html = format!(
            "<p>Your {app_name} verification code is:</p>\
             <p style=\"font-size:1.5em;letter-spacing:0.2em\"><strong>{code}</strong></p>\
             <p>The code expires in 10 minutes. If you did not try to sign in, \
             you can ignore this email.</p>"
        );

        Email::builder()
            .from(from)
            .to(to)
            .subject(format!("{app_name} verification code"))
            .text_body(text)
            .html_body(html)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_passcode_email_contains_code() {
        let email = PasscodeEmail::build(
            "noreply@club.example",
            "fan@club.example",
            "042719",
            "Hillside AFC",
        )
        .unwrap();

        assert!(email.text_body.as_ref().unwrap().contains("042719"));
        assert!(email.html_body.as_ref().unwrap().contains("042719"));
        assert_eq!(email.subject, "Hillside AFC verification code");
    }
}
