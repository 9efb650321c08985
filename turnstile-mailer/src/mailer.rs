//! The delivery seam every transport implements.
//!
//! Callers hold a `Box<dyn Mailer>` built by
//! [`MailerConfig::build_transport`](crate::MailerConfig::build_transport),
//! so swapping SMTP for sendmail or the file sink is a configuration change,
//! not a code change.

use crate::{Email, MailerError};
use async_trait::async_trait;

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_email(&self, email: Email) -> Result<(), MailerError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct RecordingTransport {
        subjects: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Mailer for RecordingTransport {
        async fn send_email(&self, email: Email) -> Result<(), MailerError> {
            self.subjects.lock().unwrap().push(email.subject);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_trait_is_usable_as_a_boxed_object() {
        // The configured transport is always handed around as a trait
        // object; this pins the trait staying object-safe.
        let transport: Box<dyn Mailer> = Box::new(RecordingTransport {
            subjects: Mutex::new(Vec::new()),
        });

        let email = crate::PasscodeEmail::build(
            "noreply@club.example",
            "fan@club.example",
            "042719",
            "Hillside AFC",
        )
        .unwrap();
        transport.send_email(email).await.unwrap();
    }
}
