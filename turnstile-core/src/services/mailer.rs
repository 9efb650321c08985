//! Notification adapter boundary.
//!
//! The tracker only needs one capability from the outside world: deliver a
//! plaintext passcode to an address. [`PasscodeMailer`] is that seam; the
//! `mailer` feature wires it to the lettre-backed transports in
//! `turnstile-mailer`.

use async_trait::async_trait;

use crate::Error;

/// Delivers one-time passcodes. The plaintext code exists only for the
/// duration of this call; implementations must not persist or log it.
#[async_trait]
pub trait PasscodeMailer: Send + Sync {
    async fn send_passcode(&self, to: &str, code: &str) -> Result<(), Error>;
}

#[cfg(feature = "mailer")]
pub use mailer_impl::PasscodeMailerService;

#[cfg(feature = "mailer")]
mod mailer_impl {
    use super::PasscodeMailer;
    use crate::{Error, error::MailError};
    use async_trait::async_trait;
    use turnstile_mailer::prelude::*;

    /// [`PasscodeMailer`] backed by a `turnstile-mailer` transport.
    pub struct PasscodeMailerService {
        transport: Box<dyn Mailer>,
        config: MailerConfig,
    }

    impl PasscodeMailerService {
        pub fn new(config: MailerConfig) -> Result<Self, Error> {
            let transport = config
                .build_transport()
                .map_err(|e| Error::Mail(MailError::Config(e.to_string())))?;
            Ok(Self { transport, config })
        }

        pub fn from_env() -> Result<Self, Error> {
            let config = MailerConfig::from_env()
                .map_err(|e| Error::Mail(MailError::Config(e.to_string())))?;
            Self::new(config)
        }
    }

    #[async_trait]
    impl PasscodeMailer for PasscodeMailerService {
        async fn send_passcode(&self, to: &str, code: &str) -> Result<(), Error> {
            let email = PasscodeEmail::build(
                &self.config.get_from_address(),
                to,
                code,
                &self.config.app_name,
            )
            .map_err(|e| Error::Mail(MailError::Send(e.to_string())))?;

            self.transport
                .send_email(email)
                .await
                .map_err(|e| Error::Mail(MailError::Send(e.to_string())))?;
            Ok(())
        }
    }
}
