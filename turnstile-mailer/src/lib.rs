pub mod config;
pub mod email;
pub mod error;
pub mod mailer;
pub mod passcode;
pub mod transports;

pub use config::{MailerConfig, TransportConfig};
pub use email::{Email, EmailBuilder};
pub use error::MailerError;
pub use mailer::Mailer;
pub use passcode::PasscodeEmail;
pub use transports::{FileTransport, SendmailTransport, SmtpTransport};

pub mod prelude {
    pub use crate::{
        Email, EmailBuilder, FileTransport, Mailer, MailerConfig, MailerError, PasscodeEmail,
        SendmailTransport, SmtpTransport, TransportConfig,
    };
}
