use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Mail error: {0}")]
    Mail(#[from] MailError),
}

#[derive(Debug, Error)]
pub enum AuthError {
    /// A passcode was requested before the resend cooldown elapsed.
    #[error("Passcode requested too recently")]
    RateLimited,

    /// No login-attempt record exists for the address.
    #[error("No passcode request on file")]
    OtpNotFound,

    /// No passcode is outstanding, or the outstanding one is past its deadline.
    #[error("Passcode expired")]
    OtpExpired,

    /// The supplied passcode does not match the outstanding one.
    #[error("Invalid passcode")]
    InvalidCode,

    #[error("User not found")]
    UserNotFound,

    #[error("Permission denied")]
    PermissionDenied,

    /// The one-time super-admin bootstrap has already been claimed.
    #[error("A super admin already exists")]
    BootstrapClosed,
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Record not found")]
    NotFound,
}

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid email format: {0}")]
    InvalidEmail(String),

    #[error("Unknown role: {0}")]
    UnknownRole(String),
}

#[derive(Debug, Error)]
pub enum MailError {
    #[error("Failed to send email: {0}")]
    Send(String),

    #[error("Mailer configuration error: {0}")]
    Config(String),
}

impl Error {
    /// True for the cooldown rejection, which maps to a 429 at the boundary.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Error::Auth(AuthError::RateLimited))
    }

    pub fn is_validation_error(&self) -> bool {
        matches!(self, Error::Validation(_))
    }

    /// True when a backing service (document store or mail relay) could not
    /// be reached. The access guard treats these as a signal to fall back to
    /// the allow-list rather than failing the request.
    pub fn is_dependency_error(&self) -> bool {
        matches!(self, Error::Storage(_) | Error::Mail(_))
    }
}
