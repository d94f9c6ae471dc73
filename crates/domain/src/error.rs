/// Shared error type used across all cordkit crates.
///
/// REST failures deliberately carry only the operation name; the transport
/// cause is logged where it happens and never handed to the caller.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("login failed")]
    LoginFailed,

    #[error("gateway unavailable: could not resolve a connect URL")]
    GatewayUnavailable,

    #[error("gateway URL has not been resolved")]
    ConnectionNotReady,

    #[error("request failed: {operation}")]
    RequestFailed { operation: &'static str },

    #[error("gateway: {0}")]
    Gateway(String),

    #[error("config: {0}")]
    Config(String),
}

impl Error {
    /// Shorthand for [`Error::RequestFailed`].
    pub fn request_failed(operation: &'static str) -> Self {
        Error::RequestFailed { operation }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
