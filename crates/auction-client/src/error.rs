//! Error types for the auctions service proxy.

use thiserror::Error;

/// Failures below HTTP: the request never produced a status code.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// Connection could not be established.
    #[error("Connection failed: {0}")]
    Connect(String),

    /// Request or connect timeout elapsed.
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Any other I/O failure while sending or reading.
    #[error("I/O error: {0}")]
    Io(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TransportError::Timeout(e.to_string())
        } else if e.is_connect() {
            TransportError::Connect(e.to_string())
        } else {
            TransportError::Io(e.to_string())
        }
    }
}

/// Everything a proxy operation can fail with.
///
/// Status-mapped variants are per-operation: the same code maps to different
/// variants depending on the endpoint (401 is `InvalidCredentials` on login,
/// `InvalidToken` on logout, `Unauthenticated` on bids).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuctionError {
    /// The server could not be reached. Never retried.
    #[error("Network error: {0}")]
    Network(#[from] TransportError),

    /// Success status, but the body could not be decoded.
    #[error("Malformed response (status {status}): {message}")]
    MalformedResponse { status: u16, message: String },

    /// The configured base URL cannot be used to build request URLs.
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),

    /// The name cannot travel as a single path segment (empty, `.` or `..`).
    /// Rejected before any request is sent.
    #[error("Invalid category name: {0:?}")]
    InvalidCategoryName(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Login failed with status code {0}")]
    LoginFailed(u16),

    #[error("Invalid token, logout failed")]
    InvalidToken,

    #[error("Logout failed with status code {0}")]
    LogoutFailed(u16),

    #[error("No categories found")]
    NoCategories,

    #[error("Category has no articles")]
    EmptyCategory,

    #[error("Currency not supported")]
    UnsupportedCurrency,

    #[error("Category not found")]
    CategoryNotFound,

    #[error("Article not found")]
    ArticleNotFound,

    #[error("Bid amount must be greater than the current price")]
    BidTooLow,

    #[error("User not authenticated")]
    Unauthenticated,

    #[error("Server error (status {0})")]
    ServerError(u16),

    #[error("Unexpected status code {0}")]
    UnexpectedStatus(u16),
}

impl AuctionError {
    /// HTTP status code behind a status-mapped error.
    ///
    /// `MalformedResponse` reports the success status it arrived with.
    /// Transport and configuration errors have no status.
    pub fn status(&self) -> Option<u16> {
        match self {
            AuctionError::Network(_)
            | AuctionError::InvalidBaseUrl(_)
            | AuctionError::InvalidCategoryName(_) => None,
            AuctionError::MalformedResponse { status, .. } => Some(*status),
            AuctionError::UnsupportedCurrency => Some(400),
            AuctionError::InvalidCredentials
            | AuctionError::InvalidToken
            | AuctionError::Unauthenticated => Some(401),
            AuctionError::CategoryNotFound | AuctionError::ArticleNotFound => Some(404),
            AuctionError::BidTooLow => Some(409),
            AuctionError::NoCategories | AuctionError::EmptyCategory => Some(204),
            AuctionError::LoginFailed(code)
            | AuctionError::LogoutFailed(code)
            | AuctionError::ServerError(code)
            | AuctionError::UnexpectedStatus(code) => Some(*code),
        }
    }

    /// True when the request never got an HTTP answer.
    pub fn is_network(&self) -> bool {
        matches!(self, AuctionError::Network(_))
    }
}

/// Result type alias using AuctionError.
pub type AuctionResult<T> = Result<T, AuctionError>;
