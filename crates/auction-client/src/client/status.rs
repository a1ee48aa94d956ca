//! Status-code tables.
//!
//! Each proxy operation owns one [`StatusTable`]. [`StatusTable::check`] is the
//! only place a response status is interpreted, so every operation answers
//! every code: the explicit rules first, then the table's fallback.

use reqwest::StatusCode;

use crate::error::AuctionError;

/// Which statuses a rule covers.
#[derive(Debug, Clone, Copy)]
pub enum StatusRule {
    /// One specific code.
    Exact(StatusCode),
    /// Any 5xx code.
    ServerError,
}

impl StatusRule {
    fn matches(self, status: StatusCode) -> bool {
        match self {
            StatusRule::Exact(code) => code == status,
            StatusRule::ServerError => status.is_server_error(),
        }
    }
}

/// Domain failure a status maps to. Turned into an [`AuctionError`] once the
/// concrete code is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    InvalidCredentials,
    LoginFailed,
    InvalidToken,
    LogoutFailed,
    NoCategories,
    EmptyCategory,
    UnsupportedCurrency,
    CategoryNotFound,
    ArticleNotFound,
    BidTooLow,
    Unauthenticated,
    ServerError,
    UnexpectedStatus,
}

impl Failure {
    /// Build the error for a response that came back with `status`.
    pub fn at(self, status: u16) -> AuctionError {
        match self {
            Failure::InvalidCredentials => AuctionError::InvalidCredentials,
            Failure::LoginFailed => AuctionError::LoginFailed(status),
            Failure::InvalidToken => AuctionError::InvalidToken,
            Failure::LogoutFailed => AuctionError::LogoutFailed(status),
            Failure::NoCategories => AuctionError::NoCategories,
            Failure::EmptyCategory => AuctionError::EmptyCategory,
            Failure::UnsupportedCurrency => AuctionError::UnsupportedCurrency,
            Failure::CategoryNotFound => AuctionError::CategoryNotFound,
            Failure::ArticleNotFound => AuctionError::ArticleNotFound,
            Failure::BidTooLow => AuctionError::BidTooLow,
            Failure::Unauthenticated => AuctionError::Unauthenticated,
            Failure::ServerError => AuctionError::ServerError(status),
            Failure::UnexpectedStatus => AuctionError::UnexpectedStatus(status),
        }
    }
}

/// Status contract of one endpoint.
#[derive(Debug)]
pub struct StatusTable {
    /// Operation name, used in logs.
    pub operation: &'static str,

    /// The single status that means success.
    pub success: StatusCode,

    /// Checked in order; first match wins.
    pub rules: &'static [(StatusRule, Failure)],

    /// Used when no rule matches.
    pub fallback: Failure,
}

impl StatusTable {
    /// `Ok(())` on the success status, the mapped domain error otherwise.
    pub fn check(&self, status: StatusCode) -> Result<(), AuctionError> {
        if status == self.success {
            return Ok(());
        }

        let failure = self
            .rules
            .iter()
            .find(|(rule, _)| rule.matches(status))
            .map(|(_, failure)| *failure)
            .unwrap_or(self.fallback);

        let error = failure.at(status.as_u16());
        tracing::warn!(
            operation = self.operation,
            status = status.as_u16(),
            error = %error,
            "Request rejected by auctions service"
        );
        Err(error)
    }
}

pub const LOGIN: StatusTable = StatusTable {
    operation: "login",
    success: StatusCode::OK,
    rules: &[(StatusRule::Exact(StatusCode::UNAUTHORIZED), Failure::InvalidCredentials)],
    fallback: Failure::LoginFailed,
};

pub const LOGOUT: StatusTable = StatusTable {
    operation: "logout",
    success: StatusCode::NO_CONTENT,
    rules: &[(StatusRule::Exact(StatusCode::UNAUTHORIZED), Failure::InvalidToken)],
    fallback: Failure::LogoutFailed,
};

pub const LIST_CATEGORIES: StatusTable = StatusTable {
    operation: "list_categories",
    success: StatusCode::OK,
    rules: &[
        (StatusRule::Exact(StatusCode::NO_CONTENT), Failure::NoCategories),
        (StatusRule::ServerError, Failure::ServerError),
    ],
    fallback: Failure::UnexpectedStatus,
};

pub const LIST_ARTICLES: StatusTable = StatusTable {
    operation: "list_articles_by_category",
    success: StatusCode::OK,
    rules: &[
        (StatusRule::Exact(StatusCode::NO_CONTENT), Failure::EmptyCategory),
        (StatusRule::Exact(StatusCode::BAD_REQUEST), Failure::UnsupportedCurrency),
        (StatusRule::Exact(StatusCode::NOT_FOUND), Failure::CategoryNotFound),
        (StatusRule::ServerError, Failure::ServerError),
    ],
    fallback: Failure::UnexpectedStatus,
};

pub const ARTICLE_DETAILS: StatusTable = StatusTable {
    operation: "get_article_details",
    success: StatusCode::OK,
    rules: &[
        (StatusRule::Exact(StatusCode::BAD_REQUEST), Failure::UnsupportedCurrency),
        (StatusRule::Exact(StatusCode::NOT_FOUND), Failure::ArticleNotFound),
        (StatusRule::ServerError, Failure::ServerError),
    ],
    fallback: Failure::UnexpectedStatus,
};

pub const PLACE_BID: StatusTable = StatusTable {
    operation: "place_bid",
    success: StatusCode::NO_CONTENT,
    rules: &[
        (StatusRule::Exact(StatusCode::BAD_REQUEST), Failure::UnsupportedCurrency),
        (StatusRule::Exact(StatusCode::UNAUTHORIZED), Failure::Unauthenticated),
        (StatusRule::Exact(StatusCode::NOT_FOUND), Failure::ArticleNotFound),
        (StatusRule::Exact(StatusCode::CONFLICT), Failure::BidTooLow),
        (StatusRule::ServerError, Failure::ServerError),
    ],
    fallback: Failure::UnexpectedStatus,
};
