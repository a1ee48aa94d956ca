//! Session tokens and caller-owned sessions.

use std::fmt;

use super::service_proxy::ServiceProxy;
use crate::error::AuctionResult;
use crate::models::Credentials;

/// Opaque token issued by login.
///
/// `Debug` is redacted so tokens do not leak into logs.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(***)")
    }
}

impl From<&str> for SessionToken {
    fn from(token: &str) -> Self {
        Self(token.to_string())
    }
}

/// A logged-in session bound to one proxy.
///
/// Created by [`Session::login`] and ended by [`Session::logout`], which
/// consumes it. The session lives exactly as long as the caller keeps it.
#[derive(Debug)]
pub struct Session<'a> {
    proxy: &'a ServiceProxy,
    token: SessionToken,
}

impl<'a> Session<'a> {
    /// Log in through `proxy` and keep the issued token.
    pub async fn login(proxy: &'a ServiceProxy, credentials: &Credentials) -> AuctionResult<Self> {
        let token = proxy.login(credentials).await?;
        Ok(Self { proxy, token })
    }

    /// Wrap a token obtained earlier, e.g. passed in by the user.
    pub fn resume(proxy: &'a ServiceProxy, token: SessionToken) -> Self {
        Self { proxy, token }
    }

    pub fn token(&self) -> &SessionToken {
        &self.token
    }

    pub fn proxy(&self) -> &'a ServiceProxy {
        self.proxy
    }

    /// Bid on an article with this session's token.
    pub async fn place_bid(&self, article_id: i64, amount: f64, currency: &str) -> AuctionResult<()> {
        self.proxy
            .place_bid(article_id, amount, currency, &self.token)
            .await
    }

    /// End the session on the server.
    ///
    /// The session is consumed whether or not the server accepts the logout.
    pub async fn logout(self) -> AuctionResult<()> {
        self.proxy.logout(&self.token).await
    }
}
