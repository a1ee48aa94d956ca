//! Auctions service proxy.

use reqwest::Method;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use url::Url;

use super::session::SessionToken;
use super::status::{self, StatusTable};
use crate::config::ClientConfig;
use crate::error::{AuctionError, AuctionResult};
use crate::models::{Article, Category, Credentials};
use crate::transport::{
    ReqwestTransport, Transport, TransportRequest, TransportResponse, CONTENT_TYPE_JSON,
    CONTENT_TYPE_TEXT,
};

/// Typed client for the auctions service.
///
/// Holds only the base URL and a shared transport, so clones are cheap and can
/// be used from any task. The proxy never stores session tokens; token-gated
/// operations take one as an argument.
#[derive(Clone)]
pub struct ServiceProxy {
    base_url: Url,
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for ServiceProxy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceProxy")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl ServiceProxy {
    /// Create a proxy using the reqwest transport configured from `config`.
    pub fn new(config: &ClientConfig) -> AuctionResult<Self> {
        let transport = ReqwestTransport::new(config.timeout(), config.connect_timeout());
        Self::with_transport(&config.base_url, Arc::new(transport))
    }

    /// Create a proxy over any transport.
    pub fn with_transport(base_url: &str, transport: Arc<dyn Transport>) -> AuctionResult<Self> {
        let parsed = Url::parse(base_url.trim_end_matches('/'))
            .map_err(|e| AuctionError::InvalidBaseUrl(format!("{}: {}", base_url, e)))?;

        if parsed.cannot_be_a_base() || !matches!(parsed.scheme(), "http" | "https") {
            return Err(AuctionError::InvalidBaseUrl(format!(
                "{}: expected an http(s) URL",
                base_url
            )));
        }

        Ok(Self {
            base_url: parsed,
            transport,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Log in and return the session token issued by the server.
    ///
    /// `POST /auth/login` with the credentials as JSON.
    pub async fn login(&self, credentials: &Credentials) -> AuctionResult<SessionToken> {
        let body = serde_json::json!({
            "email": credentials.email,
            "password": credentials.password,
        });

        let request = TransportRequest {
            method: Method::POST,
            url: self.endpoint(["auth", "login"]),
            content_type: Some(CONTENT_TYPE_JSON),
            body: Some(body.to_string()),
        };

        let response = self.execute(&status::LOGIN, request).await?;
        if response.body.is_empty() {
            return Err(AuctionError::MalformedResponse {
                status: response.status.as_u16(),
                message: "login response carried no token".to_string(),
            });
        }

        tracing::info!(email = %credentials.email, "Logged in");
        Ok(SessionToken::new(response.body))
    }

    /// Invalidate a session token.
    ///
    /// `POST /auth/logout` with the raw token as body.
    pub async fn logout(&self, token: &SessionToken) -> AuctionResult<()> {
        let request = TransportRequest {
            method: Method::POST,
            url: self.endpoint(["auth", "logout"]),
            content_type: Some(CONTENT_TYPE_TEXT),
            body: Some(token.as_str().to_string()),
        };

        self.execute(&status::LOGOUT, request).await?;
        tracing::info!("Logged out");
        Ok(())
    }

    /// `GET /auctions/categories`.
    ///
    /// A 204 is reported as [`AuctionError::NoCategories`] rather than an empty list.
    pub async fn list_categories(&self) -> AuctionResult<Vec<Category>> {
        let request = Self::get(self.endpoint(["auctions", "categories"]));
        let response = self.execute(&status::LIST_CATEGORIES, request).await?;
        decode(&response)
    }

    /// `GET /auctions/categories/{name}/articles?currency={currency}`.
    ///
    /// The category name is sent as one percent-encoded path segment, so
    /// spaces, slashes and non-ASCII characters survive intact. Empty, `.` and
    /// `..` names are rejected with [`AuctionError::InvalidCategoryName`]: URL
    /// normalisation (which also folds `%2E`) would drop them from the path and
    /// address a different resource.
    pub async fn list_articles_by_category(
        &self,
        category_name: &str,
        currency: &str,
    ) -> AuctionResult<Vec<Article>> {
        if matches!(category_name, "" | "." | "..") {
            return Err(AuctionError::InvalidCategoryName(category_name.to_string()));
        }

        let mut url = self.endpoint(["auctions", "categories", category_name, "articles"]);
        url.query_pairs_mut().append_pair("currency", currency);

        let response = self.execute(&status::LIST_ARTICLES, Self::get(url)).await?;
        decode(&response)
    }

    /// `GET /auctions/articles/{id}/details?currency={currency}`.
    pub async fn get_article_details(&self, article_id: i64, currency: &str) -> AuctionResult<Article> {
        let id = article_id.to_string();
        let mut url = self.endpoint(["auctions", "articles", id.as_str(), "details"]);
        url.query_pairs_mut().append_pair("currency", currency);

        let response = self.execute(&status::ARTICLE_DETAILS, Self::get(url)).await?;
        decode(&response)
    }

    /// Place a bid of `amount` in `currency`.
    ///
    /// `POST /auctions/articles/{id}/bid?amount={amount}&currency={currency}`
    /// with the raw token as body. Not idempotent: calling twice bids twice.
    pub async fn place_bid(
        &self,
        article_id: i64,
        amount: f64,
        currency: &str,
        token: &SessionToken,
    ) -> AuctionResult<()> {
        let id = article_id.to_string();
        let mut url = self.endpoint(["auctions", "articles", id.as_str(), "bid"]);
        url.query_pairs_mut()
            .append_pair("amount", &amount.to_string())
            .append_pair("currency", currency);

        let request = TransportRequest {
            method: Method::POST,
            url,
            content_type: Some(CONTENT_TYPE_TEXT),
            body: Some(token.as_str().to_string()),
        };

        self.execute(&status::PLACE_BID, request).await?;
        tracing::info!(article_id, amount, currency, "Bid placed");
        Ok(())
    }

    /// Base URL with `segments` appended, each percent-encoded on its own.
    fn endpoint<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> Url {
        let mut url = self.base_url.clone();
        // Cannot fail: with_transport rejects cannot-be-a-base URLs.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn get(url: Url) -> TransportRequest {
        TransportRequest {
            method: Method::GET,
            url,
            content_type: None,
            body: None,
        }
    }

    /// Send once and run the response status through `table`.
    async fn execute(
        &self,
        table: &StatusTable,
        request: TransportRequest,
    ) -> AuctionResult<TransportResponse> {
        tracing::debug!(
            operation = table.operation,
            method = %request.method,
            url = %request.url,
            "Sending request"
        );

        let response = self.transport.send(request).await.map_err(|e| {
            tracing::error!(operation = table.operation, error = %e, "Request failed");
            AuctionError::Network(e)
        })?;

        table.check(response.status)?;
        Ok(response)
    }
}

fn decode<T: DeserializeOwned>(response: &TransportResponse) -> AuctionResult<T> {
    serde_json::from_str(&response.body).map_err(|e| AuctionError::MalformedResponse {
        status: response.status.as_u16(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;
    use crate::transport::mock::MockTransport;

    const BASE: &str = "http://auctions.test:8081";

    fn proxy(transport: &Arc<MockTransport>) -> ServiceProxy {
        ServiceProxy::with_transport(BASE, transport.clone()).unwrap()
    }

    fn token() -> SessionToken {
        SessionToken::new("tok-123")
    }

    fn article_json(id: i64) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "title": "Vintage camera",
            "initialPrice": 100.0,
            "currentPrice": 119.0,
            "bids": 2,
            "auctionEnd": "2026-12-24T18:30:00Z",
            "categoryName": "Electronics",
            "ownerName": "Natasha Romanoff",
            "currency": "EUR"
        })
    }

    #[tokio::test]
    async fn test_login_returns_token() {
        let transport = Arc::new(MockTransport::new().respond(200, "tok-123"));
        let credentials = Credentials::new("blackwidow@marvel.com", "Bl@ckWid0w2023");

        let token = proxy(&transport).login(&credentials).await.unwrap();
        assert_eq!(token.as_str(), "tok-123");

        let request = transport.last_request();
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.url.as_str(), "http://auctions.test:8081/auth/login");
        assert_eq!(request.content_type, Some(CONTENT_TYPE_JSON));
        let body: serde_json::Value = serde_json::from_str(request.body.as_deref().unwrap()).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"email": "blackwidow@marvel.com", "password": "Bl@ckWid0w2023"})
        );
    }

    #[tokio::test]
    async fn test_login_failures() {
        let transport = Arc::new(
            MockTransport::new()
                .respond(401, "")
                .respond(403, "")
                .respond(200, ""),
        );
        let proxy = proxy(&transport);
        let credentials = Credentials::new("a@b.c", "wrong");

        assert_eq!(
            proxy.login(&credentials).await,
            Err(AuctionError::InvalidCredentials)
        );
        assert_eq!(proxy.login(&credentials).await, Err(AuctionError::LoginFailed(403)));
        assert!(matches!(
            proxy.login(&credentials).await,
            Err(AuctionError::MalformedResponse { status: 200, .. })
        ));
    }

    #[tokio::test]
    async fn test_login_keeps_token_verbatim() {
        let transport = Arc::new(MockTransport::new().respond(200, " tok-123\n"));
        let credentials = Credentials::new("a@b.c", "secret");

        let token = proxy(&transport).login(&credentials).await.unwrap();
        assert_eq!(token.as_str(), " tok-123\n");
    }

    #[tokio::test]
    async fn test_logout_sends_token_as_body() {
        let transport = Arc::new(MockTransport::new().respond(204, "").respond(401, ""));
        let proxy = proxy(&transport);

        proxy.logout(&token()).await.unwrap();
        let request = transport.last_request();
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.url.path(), "/auth/logout");
        assert_eq!(request.content_type, Some(CONTENT_TYPE_TEXT));
        assert_eq!(request.body.as_deref(), Some("tok-123"));

        assert_eq!(proxy.logout(&token()).await, Err(AuctionError::InvalidToken));
    }

    #[tokio::test]
    async fn test_list_categories() {
        let transport = Arc::new(
            MockTransport::new().respond(200, r#"[{"name":"Electronics"},{"name":"Home & Garden"}]"#),
        );

        let categories = proxy(&transport).list_categories().await.unwrap();
        assert_eq!(
            categories,
            vec![
                Category { name: "Electronics".to_string() },
                Category { name: "Home & Garden".to_string() },
            ]
        );

        let request = transport.last_request();
        assert_eq!(request.method, Method::GET);
        assert_eq!(request.url.as_str(), "http://auctions.test:8081/auctions/categories");
        assert!(request.body.is_none());
    }

    #[tokio::test]
    async fn test_list_categories_no_content_is_an_error() {
        // A body that would not decode proves no decoding is attempted on 204.
        let transport = Arc::new(MockTransport::new().respond(204, "not json"));
        assert_eq!(
            proxy(&transport).list_categories().await,
            Err(AuctionError::NoCategories)
        );
    }

    #[tokio::test]
    async fn test_list_articles_encodes_category_segment() {
        let body = serde_json::json!([article_json(1), article_json(2)]).to_string();
        let transport = Arc::new(MockTransport::new().respond(200, &body));

        let articles = proxy(&transport)
            .list_articles_by_category("Electronics / Sale", "EUR")
            .await
            .unwrap();
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[1].id, 2);

        let request = transport.last_request();
        assert_eq!(
            request.url.path(),
            "/auctions/categories/Electronics%20%2F%20Sale/articles"
        );
        assert_eq!(request.url.query(), Some("currency=EUR"));
    }

    #[tokio::test]
    async fn test_list_articles_encodes_non_ascii() {
        let transport = Arc::new(MockTransport::new().respond(200, "[]"));

        let articles = proxy(&transport)
            .list_articles_by_category("Música", "USD")
            .await
            .unwrap();
        assert!(articles.is_empty());
        assert_eq!(
            transport.last_request().url.path(),
            "/auctions/categories/M%C3%BAsica/articles"
        );
    }

    #[tokio::test]
    async fn test_list_articles_rejects_dot_and_empty_names() {
        let transport = Arc::new(MockTransport::new());
        let proxy = proxy(&transport);

        for name in [".", "..", ""] {
            assert_eq!(
                proxy.list_articles_by_category(name, "EUR").await,
                Err(AuctionError::InvalidCategoryName(name.to_string()))
            );
        }
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_list_articles_keeps_dotted_names_as_one_segment() {
        let transport = Arc::new(MockTransport::new().respond(200, "[]").respond(200, "[]"));
        let proxy = proxy(&transport);

        proxy.list_articles_by_category("...", "EUR").await.unwrap();
        assert_eq!(
            transport.last_request().url.path(),
            "/auctions/categories/.../articles"
        );

        proxy.list_articles_by_category("%2E%2E", "EUR").await.unwrap();
        assert_eq!(
            transport.last_request().url.path(),
            "/auctions/categories/%252E%252E/articles"
        );
    }

    #[tokio::test]
    async fn test_list_articles_failures() {
        let transport = Arc::new(
            MockTransport::new()
                .respond(204, "")
                .respond(400, "")
                .respond(404, "")
                .respond(500, "")
                .respond(418, ""),
        );
        let proxy = proxy(&transport);

        let mut results = Vec::new();
        for _ in 0..5 {
            results.push(proxy.list_articles_by_category("Electronics", "EUR").await);
        }
        assert_eq!(
            results,
            vec![
                Err(AuctionError::EmptyCategory),
                Err(AuctionError::UnsupportedCurrency),
                Err(AuctionError::CategoryNotFound),
                Err(AuctionError::ServerError(500)),
                Err(AuctionError::UnexpectedStatus(418)),
            ]
        );
    }

    #[tokio::test]
    async fn test_get_article_details() {
        let transport = Arc::new(MockTransport::new().respond(200, &article_json(5).to_string()));

        let article = proxy(&transport).get_article_details(5, "EUR").await.unwrap();
        assert_eq!(article.id, 5);
        assert_eq!(article.current_price, 119.0);
        assert_eq!(article.currency, "EUR");

        let request = transport.last_request();
        assert_eq!(
            request.url.as_str(),
            "http://auctions.test:8081/auctions/articles/5/details?currency=EUR"
        );
    }

    #[tokio::test]
    async fn test_get_article_details_failures() {
        let transport = Arc::new(
            MockTransport::new()
                .respond(404, "")
                .respond(400, "")
                .respond(500, ""),
        );
        let proxy = proxy(&transport);

        assert_eq!(
            proxy.get_article_details(999, "EUR").await,
            Err(AuctionError::ArticleNotFound)
        );
        assert_eq!(
            proxy.get_article_details(5, "XXX").await,
            Err(AuctionError::UnsupportedCurrency)
        );
        assert_eq!(transport.last_request().url.query(), Some("currency=XXX"));
        assert_eq!(
            proxy.get_article_details(5, "EUR").await,
            Err(AuctionError::ServerError(500))
        );
    }

    #[tokio::test]
    async fn test_malformed_success_body() {
        let transport = Arc::new(
            MockTransport::new()
                .respond(200, r#"{"id": "not a number"}"#)
                .respond(200, "<html>oops</html>"),
        );
        let proxy = proxy(&transport);

        assert!(matches!(
            proxy.get_article_details(5, "EUR").await,
            Err(AuctionError::MalformedResponse { status: 200, .. })
        ));
        assert!(matches!(
            proxy.list_categories().await,
            Err(AuctionError::MalformedResponse { status: 200, .. })
        ));
    }

    #[tokio::test]
    async fn test_place_bid() {
        let transport = Arc::new(MockTransport::new().respond(204, ""));

        proxy(&transport).place_bid(5, 120.5, "EUR", &token()).await.unwrap();

        let request = transport.last_request();
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.url.path(), "/auctions/articles/5/bid");
        assert_eq!(request.url.query(), Some("amount=120.5&currency=EUR"));
        assert_eq!(request.body.as_deref(), Some("tok-123"));
    }

    #[tokio::test]
    async fn test_place_bid_failures() {
        let transport = Arc::new(
            MockTransport::new()
                .respond(409, "")
                .respond(401, "")
                .respond(404, "")
                .respond(400, "")
                .respond(502, "")
                .respond(418, ""),
        );
        let proxy = proxy(&transport);

        let mut results = Vec::new();
        for _ in 0..6 {
            results.push(proxy.place_bid(5, 120.0, "EUR", &token()).await);
        }
        assert_eq!(
            results,
            vec![
                Err(AuctionError::BidTooLow),
                Err(AuctionError::Unauthenticated),
                Err(AuctionError::ArticleNotFound),
                Err(AuctionError::UnsupportedCurrency),
                Err(AuctionError::ServerError(502)),
                Err(AuctionError::UnexpectedStatus(418)),
            ]
        );
    }

    #[tokio::test]
    async fn test_network_error_is_surfaced_once() {
        let transport = Arc::new(
            MockTransport::new().fail(TransportError::Timeout("30s elapsed".to_string())),
        );

        let err = proxy(&transport).list_categories().await.unwrap_err();
        assert_eq!(
            err,
            AuctionError::Network(TransportError::Timeout("30s elapsed".to_string()))
        );
        assert_eq!(transport.requests().len(), 1);
    }

    #[test]
    fn test_base_url_handling() {
        let transport: Arc<dyn Transport> = Arc::new(MockTransport::new());

        let proxy = ServiceProxy::with_transport("http://localhost:8081/", transport.clone()).unwrap();
        assert_eq!(
            proxy.endpoint(["auth", "login"]).as_str(),
            "http://localhost:8081/auth/login"
        );

        let proxy = ServiceProxy::with_transport("https://example.com/api/", transport.clone()).unwrap();
        assert_eq!(
            proxy.endpoint(["auctions", "categories"]).as_str(),
            "https://example.com/api/auctions/categories"
        );

        assert!(matches!(
            ServiceProxy::with_transport("not a url", transport.clone()),
            Err(AuctionError::InvalidBaseUrl(_))
        ));
        assert!(matches!(
            ServiceProxy::with_transport("mailto:someone@example.com", transport),
            Err(AuctionError::InvalidBaseUrl(_))
        ));
    }
}
