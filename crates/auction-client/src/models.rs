//! Auction domain types as exchanged with the auctions service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Login credentials.
///
/// Built for a single login call and never stored. `Debug` hides the password.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Credentials {
    /// Account e-mail.
    pub email: String,

    /// Plain-text password, sent only inside the login request body.
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

/// Auction category. The name doubles as its identifier in article lookups.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Category {
    pub name: String,
}

/// Snapshot of an auctioned article.
///
/// Prices are expressed in `currency`, which is whatever the caller asked the
/// server to convert to. The server guarantees `current_price >= initial_price`;
/// nothing here re-checks it. Fetch again after bidding to see new prices.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    /// Article ID.
    pub id: i64,

    /// Display title.
    pub title: String,

    /// Starting price.
    pub initial_price: f64,

    /// Highest bid so far, or the starting price if nobody has bid.
    pub current_price: f64,

    /// Number of bids placed.
    pub bids: u32,

    /// When bidding closes.
    #[serde(with = "auction_end")]
    pub auction_end: DateTime<Utc>,

    /// Name of the owning category.
    pub category_name: String,

    /// Seller's display name.
    pub owner_name: String,

    /// Currency code the prices are expressed in (e.g. "EUR").
    pub currency: String,
}

/// `auctionEnd` arrives as RFC 3339 text or as epoch milliseconds depending on
/// how the backend's JSON mapper is configured. It is always written as RFC 3339.
mod auction_end {
    use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Wire {
        Millis(i64),
        Text(String),
    }

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::AutoSi, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        match Wire::deserialize(deserializer)? {
            Wire::Millis(millis) => Utc
                .timestamp_millis_opt(millis)
                .single()
                .ok_or_else(|| de::Error::custom(format!("auctionEnd out of range: {}", millis))),
            Wire::Text(text) => DateTime::parse_from_rfc3339(&text)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(de::Error::custom),
        }
    }
}
