//! Auctions Client
//!
//! Typed proxy for the remote auctions service.
//!
//! This crate provides:
//! - Domain types for categories, articles and credentials
//! - A service proxy that shapes requests and decodes responses
//! - Per-endpoint status-code tables mapping HTTP failures to typed errors
//! - A pluggable transport seam with a reqwest implementation
//! - Caller-owned sessions that carry the login token

pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod transport;

pub use client::{ServiceProxy, Session, SessionToken};
pub use config::ClientConfig;
pub use error::{AuctionError, AuctionResult, TransportError};
pub use models::{Article, Category, Credentials};
