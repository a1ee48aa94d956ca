//! Auctions service client.

pub mod service_proxy;
pub mod session;
pub mod status;

pub use service_proxy::ServiceProxy;
pub use session::{Session, SessionToken};
