//! HTTP server for Drover.
//!
//! A thin axum surface over [`drover_sdk::Drover`]: JSON in, JSON out,
//! with the SDK's error taxonomy mapped onto status codes. Routing and
//! request plumbing live here; every domain decision lives below the SDK.

pub mod config;
pub mod error;
pub mod handler;
pub mod identity;
pub mod router;
pub mod server;

pub use config::ServerConfig;
pub use error::{ApiError, ServerResult};
pub use identity::{AllowAllIdentity, Credentials, IdentityProvider};
pub use router::build_router;
pub use server::DroverServer;
