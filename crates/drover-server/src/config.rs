use std::net::SocketAddr;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Accept writes without an Authorization header. When false,
    /// unauthenticated mutating requests are rejected.
    pub allow_anonymous_write: bool,
    pub request_body_limit: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:7410".parse().expect("fixed default addr"),
            allow_anonymous_write: true,
            request_body_limit: 2 * 1024 * 1024,
        }
    }
}

impl ServerConfig {
    /// Parse a TOML configuration document; absent keys keep defaults.
    pub fn from_toml(document: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(document)
    }
}
