use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Address of the detection server, fixed for the lifetime of a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerEndpoint {
    pub host: String,
    pub port: u16,
}

impl ServerEndpoint {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    pub fn url(&self, endpoint: Endpoint) -> String {
        format!("http://{}:{}{}", self.host, self.port, endpoint.path())
    }
}

impl fmt::Display for ServerEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// The two read-only routes served by the detection server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    ClosestObject,
    AllObjects,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::ClosestObject => "/get_closest_object",
            Endpoint::AllObjects => "/get_all_objects",
        }
    }
}

/// Client settings, deserializable from any serde format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(flatten)]
    pub endpoint: ServerEndpoint,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

impl ClientConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            endpoint: ServerEndpoint::new(host, port),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_urls_follow_server_routes() {
        let server = ServerEndpoint::new("10.0.0.7", 8008);
        assert_eq!(
            server.url(Endpoint::ClosestObject),
            "http://10.0.0.7:8008/get_closest_object"
        );
        assert_eq!(
            server.url(Endpoint::AllObjects),
            "http://10.0.0.7:8008/get_all_objects"
        );
        assert_eq!(server.to_string(), "10.0.0.7:8008");
    }

    #[test]
    fn config_defaults_timeout_when_absent() {
        let cfg: ClientConfig =
            serde_json::from_str(r#"{"host":"localhost","port":8008}"#).unwrap();
        assert_eq!(cfg, ClientConfig::new("localhost", 8008));
        assert_eq!(cfg.timeout(), Duration::from_secs(10));

        let short = cfg.with_timeout(Duration::from_millis(250));
        assert_eq!(short.timeout_ms, 250);
    }
}
