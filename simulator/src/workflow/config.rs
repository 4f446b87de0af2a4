use crate::generator::profile::GeneratorConfig;
use anyhow::Context;
use detection_client::ClientConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::{IpAddr, SocketAddr};
use std::path::Path;

/// Simulator settings; `scene` is absent for the single-person reference scene.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulatorConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default)]
    pub scene: Option<GeneratorConfig>,
}

fn default_host() -> String {
    "127.0.0.1".into()
}

fn default_port() -> u16 {
    8008
}

fn default_timeout_ms() -> u64 {
    ClientConfig::new(default_host(), default_port()).timeout_ms
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            timeout_ms: default_timeout_ms(),
            scene: None,
        }
    }
}

impl SimulatorConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading simulator config {}", path_ref.display()))?;
        let config: SimulatorConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing simulator config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn bind_address(&self) -> anyhow::Result<SocketAddr> {
        let ip: IpAddr = self
            .host
            .parse()
            .with_context(|| format!("parsing bind host {}", self.host))?;
        Ok(SocketAddr::new(ip, self.port))
    }

    /// Client settings for probing a server bound at `addr`.
    pub fn client_config(&self, addr: SocketAddr) -> ClientConfig {
        ClientConfig {
            timeout_ms: self.timeout_ms,
            ..ClientConfig::new(addr.ip().to_string(), addr.port())
        }
    }
}
