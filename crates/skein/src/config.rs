//! TOML configuration for the `skein` CLI.
//!
//! Every section is optional. When no config file is given, the CLI looks
//! for `~/.skein/skein.toml` and falls back to built-in defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;
use skein_engine::ClientConfig;
use skein_types::{DEFAULT_MAX_CHUNK_SIZE, Namespace};

/// Default node RPC endpoint.
pub const DEFAULT_RPC_URL: &str = "http://localhost:26658";

/// Default namespace id (hex).
pub const DEFAULT_NAMESPACE: &str = "000008e5f679bf7116cb";

/// Top-level configuration, parsed from TOML.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Node connection.
    pub rpc: RpcSection,
    /// Blob layout and store call behaviour.
    pub blob: BlobSection,
    /// Logging configuration.
    pub log: LogSection,
}

/// `[rpc]` section.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RpcSection {
    /// Node JSON-RPC endpoint.
    pub url: String,
    /// Bearer token for the node API.
    pub auth_token: Option<String>,
}

impl Default for RpcSection {
    fn default() -> Self {
        Self {
            url: DEFAULT_RPC_URL.to_string(),
            auth_token: None,
        }
    }
}

/// `[blob]` section.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct BlobSection {
    /// Namespace id in hex, at most 10 bytes.
    pub namespace: String,
    /// Largest chunk submitted as one blob, in bytes.
    pub max_chunk_size: usize,
    /// Per-call store timeout in seconds. Unset waits indefinitely.
    pub timeout_secs: Option<u64>,
    /// Fail reads whose chunk sizes disagree with the manifest.
    pub verify_sizes: bool,
}

impl Default for BlobSection {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            max_chunk_size: DEFAULT_MAX_CHUNK_SIZE,
            timeout_secs: None,
            verify_sizes: false,
        }
    }
}

/// `[log]` section.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LogSection {
    /// Log level filter (e.g. `"info"`, `"debug"`, `"warn"`).
    pub level: String,
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl CliConfig {
    /// Load config from a TOML file, or from the default location if no
    /// path is given.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(p) => Self::from_file(p),
            None => match default_config_path() {
                Some(p) if p.is_file() => Self::from_file(&p),
                _ => Ok(Self::default()),
            },
        }
    }

    fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Parse config from a TOML string (used in tests).
    #[cfg(test)]
    pub fn from_toml(s: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Parsed namespace.
    pub fn namespace(&self) -> anyhow::Result<Namespace> {
        Namespace::from_hex(&self.blob.namespace)
            .with_context(|| format!("invalid namespace {:?}", self.blob.namespace))
    }

    /// Per-call store timeout, if configured.
    pub fn store_timeout(&self) -> Option<Duration> {
        self.blob.timeout_secs.map(Duration::from_secs)
    }

    /// Client configuration derived from the `[blob]` section.
    pub fn client_config(&self) -> anyhow::Result<ClientConfig> {
        self.client_config_in(self.namespace()?)
    }

    /// Like [`client_config`](Self::client_config), but in the given
    /// namespace instead of the configured one.
    pub fn client_config_in(&self, namespace: Namespace) -> anyhow::Result<ClientConfig> {
        let config = ClientConfig {
            namespace,
            max_chunk_size: self.blob.max_chunk_size,
            store_timeout: self.store_timeout(),
            verify_sizes: self.blob.verify_sizes,
        };
        config.validate()?;
        Ok(config)
    }
}

/// `~/.skein/skein.toml`, when a home directory is known.
fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".skein").join("skein.toml"))
}
