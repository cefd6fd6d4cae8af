use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

/// How accepted connections are handed off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DispatchMode {
    /// Queue connections for a fixed set of workers.
    #[default]
    Pool,
    /// Spawn one task per connection.
    Inline,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_addr: String,
    pub backlog: u32,
    pub workers: usize,
    /// Value of the `Server` response header
    pub server_name: String,
    pub dispatch: DispatchMode,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:8888".to_string(),
            backlog: 1000,
            workers: 4,
            server_name: "sockhttp".to_string(),
            dispatch: DispatchMode::Pool,
        }
    }
}

impl Config {
    /// Builds the configuration from the environment.
    ///
    /// Starts from defaults, then the YAML file named by `CONFIG` (if set),
    /// then `LISTEN` and `WORKERS` overrides. An unreadable file is logged
    /// and ignored.
    pub fn load() -> Self {
        let mut cfg = match std::env::var("CONFIG") {
            Ok(path) => Self::from_file(&path).unwrap_or_else(|e| {
                tracing::warn!(path = %path, error = %e, "Falling back to default config");
                Self::default()
            }),
            Err(_) => Self::default(),
        };

        if let Ok(addr) = std::env::var("LISTEN") {
            cfg.server.listen_addr = addr;
        }

        if let Ok(workers) = std::env::var("WORKERS") {
            match workers.parse() {
                Ok(n) => cfg.server.workers = n,
                Err(_) => tracing::warn!(value = %workers, "Ignoring invalid WORKERS"),
            }
        }

        cfg.normalized()
    }

    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_yaml_str(&text)
    }

    pub fn from_yaml_str(text: &str) -> anyhow::Result<Self> {
        let cfg: Config = serde_yaml::from_str(text).context("Invalid config YAML")?;
        Ok(cfg.normalized())
    }

    fn normalized(mut self) -> Self {
        self.server.workers = self.server.workers.max(1);
        self
    }
}
