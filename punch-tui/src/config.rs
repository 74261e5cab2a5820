use anyhow::{bail, Context, Result};
use punch_client::{Endpoint, MemberId};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::cli::Overrides;

const ENV_PREFIX: &str = "PUNCH";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Dial without TLS.
    #[serde(default)]
    pub insecure: bool,
    /// Name the server certificate must match, if not `host`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls_authority: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KioskConfig {
    /// Member the kiosk clocks for.
    pub member_id: i32,
    /// Offer the records query next to clocking.
    #[serde(default = "default_query_enabled")]
    pub query_enabled: bool,
    pub server: ServerConfig,
}

fn default_query_enabled() -> bool {
    true
}

impl Default for KioskConfig {
    fn default() -> Self {
        Self {
            member_id: 0,
            query_enabled: default_query_enabled(),
            server: ServerConfig {
                host: "localhost".to_string(),
                port: 443,
                insecure: false,
                tls_authority: None,
            },
        }
    }
}

impl KioskConfig {
    pub fn config_path() -> Result<PathBuf> {
        Ok(dirs::config_dir()
            .context("Cannot determine config directory")?
            .join("punch-tui")
            .join("config.toml"))
    }

    /// Layer defaults, the config file, `PUNCH__*` environment variables and
    /// command-line overrides, in that order.
    pub fn load(overrides: &Overrides) -> Result<Self> {
        let path = match &overrides.config {
            Some(path) => path.clone(),
            None => Self::config_path()?,
        };
        Self::load_from(&path, overrides)
    }

    pub fn load_from(path: &Path, overrides: &Overrides) -> Result<Self> {
        let defaults = Self::default();
        let settings = config::Config::builder()
            .set_default("server.host", defaults.server.host)?
            .set_default("server.port", i64::from(defaults.server.port))?
            .set_default("server.insecure", defaults.server.insecure)?
            .set_default("member_id", i64::from(defaults.member_id))?
            .set_default("query_enabled", defaults.query_enabled)?
            .add_source(
                config::File::from(path)
                    .format(config::FileFormat::Toml)
                    .required(false),
            )
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("server.host", overrides.host.clone())?
            .set_override_option("server.port", overrides.port.map(i64::from))?
            .set_override_option("server.insecure", overrides.insecure.then_some(true))?
            .set_override_option("member_id", overrides.member.map(i64::from))?
            .build()
            .with_context(|| format!("Failed to read config at {}", path.display()))?;

        let config: Self = settings
            .try_deserialize()
            .with_context(|| format!("Failed to parse config at {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.server.host.trim().is_empty() {
            bail!("server.host must not be empty");
        }
        if self.server.port == 0 {
            bail!("server.port must not be 0");
        }
        if self.member_id <= 0 {
            bail!("member_id must be set to a positive number");
        }
        Ok(())
    }

    pub fn endpoint(&self) -> Endpoint {
        let mut endpoint = Endpoint::new(self.server.host.clone(), self.server.port);
        endpoint.insecure = self.server.insecure;
        endpoint.tls_authority = self.server.tls_authority.clone();
        endpoint
    }

    pub fn member(&self) -> MemberId {
        MemberId(self.member_id)
    }

    /// Write a default config file unless one already exists.
    pub fn ensure_default_file(path: &Path) -> Result<bool> {
        if path.exists() {
            return Ok(false);
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let raw = toml::to_string_pretty(&Self::default())?;
        std::fs::write(path, raw)
            .with_context(|| format!("Failed to write config at {}", path.display()))?;
        Ok(true)
    }
}
