use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::GatewayError;

pub const DEFAULT_BASE_URL: &str = "https://192.168.1.1";
pub const DEFAULT_HTTP_ADDR: &str = ":8000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log_level: Option<String>,
    pub log_file: Option<PathBuf>,
    pub unifi: UnifiConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UnifiConfig {
    pub base_url: String,
    pub api_key: String,
    pub skip_tls_verify: bool,
    pub timeout_secs: u64,
    pub network_tools: bool,
}

impl Default for UnifiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: String::new(),
            skip_tls_verify: false,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            network_tools: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    #[default]
    Stdio,
    Http,
}

impl TransportKind {
    /// `None` for anything that is not a known transport name
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "http" => Some(Self::Http),
            "" | "stdio" => Some(Self::Stdio),
            _ => None,
        }
    }
}

impl std::fmt::Display for TransportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stdio => write!(f, "stdio"),
            Self::Http => write!(f, "http"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub transport: TransportKind,
    pub http_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            transport: TransportKind::Stdio,
            http_addr: DEFAULT_HTTP_ADDR.to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: Some("info".to_string()),
            log_file: None,
            unifi: UnifiConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

/// Connection settings shared read-only by every vendor client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub api_key: String,
    pub skip_tls_verify: bool,
    pub timeout: Duration,
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try primary location: ~/.config/<project>/<project>.yml
        if let Some(config_dir) = dirs::config_dir() {
            let project_name = env!("CARGO_PKG_NAME");
            let primary_config = config_dir.join(project_name).join(format!("{}.yml", project_name));
            if primary_config.exists() {
                match Self::load_from_file(&primary_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        log::warn!("Failed to load config from {}: {}", primary_config.display(), e);
                    }
                }
            }
        }

        // Try fallback location: ./<project>.yml
        let project_name = env!("CARGO_PKG_NAME");
        let fallback_config = PathBuf::from(format!("{}.yml", project_name));
        if fallback_config.exists() {
            match Self::load_from_file(&fallback_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    log::warn!("Failed to load config from {}: {}", fallback_config.display(), e);
                }
            }
        }

        // No config file found, use defaults
        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        log::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    /// Select the transport by name; an unknown name falls back to stdio and
    /// comes back as a warning
    pub fn set_transport(&mut self, value: &str) -> Option<String> {
        match TransportKind::parse(value) {
            Some(kind) => {
                self.server.transport = kind;
                None
            }
            None => {
                self.server.transport = TransportKind::Stdio;
                Some(format!("Unknown transport '{}', falling back to stdio", value.trim()))
            }
        }
    }

    /// Apply overrides from the process environment.
    ///
    /// Runs before logging is configured, so rejected values are returned
    /// as warnings for the caller to log once it is.
    pub fn apply_env(&mut self) -> Vec<String> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup
    pub fn apply_env_from<F>(&mut self, lookup: F) -> Vec<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut warnings = Vec::new();

        if let Some(url) = lookup("UNIFI_BASE_URL").filter(|v| !v.is_empty()) {
            self.unifi.base_url = url;
        }
        if let Some(key) = lookup("UNIFI_API_KEY") {
            self.unifi.api_key = key;
        }
        if let Some(skip) = lookup("UNIFI_SKIP_SSL_VERIFY") {
            self.unifi.skip_tls_verify = skip == "true";
        }
        if let Some(secs) = lookup("UNIFI_TIMEOUT_SECS") {
            match secs.parse::<u64>() {
                Ok(secs) if secs > 0 => self.unifi.timeout_secs = secs,
                _ => warnings.push(format!("Ignoring invalid UNIFI_TIMEOUT_SECS value: {}", secs)),
            }
        }
        if let Some(enabled) = lookup("UNIFI_NETWORK_TOOLS") {
            self.unifi.network_tools = enabled != "false";
        }
        if let Some(transport) = lookup("MCP_TRANSPORT") {
            warnings.extend(self.set_transport(&transport));
        }
        if let Some(addr) = lookup("MCP_HTTP_ADDR").filter(|v| !v.is_empty()) {
            self.server.http_addr = addr;
        }
        if let Some(level) = lookup("LOG_LEVEL").filter(|v| !v.is_empty()) {
            self.log_level = Some(level);
        }
        warnings
    }

    /// Startup checks that must pass before any transport is served
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.unifi.api_key.trim().is_empty() {
            return Err(GatewayError::Config(
                "UNIFI_API_KEY environment variable is required".to_string(),
            ));
        }
        if self.unifi.base_url.trim().is_empty() {
            return Err(GatewayError::Config("base URL must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.unifi.base_url.trim_end_matches('/').to_string(),
            api_key: self.unifi.api_key.clone(),
            skip_tls_verify: self.unifi.skip_tls_verify,
            timeout: Duration::from_secs(self.unifi.timeout_secs),
        }
    }

    /// Socket address for the HTTP transport; ":8000" binds all interfaces
    pub fn listen_addr(&self) -> String {
        let addr = self.server.http_addr.trim();
        if addr.starts_with(':') {
            format!("0.0.0.0{}", addr)
        } else {
            addr.to_string()
        }
    }
}
