use std::collections::HashSet;
use std::path::PathBuf;

use anyhow::{anyhow, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: default_host(), port: default_port(), worker_threads: None }
    }
}

/// Which resources get routes and where their records are persisted.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_resources")]
    pub resources: Vec<String>,
    #[serde(default = "default_filepath")]
    pub filepath: PathBuf,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self { resources: default_resources(), filepath: default_filepath() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// `compact` or `json`
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { format: default_log_format() }
    }
}

pub const DEFAULT_PORT: u16 = 3000;

fn default_host() -> String { "0.0.0.0".into() }
fn default_port() -> u16 { DEFAULT_PORT }
fn default_resources() -> Vec<String> { vec!["users".into(), "dishes".into()] }
fn default_filepath() -> PathBuf { PathBuf::from("./data/app.json") }
fn default_log_format() -> String { "compact".into() }

/// `CONFIG_PATH`, or `config.toml` in the working directory.
pub fn config_path() -> String {
    std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string())
}

pub fn load_default() -> Result<AppConfig> {
    load_from_file(&config_path())
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    parse(&content)
}

pub fn parse(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Load `config.toml` (or `CONFIG_PATH`), falling back to environment
    /// variables only when the file does not exist, then normalize and validate.
    pub fn load_and_validate() -> Result<Self> {
        Self::load_and_validate_from(&config_path())
    }

    pub fn load_and_validate_from(path: &str) -> Result<Self> {
        let mut cfg = match load_from_file(path) {
            Ok(cfg) => cfg,
            Err(e) if is_not_found(&e) => Self::from_env(),
            Err(e) => return Err(e.context(format!("cannot load {path}"))),
        };
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from a variable lookup; unset or unparsable values keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();
        if let Some(host) = lookup("SERVER_HOST") {
            cfg.server.host = host;
        }
        if let Some(port) = lookup("SERVER_PORT").and_then(|p| p.parse::<u16>().ok()) {
            cfg.server.port = port;
        }
        cfg.server.worker_threads = lookup("TOKIO_WORKER_THREADS").and_then(|v| v.parse::<usize>().ok());
        if let Some(list) = lookup("DEVAPI_RESOURCES") {
            cfg.api.resources = split_resources(&list);
        }
        if let Some(path) = lookup("DEVAPI_FILEPATH") {
            cfg.api.filepath = PathBuf::from(path);
        }
        if let Some(format) = lookup("LOG_FORMAT") {
            cfg.logging.format = format;
        }
        cfg
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.api.normalize();
        self.api.validate()?;
        Ok(())
    }
}

fn is_not_found(e: &anyhow::Error) -> bool {
    e.downcast_ref::<std::io::Error>()
        .is_some_and(|io| io.kind() == std::io::ErrorKind::NotFound)
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = default_host();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        if self.worker_threads == Some(0) {
            self.worker_threads = None;
        }
        Ok(())
    }
}

impl ApiConfig {
    pub fn normalize(&mut self) {
        for name in &mut self.resources {
            *name = name.trim().to_string();
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.filepath.as_os_str().is_empty() {
            return Err(anyhow!("api.filepath is empty"));
        }
        validate_resources(&self.resources)
    }
}

/// Split a comma separated resource list, dropping blanks.
pub fn split_resources(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Resource names become literal path segments, so they must be non-empty,
/// unique, and free of characters the router treats specially.
pub fn validate_resources(resources: &[String]) -> Result<()> {
    if resources.is_empty() {
        return Err(anyhow!("at least one resource must be declared"));
    }
    let mut seen = HashSet::new();
    for name in resources {
        validate_resource_name(name)?;
        if !seen.insert(name.as_str()) {
            return Err(anyhow!("resource `{name}` declared twice"));
        }
    }
    Ok(())
}

pub fn validate_resource_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(anyhow!("resource name is empty"));
    }
    if name.starts_with(':') || name.starts_with('*') {
        return Err(anyhow!("resource `{name}` must not start with `:` or `*`"));
    }
    if name.chars().any(|c| c == '/' || c == '?' || c == '#' || c.is_whitespace()) {
        return Err(anyhow!("resource `{name}` must be a single path segment"));
    }
    Ok(())
}
