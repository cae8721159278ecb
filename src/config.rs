//! Configuration management for taskdb
//!
//! Settings come from a TOML file, then environment variables (including a
//! `.env` file in the working directory) override individual fields.

use crate::constants::{
    CONFIG_DIR_NAME, CONFIG_FILE_NAME, CONFIG_GENERATED, DEFAULT_BATCH_SIZE, DEFAULT_LOGGER_NAME, DEFAULT_LOG_LEVEL,
    DEFAULT_POSTGRES_PORT,
};
use crate::logger;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub fixtures: FixturesConfig,
}

/// Database connection settings
///
/// Either `url` is given verbatim, or a PostgreSQL URI is assembled from the
/// discrete fields. `user`/`username` and `db`/`database` are aliases; the
/// long form wins when both are present.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DatabaseConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub password: String,
    pub host: String,
    pub port: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub db: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// One of off, error, warn, info, debug, trace
    pub level: String,
    /// Name shown in brackets on every log line
    pub logger_name: String,
    /// Also append log lines to this file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

/// Fixture generation settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FixturesConfig {
    /// Rows created per entity by the batch fixtures and `taskdb seed`
    pub batch_size: usize,
    /// Fixed seed for reproducible fixture values
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            user: None,
            username: None,
            password: String::new(),
            host: "localhost".to_string(),
            port: DEFAULT_POSTGRES_PORT,
            db: None,
            database: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            logger_name: DEFAULT_LOGGER_NAME.to_string(),
            file: None,
        }
    }
}

impl Default for FixturesConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            seed: None,
        }
    }
}

impl DatabaseConfig {
    /// Effective user name, preferring `username` over `user`.
    pub fn effective_user(&self) -> Option<&str> {
        self.username.as_deref().or(self.user.as_deref())
    }

    /// Effective database name, preferring `database` over `db`.
    pub fn effective_database(&self) -> Option<&str> {
        self.database.as_deref().or(self.db.as_deref())
    }

    /// Connection URI for the configured database.
    pub fn uri(&self) -> Result<String> {
        if let Some(url) = &self.url {
            return Ok(url.clone());
        }

        let user = self
            .effective_user()
            .context("postgres user or username must be set")?;
        let database = self
            .effective_database()
            .context("postgres database or db must be set")?;

        Ok(format!(
            "postgres://{}:{}@{}:{}/{}",
            user, self.password, self.host, self.port, database
        ))
    }

    pub fn validate(&self) -> Result<()> {
        if self.url.is_some() {
            return Ok(());
        }
        if self.effective_user().is_none() {
            anyhow::bail!("postgres user or username must be set");
        }
        if self.effective_database().is_none() {
            anyhow::bail!("postgres database or db must be set");
        }
        if self.host.is_empty() {
            anyhow::bail!("postgres host cannot be empty");
        }
        Ok(())
    }
}

impl Config {
    /// Load configuration from file (or defaults), then apply the environment.
    pub fn load() -> Result<Self> {
        // A missing .env file is fine; a malformed one is not.
        match dotenvy::dotenv() {
            Ok(_) => {}
            Err(err) if err.not_found() => {}
            Err(err) => return Err(err).context("Failed to load .env file"),
        }

        let mut config = match Self::find_config_file() {
            Some(path) => Self::load_from_file(&path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;

        config.validate_logging()?;
        Ok(config)
    }

    /// Find configuration file in order of precedence
    fn find_config_file() -> Option<PathBuf> {
        let current_dir_config = PathBuf::from(CONFIG_FILE_NAME);
        if current_dir_config.exists() {
            return Some(current_dir_config);
        }

        let xdg_config = dirs::config_dir()?.join(CONFIG_DIR_NAME).join("config.toml");
        xdg_config.exists().then_some(xdg_config)
    }

    /// Override fields from `POSTGRES_*`, `DATABASE_URL`, `LOG_LEVEL` and `LOG_FILE`.
    ///
    /// `lookup` abstracts the environment so the mapping can be tested without
    /// mutating process state.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let db = &mut self.database;
        if let Some(url) = lookup("DATABASE_URL") {
            db.url = Some(url);
        }
        if let Some(user) = lookup("POSTGRES_USER") {
            db.user = Some(user);
        }
        if let Some(username) = lookup("POSTGRES_USERNAME") {
            db.username = Some(username);
        }
        if let Some(password) = lookup("POSTGRES_PASSWORD") {
            db.password = password;
        }
        if let Some(host) = lookup("POSTGRES_HOST") {
            db.host = host;
        }
        if let Some(port) = lookup("POSTGRES_PORT") {
            db.port = port
                .parse()
                .with_context(|| format!("POSTGRES_PORT is not a valid port: {port}"))?;
        }
        if let Some(name) = lookup("POSTGRES_DB") {
            db.db = Some(name);
        }
        if let Some(name) = lookup("POSTGRES_DATABASE") {
            db.database = Some(name);
        }
        if let Some(level) = lookup("LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(file) = lookup("LOG_FILE") {
            self.logging.file = Some(PathBuf::from(file));
        }

        self.validate_logging()
    }

    /// Validate everything needed to connect to the configured database
    pub fn validate(&self) -> Result<()> {
        self.validate_logging()?;
        self.database.validate()?;
        if self.fixtures.batch_size == 0 {
            anyhow::bail!("fixtures.batch_size must be at least 1");
        }
        Ok(())
    }

    fn validate_logging(&self) -> Result<()> {
        logger::level_filter(&self.logging.level)?;
        if self.logging.logger_name.is_empty() {
            anyhow::bail!("logging.logger_name cannot be empty");
        }
        Ok(())
    }

    /// Generate default configuration file
    pub fn generate_default_config<P: AsRef<Path>>(path: P) -> Result<()> {
        let config = Self::default();
        let toml_content = toml::to_string_pretty(&config).context("Failed to serialize default config")?;

        let header = format!(
            "# taskdb Configuration File\n# Generated on {}\n\n",
            chrono::Local::now().format("%Y-%m-%d")
        );

        let full_content = header + &toml_content;

        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
        }

        std::fs::write(&path, full_content)
            .with_context(|| format!("Failed to write config file: {}", path.as_ref().display()))?;

        log::info!("{}: {}", CONFIG_GENERATED, path.as_ref().display());
        Ok(())
    }

    /// Get the XDG config directory path
    pub fn get_xdg_config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))
            .map(|dir| dir.join(CONFIG_DIR_NAME))
    }

    /// Get the default config file path
    pub fn get_default_config_path() -> Result<PathBuf> {
        Ok(Self::get_xdg_config_dir()?.join("config.toml"))
    }
}
