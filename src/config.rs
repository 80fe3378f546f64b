// ⚙️ Application Configuration
// Defaults → optional TOML file → DCA_* environment variables

use anyhow::{bail, Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable naming an explicit config file
pub const CONFIG_PATH_VAR: &str = "DCA_CONFIG";

/// Which market-data provider the server uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Yahoo,
    Csv,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Address the HTTP server binds to
    pub bind_addr: String,

    /// Directory holding the HTML pages and static assets
    pub web_dir: PathBuf,

    pub provider: ProviderKind,

    /// Directory of <SYMBOL>.csv files when provider = csv
    pub csv_dir: PathBuf,

    pub yahoo_base_url: String,

    /// Timeout for each market-data request
    pub request_timeout_secs: u64,

    pub user_agent: String,

    /// tracing filter directive, e.g. "info" or "dca_compare=debug"
    pub log_level: String,

    /// Emit JSON log lines instead of human-readable ones
    pub log_json: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            bind_addr: "0.0.0.0:8017".to_string(),
            web_dir: PathBuf::from("web"),
            provider: ProviderKind::Yahoo,
            csv_dir: PathBuf::from("data"),
            yahoo_base_url: "https://query1.finance.yahoo.com".to_string(),
            request_timeout_secs: 10,
            user_agent: format!("dca-compare/{}", env!("CARGO_PKG_VERSION")),
            log_level: "info".to_string(),
            log_json: false,
        }
    }
}

impl AppConfig {
    /// Load configuration.
    ///
    /// `path` (or `$DCA_CONFIG`) must exist when given; otherwise `dca.toml`
    /// in the working directory is read if present. Environment variables
    /// such as `DCA_BIND_ADDR` or `DCA_PROVIDER` override file values.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let defaults = Config::try_from(&AppConfig::default())
            .context("Failed to build default configuration")?;

        let mut builder = Config::builder().add_source(defaults);

        let explicit = path
            .map(str::to_string)
            .or_else(|| std::env::var(CONFIG_PATH_VAR).ok());

        builder = match explicit {
            Some(path) => builder.add_source(File::with_name(&path)),
            None => builder.add_source(File::with_name("dca").required(false)),
        };

        builder = builder.add_source(Environment::with_prefix("DCA").try_parsing(true));

        let config: AppConfig = builder
            .build()
            .context("Failed to build configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        config.check()?;
        Ok(config)
    }

    /// Reject values that would only fail later at runtime
    pub fn check(&self) -> Result<()> {
        if self.bind_addr.trim().is_empty() {
            bail!("bind_addr must not be empty");
        }
        if self.request_timeout_secs == 0 {
            bail!("request_timeout_secs must be greater than zero");
        }
        if self.provider == ProviderKind::Yahoo && self.yahoo_base_url.trim().is_empty() {
            bail!("yahoo_base_url must be set when provider = yahoo");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.check().is_ok());
        assert_eq!(config.provider, ProviderKind::Yahoo);
        assert_eq!(config.bind_addr, "0.0.0.0:8017");
    }

    #[test]
    fn test_load_from_file_overrides_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        fs::write(
            &path,
            "provider = \"csv\"\ncsv_dir = \"/srv/prices\"\nrequest_timeout_secs = 3\n",
        )
        .unwrap();

        let config = AppConfig::load(path.to_str()).unwrap();

        assert_eq!(config.provider, ProviderKind::Csv);
        assert_eq!(config.csv_dir, PathBuf::from("/srv/prices"));
        assert_eq!(config.request_timeout_secs, 3);
        // Untouched keys keep their defaults
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let config = AppConfig {
            request_timeout_secs: 0,
            ..AppConfig::default()
        };
        assert!(config.check().is_err());
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        assert!(AppConfig::load(Some("/definitely/not/here/dca.toml")).is_err());
    }
}
