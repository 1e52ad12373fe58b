//! Site configuration from the optional `.fireproof` file.
//!
//! The file is a YAML mapping at the root of the site directory. `url` is the
//! only key the builder itself reads (for `absolute_url` and `tag`); every
//! other key is kept as-is and exposed to templates as `site.<key>`.
//!
//! # Example
//!
//! ```yaml
//! url: https://example.com/
//! title: My Blog
//! author: Alice
//! ```

mod error;

pub use error::ConfigError;

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

/// Name of the config file inside the site directory.
pub const CONFIG_FILE: &str = ".fireproof";

/// Contents of `.fireproof`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Base URL of the deployed site, e.g. `https://example.com/blog`.
    #[serde(default)]
    pub url: Option<String>,

    /// Everything else, in file order.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl SiteConfig {
    /// Parse configuration from a YAML string.
    ///
    /// An empty document is the default config.
    pub fn from_str(content: &str, origin: &Path) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: SiteConfig = serde_yaml::from_str(content)
            .map_err(|err| ConfigError::Yaml(origin.to_path_buf(), err))?;
        Ok(config)
    }

    /// Load configuration from file path
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        Self::from_str(&content, path)
    }

    /// Load `<site_dir>/.fireproof`, or the default config when it is absent.
    pub fn load(site_dir: &Path) -> Result<Self> {
        let path = site_dir.join(CONFIG_FILE);
        let config = if path.is_file() {
            Self::from_path(&path)?
        } else {
            Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(url) = &self.url
            && !url.contains("://")
        {
            bail!(ConfigError::Validation(format!(
                "`url` must include a scheme such as https://, got `{url}`"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn parse(content: &str) -> Result<SiteConfig> {
        SiteConfig::from_str(content, Path::new(CONFIG_FILE))
    }

    #[test]
    fn test_config_full() {
        let config = parse("url: https://example.com/\ntitle: My Blog\nauthor: Alice\n").unwrap();

        assert_eq!(config.url.as_deref(), Some("https://example.com/"));
        assert_eq!(config.extra["title"], "My Blog");
        assert_eq!(config.extra["author"], "Alice");
        assert!(!config.extra.contains_key("url"));
    }

    #[test]
    fn test_config_keeps_key_order() {
        let config = parse("zeta: 1\nalpha: 2\nmid: 3\n").unwrap();
        let keys: Vec<_> = config.extra.keys().map(String::as_str).collect();
        assert_eq!(keys, ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_config_empty_file() {
        assert_eq!(parse("").unwrap(), SiteConfig::default());
        assert_eq!(parse("  \n\n").unwrap(), SiteConfig::default());
    }

    #[test]
    fn test_config_not_a_mapping() {
        let err = parse("- just\n- a list\n").unwrap_err();
        assert!(format!("{err}").contains("parsing error"));
    }

    #[test]
    fn test_config_validation_rejects_schemeless_url() {
        let config = parse("url: example.com\n").unwrap();
        let err = config.validate().unwrap_err();
        assert!(format!("{err}").contains("scheme"));
    }

    #[test]
    fn test_load_missing_file_is_default() {
        let dir = TempDir::new().unwrap();
        assert_eq!(SiteConfig::load(dir.path()).unwrap(), SiteConfig::default());
    }

    #[test]
    fn test_load_from_site_dir() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "url: http://localhost:8000\n").unwrap();

        let config = SiteConfig::load(dir.path()).unwrap();
        assert_eq!(config.url.as_deref(), Some("http://localhost:8000"));
    }
}
