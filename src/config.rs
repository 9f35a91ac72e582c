use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use webscope_ingest::DEFAULT_BATCH_SIZE;

/// Config file looked up in the working directory when no path is given
const CONFIG_FILE: &str = "webscope.toml";

/// Runtime configuration
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub ingest: IngestConfig,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct IngestConfig {
    /// Records buffered before each bulk write
    pub batch_size: usize,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl Config {
    /// Load configuration
    ///
    /// An explicitly passed path must exist and parse; the implicit
    /// `webscope.toml` lookup silently falls back to defaults when the file
    /// is absent.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path,
            None => {
                let fallback = Path::new(CONFIG_FILE);
                if !fallback.exists() {
                    return Ok(Self::default());
                }
                fallback
            }
        };

        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config = toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_implicit_config_uses_defaults() {
        let config = Config::load(None).unwrap();
        assert_eq!(config.ingest.batch_size, DEFAULT_BATCH_SIZE);
    }

    #[test]
    fn test_explicit_config_overrides_batch_size() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[ingest]\nbatch_size = 250").unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.ingest.batch_size, 250);
    }

    #[test]
    fn test_explicit_missing_config_is_an_error() {
        assert!(Config::load(Some(Path::new("/nonexistent/webscope.toml"))).is_err());
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[ingest]\nbatchsize = 250").unwrap();

        assert!(Config::load(Some(file.path())).is_err());
    }
}
