use std::path::Path;

use anyhow::Context;
use ome_store::StoreConfig;
use serde::{Deserialize, Serialize};

use crate::cli::OutputFormat;

/// Settings read from `--config <file>`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub sanitize_strings: bool,
    pub warn_on_gaps: bool,
    pub default_format: Option<OutputFormat>,
}

impl CliConfig {
    /// Load from `path`; no path, or a path that does not exist, gives defaults.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            warn_on_gaps: self.warn_on_gaps,
            sanitize_strings: self.sanitize_strings,
        }
    }

    /// The `--format` flag wins over the file.
    pub fn format(&self, flag: Option<OutputFormat>) -> OutputFormat {
        flag.or(self.default_format).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let c = CliConfig::load(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(c, CliConfig::default());
        assert_eq!(CliConfig::load(None).unwrap(), CliConfig::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "sanitize_strings = true\ndefault_format = \"json\"").unwrap();
        let c = CliConfig::load(Some(f.path())).unwrap();
        assert!(c.sanitize_strings);
        assert!(!c.warn_on_gaps);
        assert_eq!(c.default_format, Some(OutputFormat::Json));
        assert!(c.store_config().sanitize_strings);
    }

    #[test]
    fn flag_overrides_file() {
        let c = CliConfig {
            default_format: Some(OutputFormat::Json),
            ..CliConfig::default()
        };
        assert_eq!(c.format(None), OutputFormat::Json);
        assert_eq!(c.format(Some(OutputFormat::Text)), OutputFormat::Text);
        assert_eq!(CliConfig::default().format(None), OutputFormat::Text);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "warn_on_gaps = \"sometimes\"").unwrap();
        assert!(CliConfig::load(Some(f.path())).is_err());
    }
}
