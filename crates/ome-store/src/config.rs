use serde::{Deserialize, Serialize};

/// Configuration for an in-memory metadata store.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Log a warning when a write skips ahead of a container's current
    /// count and placeholder instances are created to fill the gap.
    pub warn_on_gaps: bool,
    /// Sanitise string values on write, as [`crate::FilterMetadata`] does.
    pub sanitize_strings: bool,
}

impl StoreConfig {
    /// Configuration for populators fed from untrusted text.
    pub fn sanitizing() -> Self {
        Self {
            sanitize_strings: true,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_quiet_and_verbatim() {
        let c = StoreConfig::default();
        assert!(!c.warn_on_gaps);
        assert!(!c.sanitize_strings);
    }

    #[test]
    fn missing_keys_take_defaults() {
        let c: StoreConfig = serde_json::from_str(r#"{"warn_on_gaps":true}"#).unwrap();
        assert!(c.warn_on_gaps);
        assert!(!c.sanitize_strings);
        assert!(StoreConfig::sanitizing().sanitize_strings);
    }
}
