use serde::{Deserialize, Serialize};

/// Marker synthesis configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesisConfig {
    /// Prefix of generated marker names, followed by a counter
    pub marker_prefix: String,

    /// Whether markers synthesized for nested group and frame columns are open
    pub nested_markers_open: bool,

    /// Rewrite column names into valid identifiers for field names
    pub normalize_field_names: bool,
}

impl SynthesisConfig {
    /// Create a configuration with default settings
    pub fn new() -> Self {
        Self {
            marker_prefix: "DataFrameType".to_string(),
            nested_markers_open: false,
            normalize_field_names: true,
        }
    }

    /// Set the marker name prefix
    pub fn marker_prefix(mut self, prefix: &str) -> Self {
        self.marker_prefix = prefix.to_string();
        self
    }

    /// Set whether nested markers are open
    pub fn nested_markers_open(mut self, open: bool) -> Self {
        self.nested_markers_open = open;
        self
    }

    /// Set whether field names are normalized
    pub fn normalize_field_names(mut self, normalize: bool) -> Self {
        self.normalize_field_names = normalize;
        self
    }
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let config = SynthesisConfig::new()
            .marker_prefix("Row")
            .nested_markers_open(true);
        assert_eq!(config.marker_prefix, "Row");
        assert!(config.nested_markers_open);
        assert!(config.normalize_field_names);
    }

    #[test]
    fn test_partial_document_uses_defaults() {
        let config: SynthesisConfig =
            serde_json::from_str(r#"{"nested_markers_open": true}"#).unwrap();
        assert_eq!(config.marker_prefix, "DataFrameType");
        assert!(config.nested_markers_open);
    }
}
