use inspect_compiler_react::TranspileOptions;
use inspect_parser::{ParseOptions, PrintOptions};
use serde::{Deserialize, Serialize};

/// How reused nodes are paired with new fragments during reconciliation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MatchMode {
    /// Pair each fragment with the oldest unmatched node of its kind
    #[default]
    Queue,
    /// Pair fragments carrying a key with the first unmatched node of the same
    /// kind and key, then fall back to queue order
    Keyed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReconcileOptions {
    /// Attribute holding the utility class list
    pub class_attribute: String,
    pub match_mode: MatchMode,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self {
            class_attribute: "className".to_string(),
            match_mode: MatchMode::Queue,
        }
    }
}

/// Per-document configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DocumentOptions {
    pub parse: ParseOptions,
    pub print: PrintOptions,
    pub transpile: TranspileOptions,
    pub reconcile: ReconcileOptions,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_options_fill_defaults() {
        let options: DocumentOptions =
            serde_json::from_str(r#"{ "reconcile": { "matchMode": "keyed" } }"#).unwrap();
        assert_eq!(options.reconcile.match_mode, MatchMode::Keyed);
        assert_eq!(options.reconcile.class_attribute, "className");
        assert!(options.parse.jsx);
    }
}
