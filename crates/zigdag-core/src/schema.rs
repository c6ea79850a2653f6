//! The on-disk JSON schema (spec.md section 4.1 / section 6).
//!
//! These types are the literal `serde_json` deserialization target for the
//! model file. They are intentionally permissive -- "fields absent for a
//! given kind are ignored; the loader does not enforce their presence
//! beyond the kind's stated needs" (spec.md section 4.1) -- so every
//! optional per-kind field is `Option`/`Vec` with a default. Turning a
//! `NodeSchema` into a typed [`crate::ops::Operation`] (including arity
//! checking) is `zigdag-loader`'s job, not this crate's: this module only
//! describes the wire shape.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Top-level JSON document: `{ name, version, nodes }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSchema {
    pub name: String,
    pub version: String,
    pub nodes: Vec<NodeSchema>,
}

/// One entry of the `nodes` array. `operation` is the tagged-variant
/// discriminant (e.g. `"weighted_sum"`); every other field is optional and
/// consumed according to `operation`'s kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeSchema {
    pub id: String,
    pub operation: String,
    #[serde(default)]
    pub inputs: Vec<String>,
    #[serde(default)]
    pub weights: Vec<f64>,
    pub constant_value: Option<f64>,
    pub constant_str_value: Option<String>,
    #[serde(default)]
    pub allowed_values: Option<Vec<f64>>,
    #[serde(default)]
    pub allowed_str_values: Option<Vec<String>>,
    #[serde(default)]
    pub conditional_values: IndexMap<String, f64>,
    #[serde(default)]
    pub metadata: NodeMetadataSchema,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodeMetadataSchema {
    pub name: Option<String>,
    pub description: Option<String>,
    pub position_x: Option<f64>,
    pub position_y: Option<f64>,
}

/// Sanitizes a model name into a package identifier: lowercase, with
/// dashes mapped to underscores (spec.md section 6).
///
/// Any character that is not `[a-z0-9_]` after lowercasing is also mapped
/// to `_`, since a package directory name must be a valid identifier on
/// every target host-language ecosystem this engine emits for; spec.md
/// only names the dash case explicitly but a production sanitizer used by
/// both `zigdag-pybind` and `xtask` cannot stop there.
pub fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            let lower = c.to_ascii_lowercase();
            if lower.is_ascii_alphanumeric() || lower == '_' {
                lower
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_replaces_dashes() {
        assert_eq!(sanitize_name("Open-Pricing"), "open_pricing");
    }

    #[test]
    fn sanitize_replaces_other_punctuation() {
        assert_eq!(sanitize_name("my model v2!"), "my_model_v2_");
    }

    #[test]
    fn sanitized_package_name_is_stable() {
        insta::assert_snapshot!(sanitize_name("Open-Pricing"), @"open_pricing");
    }

    #[test]
    fn parses_minimal_model() {
        let json = r#"{
            "name": "demo",
            "version": "0.1.0",
            "nodes": [
                {"id": "a", "operation": "constant_input_num", "constant_value": 1.0}
            ]
        }"#;
        let model: ModelSchema = serde_json::from_str(json).unwrap();
        assert_eq!(model.nodes.len(), 1);
        assert_eq!(model.nodes[0].id, "a");
    }
}
