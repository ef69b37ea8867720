//! Node-type → category tables.

use crate::error::MappingError;
use codeintel_core::Category;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Per-language table translating parser node types into [`Category`] values.
///
/// Serialized as a flat JSON object: `{ "identifier": "Name", "string_content": "String" }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeMapping(BTreeMap<String, Category>);

impl NodeMapping {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Category for `node_type`, if mapped.
    pub fn get(&self, node_type: &str) -> Option<Category> {
        self.0.get(node_type).copied()
    }

    /// Map `node_type` to `category`, returning the previous category.
    pub fn insert(&mut self, node_type: impl Into<String>, category: Category) -> Option<Category> {
        self.0.insert(node_type.into(), category)
    }

    /// Remove `node_type` from the mapping.
    pub fn remove(&mut self, node_type: &str) -> Option<Category> {
        self.0.remove(node_type)
    }

    /// Whether `node_type` is mapped.
    pub fn contains(&self, node_type: &str) -> bool {
        self.0.contains_key(node_type)
    }

    /// Number of mapped node types.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the mapping is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate mapped node types in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Category)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Decode a mapping from JSON.
    pub fn from_json_str(json: &str) -> Result<Self, MappingError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a JSON mapping file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, MappingError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Encode as pretty-printed JSON (handy for refining a bootstrapped mapping by hand).
    pub fn to_json_pretty(&self) -> Result<String, MappingError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl<S: Into<String>> FromIterator<(S, Category)> for NodeMapping {
    fn from_iter<I: IntoIterator<Item = (S, Category)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl<const N: usize> From<[(&str, Category); N]> for NodeMapping {
    fn from(entries: [(&str, Category); N]) -> Self {
        entries.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapping_json_round_trip() {
        let mapping = NodeMapping::from([
            ("identifier", Category::Name),
            ("line_comment", Category::Comment),
        ]);
        let json = mapping.to_json_pretty().unwrap();
        assert!(json.contains("\"identifier\": \"Name\""));
        assert_eq!(NodeMapping::from_json_str(&json).unwrap(), mapping);
    }

    #[test]
    fn test_mapping_rejects_unknown_category() {
        let err = NodeMapping::from_json_str(r#"{ "identifier": "Purple" }"#).unwrap_err();
        assert!(matches!(err, MappingError::Json(_)));
    }
}
