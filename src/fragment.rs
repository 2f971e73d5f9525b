//! Descriptor fragments and the `@swagger` tag loader.

use crate::doc_tags::Tag;
use crate::error::{Error, Result};
use log::debug;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Title of the doc tag whose body is a descriptor fragment.
pub const SWAGGER_TAG: &str = "swagger";

/// Operations of one path, keyed by lowercase HTTP method.
pub type Operations = BTreeMap<String, Value>;

/// A partial `path -> method -> operation` map.
///
/// Operation objects are opaque and passed through untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fragment {
    pub paths: BTreeMap<String, Operations>,
}

impl Fragment {
    /// Converts a parsed document into a fragment.
    ///
    /// A `null` document (e.g. an empty file or a trailing `---`) carries nothing and yields
    /// `Ok(None)`. A path whose value is `null` has no operations.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidFragment`] when the document is not a mapping, or when a path
    /// maps to something other than a mapping of methods.
    pub fn from_value(value: Value) -> Result<Option<Fragment>> {
        let map = match value {
            Value::Null => return Ok(None),
            Value::Object(map) => map,
            other => {
                return Err(Error::InvalidFragment(format!(
                    "expected a mapping of paths, found {}",
                    kind(&other)
                )))
            }
        };

        let mut paths = BTreeMap::new();
        for (path, methods) in map {
            let operations = match methods {
                Value::Null => Operations::new(),
                Value::Object(methods) => methods.into_iter().collect(),
                other => {
                    return Err(Error::InvalidFragment(format!(
                        "path `{}` must map to methods, found {}",
                        path,
                        kind(&other)
                    )))
                }
            };
            paths.insert(path, operations);
        }

        Ok(Some(Fragment { paths }))
    }
}

/// Looks for the `@swagger` tag and parses its body.
///
/// Only the first matching tag is used. Returns `Ok(None)` when the block has no such tag;
/// callers skip it and move on.
///
/// # Errors
///
/// Returns an error if the tag body is not valid YAML or not fragment-shaped.
pub fn load_fragments(tags: &[Tag]) -> Result<Option<Vec<Fragment>>> {
    let Some(tag) = tags.iter().find(|t| t.title == SWAGGER_TAG) else {
        return Ok(None);
    };

    parse_yaml_stream(&tag.description).map(Some)
}

/// Parses a multi-document YAML stream, one fragment per non-null document.
pub fn parse_yaml_stream(text: &str) -> Result<Vec<Fragment>> {
    let mut fragments = Vec::new();

    for document in serde_yaml::Deserializer::from_str(text) {
        let value = Value::deserialize(document)?;
        if let Some(fragment) = Fragment::from_value(value)? {
            fragments.push(fragment);
        }
    }

    debug!("Parsed {} fragment documents", fragments.len());
    Ok(fragments)
}

/// Parses a single YAML (or JSON) document as one fragment.
pub fn parse_yaml_document(text: &str) -> Result<Option<Fragment>> {
    if text.trim().is_empty() {
        return Ok(None);
    }
    let value: Value = serde_yaml::from_str(text)?;
    Fragment::from_value(value)
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}
