//! Serialization module for writing the merged descriptor as YAML or JSON.
//!
//! The middleware always serves JSON; these helpers back the command line, where the
//! descriptor can be inspected or committed without running a server.

use crate::descriptor::Descriptor;
use crate::error::{Error, Result};
use log::debug;
use std::fs;
use std::path::Path;

/// Serializes a descriptor to YAML format.
///
/// # Errors
///
/// Returns an error if serialization fails.
///
/// # Example
///
/// ```
/// use swagger_from_comments::descriptor::DocRegistry;
/// use swagger_from_comments::serializer::serialize_yaml;
///
/// let registry = DocRegistry::new("2.0".to_string(), "/api".to_string(), None);
/// let yaml = serialize_yaml(&registry.descriptor()).unwrap();
/// assert!(yaml.contains("basePath: /api"));
/// ```
pub fn serialize_yaml(doc: &Descriptor) -> Result<String> {
    debug!("Serializing descriptor to YAML");
    Ok(serde_yaml::to_string(doc)?)
}

/// Serializes a descriptor to JSON format with pretty printing.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn serialize_json(doc: &Descriptor) -> Result<String> {
    debug!("Serializing descriptor to JSON");
    Ok(serde_json::to_string_pretty(doc)?)
}

/// Writes string content to a file.
///
/// Creates the file if it doesn't exist, or overwrites it if it does. Parent directories are
/// created as needed.
///
/// # Errors
///
/// Returns an error if a directory or the file cannot be created or written to.
pub fn write_to_file(content: &str, path: &Path) -> Result<()> {
    debug!("Writing content to file: {}", path.display());

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    fs::write(path, content).map_err(|e| Error::io(path, e))?;

    debug!("Successfully wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}
