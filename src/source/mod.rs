//! API source files and per-dialect fragment reading.
//!
//! Every entry of the `apis` list becomes a [`SourceFile`]. The variant is picked from the file
//! extension and decides how fragments are pulled out of the file:
//!
//! - **Native** sources carry `/** @swagger ... */` blocks directly
//! - **Transpiled** sources are first normalized into native comment syntax
//!   (see [`transpile`]) and then scanned with the broader comment pattern
//! - **Structured** sources are whole YAML/JSON fragment documents
//!
//! # Example
//!
//! ```no_run
//! use swagger_from_comments::source::SourceFile;
//! use std::path::Path;
//!
//! let source = SourceFile::from_path(Path::new("routes/users.js")).unwrap();
//! let fragments = source.read_fragments().unwrap();
//! println!("Found {} fragments", fragments.len());
//! ```

pub mod transpile;

use crate::comments::{extract_blocks, CommentPattern};
use crate::doc_tags::DocComment;
use crate::error::{Error, Result};
use crate::fragment::{load_fragments, parse_yaml_document, Fragment};
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

/// Source languages that have to be normalized before comment extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    CoffeeScript,
    Rust,
}

/// One configured API source, tagged with its dialect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceFile {
    Native(PathBuf),
    Transpiled(PathBuf, Language),
    Structured(PathBuf),
}

impl SourceFile {
    /// Picks the dialect from the file extension.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedExtension`] for any extension outside the known dialects.
    pub fn from_path(path: &Path) -> Result<SourceFile> {
        let extension = path
            .extension()
            .and_then(|s| s.to_str())
            .map(|s| s.to_ascii_lowercase());
        let path = path.to_path_buf();

        match extension.as_deref() {
            Some("js") | Some("mjs") | Some("cjs") => Ok(SourceFile::Native(path)),
            Some("coffee") => Ok(SourceFile::Transpiled(path, Language::CoffeeScript)),
            Some("rs") => Ok(SourceFile::Transpiled(path, Language::Rust)),
            Some("yml") | Some("yaml") | Some("json") => Ok(SourceFile::Structured(path)),
            _ => Err(Error::UnsupportedExtension(path)),
        }
    }

    /// Returns true if `path` has an extension [`from_path`](Self::from_path) accepts
    pub fn is_supported(path: &Path) -> bool {
        Self::from_path(path).is_ok()
    }

    /// Path of the underlying file
    pub fn path(&self) -> &Path {
        match self {
            SourceFile::Native(path) | SourceFile::Transpiled(path, _) | SourceFile::Structured(path) => {
                path
            }
        }
    }

    /// Reads the file and returns its fragments in source order.
    ///
    /// # Errors
    ///
    /// Any read, comment, YAML or fragment-shape error aborts the whole file.
    pub fn read_fragments(&self) -> Result<Vec<Fragment>> {
        let path = self.path();
        debug!("Reading API source: {}", path.display());

        let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;

        let fragments = match self {
            SourceFile::Native(_) => fragments_from_comments(&content, CommentPattern::Native)?,
            SourceFile::Transpiled(_, language) => {
                let normalized = transpile::to_native(*language, &content, path)?;
                fragments_from_comments(&normalized, CommentPattern::Transpiled)?
            }
            SourceFile::Structured(_) => parse_yaml_document(&content)?.into_iter().collect(),
        };

        debug!("{} fragments in {}", fragments.len(), path.display());
        Ok(fragments)
    }
}

/// Runs extraction, tag parsing and fragment loading over comment-bearing text.
fn fragments_from_comments(text: &str, pattern: CommentPattern) -> Result<Vec<Fragment>> {
    let mut fragments = Vec::new();

    for block in extract_blocks(text, pattern) {
        let doc = DocComment::parse(&block)?;
        match load_fragments(doc.tags())? {
            Some(found) => fragments.extend(found),
            None => debug!("Comment block has no @swagger tag, skipping"),
        }
    }

    Ok(fragments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::io::Write;
    use tempfile::TempDir;

    /// Helper function to create a temporary file with content
    fn create_temp_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let file_path = dir.path().join(name);
        let mut file = fs::File::create(&file_path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file_path
    }

    #[test]
    fn test_dialect_from_extension() {
        assert!(matches!(
            SourceFile::from_path(Path::new("a/b.js")).unwrap(),
            SourceFile::Native(_)
        ));
        assert_eq!(
            SourceFile::from_path(Path::new("b.coffee")).unwrap(),
            SourceFile::Transpiled(PathBuf::from("b.coffee"), Language::CoffeeScript)
        );
        assert_eq!(
            SourceFile::from_path(Path::new("b.rs")).unwrap(),
            SourceFile::Transpiled(PathBuf::from("b.rs"), Language::Rust)
        );
        assert!(matches!(
            SourceFile::from_path(Path::new("b.YML")).unwrap(),
            SourceFile::Structured(_)
        ));
    }

    #[test]
    fn test_unsupported_extension() {
        for name in ["notes.txt", "Makefile", "page.html"] {
            let result = SourceFile::from_path(Path::new(name));
            assert!(
                matches!(result, Err(Error::UnsupportedExtension(ref p)) if p == Path::new(name)),
                "{} should be rejected",
                name
            );
        }
    }

    #[test]
    fn test_native_source_fragments() {
        let temp_dir = TempDir::new().unwrap();
        let path = create_temp_file(
            &temp_dir,
            "users.js",
            r#"
/**
 * Plain documentation, ignored.
 * @param {string} id
 */
function helper(id) {}

/**
 * @swagger
 * /users:
 *   get:
 *     summary: List users
 */
app.get('/users', list);
"#,
        );

        let fragments = SourceFile::from_path(&path).unwrap().read_fragments().unwrap();

        assert_eq!(fragments.len(), 1);
        assert_eq!(fragments[0].paths["/users"]["get"], json!({"summary": "List users"}));
    }

    #[test]
    fn test_native_source_without_markers() {
        let temp_dir = TempDir::new().unwrap();
        let path = create_temp_file(&temp_dir, "plain.js", "/** nothing here */\nvar x = 1;\n");

        let fragments = SourceFile::from_path(&path).unwrap().read_fragments().unwrap();
        assert!(fragments.is_empty());
    }

    #[test]
    fn test_structured_source_fragment() {
        let temp_dir = TempDir::new().unwrap();
        let path = create_temp_file(
            &temp_dir,
            "paths.yml",
            "/pets:\n  post:\n    responses:\n      201:\n        description: created\n",
        );

        let fragments = SourceFile::from_path(&path).unwrap().read_fragments().unwrap();

        assert_eq!(fragments.len(), 1);
        assert_eq!(
            fragments[0].paths["/pets"]["post"]["responses"]["201"]["description"],
            "created"
        );
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let source = SourceFile::from_path(Path::new("/nonexistent/routes.js")).unwrap();
        let result = source.read_fragments();

        assert!(matches!(result, Err(Error::Io { .. })));
        assert!(result.unwrap_err().to_string().contains("/nonexistent/routes.js"));
    }

    #[test]
    fn test_broken_yaml_aborts_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = create_temp_file(
            &temp_dir,
            "broken.js",
            "/**\n * @swagger\n * /a:\n *   get: [oops\n */\n/**\n * @swagger\n * /b:\n *   get: {}\n */",
        );

        let result = SourceFile::from_path(&path).unwrap().read_fragments();
        assert!(matches!(result, Err(Error::Yaml(_))));
    }
}
