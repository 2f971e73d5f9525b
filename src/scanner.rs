use crate::source::SourceFile;
use log::{debug, warn};
use std::path::PathBuf;
use walkdir::WalkDir;

/// Directory names never descended into
const SKIPPED_DIRS: &[&str] = &["target", "node_modules"];

/// Directory scanner for API source trees.
///
/// The `FileScanner` recursively walks a directory and collects every file whose extension
/// one of the source dialects understands. Build output (`target`, `node_modules`) and hidden
/// directories (those starting with `.`) are skipped.
///
/// # Example
///
/// ```no_run
/// use swagger_from_comments::scanner::FileScanner;
/// use std::path::PathBuf;
///
/// let scanner = FileScanner::new(PathBuf::from("./routes"));
/// let result = scanner.scan();
/// println!("Found {} API sources", result.source_files.len());
/// ```
pub struct FileScanner {
    root_path: PathBuf,
}

/// Result of directory scanning operation.
///
/// Contains the discovered API source files and any warnings encountered during scanning.
pub struct ScanResult {
    /// Supported source files, sorted by path
    pub source_files: Vec<PathBuf>,
    /// Warning messages for any issues encountered (e.g., inaccessible directories)
    pub warnings: Vec<String>,
}

impl FileScanner {
    /// Creates a new `FileScanner` for the specified root directory.
    pub fn new(root_path: PathBuf) -> Self {
        Self { root_path }
    }

    /// Scans the directory tree and collects supported source files.
    ///
    /// Inaccessible entries are logged and recorded as warnings; scanning continues past them.
    /// The result is sorted so that merge order does not depend on the file system.
    pub fn scan(&self) -> ScanResult {
        let mut source_files = Vec::new();
        let mut warnings = Vec::new();

        for entry in WalkDir::new(&self.root_path)
            .into_iter()
            .filter_entry(|e| {
                // Don't filter the root directory itself
                if e.path() == self.root_path {
                    return true;
                }

                let file_name = e.file_name().to_string_lossy();
                let is_hidden = file_name.starts_with('.');
                let is_skipped =
                    e.file_type().is_dir() && SKIPPED_DIRS.iter().any(|d| *d == file_name);

                !is_hidden && !is_skipped
            })
        {
            match entry {
                Ok(entry) => {
                    let path = entry.path();
                    if path.is_file() && SourceFile::is_supported(path) {
                        source_files.push(path.to_path_buf());
                    }
                }
                Err(e) => {
                    let warning = format!("Failed to access path: {}", e);
                    warn!("{}", warning);
                    warnings.push(warning);
                }
            }
        }

        source_files.sort();

        ScanResult {
            source_files,
            warnings,
        }
    }
}

/// Expands directory entries of an `apis` list, keeping the list order.
///
/// Plain file entries pass through untouched, whatever their extension, so an unsupported
/// file is still reported when its turn comes.
pub fn expand_apis(entries: &[PathBuf]) -> Vec<PathBuf> {
    let mut expanded = Vec::new();

    for entry in entries {
        if entry.is_dir() {
            let result = FileScanner::new(entry.clone()).scan();
            debug!(
                "Expanded {} into {} sources",
                entry.display(),
                result.source_files.len()
            );
            expanded.extend(result.source_files);
        } else {
            expanded.push(entry.clone());
        }
    }

    expanded
}
