//! Uploaded-file bookkeeping and content aggregation.
//!
//! The file list is session-only: paths are held in insertion order, duplicates
//! are dropped on add, and contents are read fresh at invocation time. A file
//! that fails to read is annotated inline instead of aborting the batch.

use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Default)]
pub struct FileSet {
    paths: Vec<PathBuf>,
}

impl FileSet {
    pub fn new() -> Self {
        FileSet { paths: Vec::new() }
    }

    /// Appends a path unless an equal one is already present.
    /// Returns whether the path was added.
    pub fn add(&mut self, path: PathBuf) -> bool {
        if self.paths.contains(&path) {
            return false;
        }
        self.paths.push(path);
        true
    }

    /// Removes exactly the given zero-based indices; out-of-range indices are
    /// ignored. Removal runs highest-first so earlier indices stay valid.
    pub fn remove_indices(&mut self, indices: &[usize]) -> usize {
        let mut sorted: Vec<usize> = indices.to_vec();
        sorted.sort_unstable();
        sorted.dedup();

        let mut removed = 0;
        for i in sorted.into_iter().rev() {
            if i < self.paths.len() {
                self.paths.remove(i);
                removed += 1;
            }
        }
        removed
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

fn basename(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Concatenates file contents in input order, each block introduced by a
/// `--- File: <name> ---` header. Read failures become annotated headers;
/// this never fails and never skips the rest of the list.
pub fn aggregate(paths: &[PathBuf]) -> String {
    let mut out = String::new();

    for path in paths {
        match fs::read_to_string(path) {
            Ok(contents) => {
                out.push_str(&format!("\n\n--- File: {} ---\n", basename(path)));
                out.push_str(&contents);
            }
            Err(e) => {
                out.push_str(&format!(
                    "\n\n--- File: {} (Error reading file: {}) ---\n",
                    basename(path),
                    e
                ));
            }
        }
    }

    out
}
