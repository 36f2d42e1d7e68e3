//! File discovery.
//!
//! Walks a directory tree top-down, pruning blacklisted and hidden
//! directories before they are entered, and collects the files whose names
//! match one of the configured globs. Within one directory, files are listed
//! pattern by pattern; no sorting is applied.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobMatcher};
use indexmap::IndexMap;
use walkdir::{DirEntry, WalkDir};

use crate::error::{Result, ValidatorError};

pub const DEFAULT_MATCH: &str = "*.html";

const HIDDEN_MARKER: char = '.';

/// Collects candidate files below a root directory
#[derive(Debug, Clone)]
pub struct FileCollector {
    patterns: Vec<GlobMatcher>,
    blacklist: Vec<String>,
    skip_hidden: bool,
}

impl FileCollector {
    /// An empty `patterns` slice means `*.html`.
    pub fn new<S: AsRef<str>>(
        patterns: &[S],
        blacklist: Vec<String>,
        skip_hidden: bool,
    ) -> Result<Self> {
        let patterns = if patterns.is_empty() {
            vec![DEFAULT_MATCH]
        } else {
            patterns.iter().map(|p| p.as_ref()).collect()
        };

        let patterns = patterns
            .into_iter()
            .map(|pattern| {
                Glob::new(pattern)
                    .map(|g| g.compile_matcher())
                    .map_err(|source| ValidatorError::InvalidGlob {
                        pattern: pattern.to_string(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            patterns,
            blacklist,
            skip_hidden,
        })
    }

    /// Every matching file below `root`, in discovery order.
    ///
    /// Directories come in pre-order, and each directory's own files are
    /// listed before anything from its subdirectories.
    pub fn collect(&self, root: &Path) -> Result<Vec<PathBuf>> {
        let mut listing: IndexMap<PathBuf, Vec<OsString>> = IndexMap::new();

        let walker = WalkDir::new(root)
            .into_iter()
            .filter_entry(|entry| self.should_descend(entry));

        for entry in walker {
            let entry = entry?;
            if entry.file_type().is_dir() {
                listing.entry(entry.path().to_path_buf()).or_default();
                continue;
            }
            if is_directory_link(&entry) {
                continue;
            }
            if let Some(parent) = entry.path().parent() {
                listing
                    .entry(parent.to_path_buf())
                    .or_default()
                    .push(entry.file_name().to_os_string());
            }
        }

        let mut files = Vec::new();
        for (dir, names) in &listing {
            self.match_directory(dir, names, &mut files);
        }
        Ok(files)
    }

    /// The root itself is never pruned; below it, blacklisted names go
    /// first and hidden names second.
    fn should_descend(&self, entry: &DirEntry) -> bool {
        if entry.depth() == 0 || !entry.file_type().is_dir() {
            return true;
        }
        let name = entry.file_name().to_string_lossy();
        if self.blacklist.iter().any(|b| b.as_str() == name.as_ref()) {
            return false;
        }
        !(self.skip_hidden && name.starts_with(HIDDEN_MARKER))
    }

    fn match_directory(&self, dir: &Path, names: &[OsString], files: &mut Vec<PathBuf>) {
        for pattern in &self.patterns {
            for name in names {
                if !pattern.is_match(Path::new(name)) {
                    continue;
                }
                if self.skip_hidden && name.to_string_lossy().starts_with(HIDDEN_MARKER) {
                    continue;
                }
                files.push(dir.join(name));
            }
        }
    }
}

/// Links to directories are neither followed nor treated as files.
fn is_directory_link(entry: &DirEntry) -> bool {
    entry.path_is_symlink() && fs::metadata(entry.path()).is_ok_and(|m| m.is_dir())
}
