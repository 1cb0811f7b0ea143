//! Export manifests.
//!
//! Exporters first compute a manifest, then apply it. Every file entry copies
//! the single resolved artifact; tree entries copy the header and source
//! directories.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::core::error::FIND_EXPORT_SOURCE;
use crate::core::{PipelineError, PipelineResult};
use crate::util::fs::{copy_dir_all, copy_file, ensure_dir};

/// What an entry copies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// A single file (always the built library).
    File,
    /// A directory tree, merged into the destination.
    Tree,
}

/// One copy operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportEntry {
    pub kind: EntryKind,
    pub source: PathBuf,
    pub destination: PathBuf,
}

/// The copies one export scheme performs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportManifest {
    /// Scheme name (`canonical` or `alias`).
    pub scheme: &'static str,
    /// Directories created before any copy.
    pub directories: Vec<PathBuf>,
    pub entries: Vec<ExportEntry>,
}

impl ExportManifest {
    pub fn new(scheme: &'static str) -> Self {
        ExportManifest {
            scheme,
            directories: Vec::new(),
            entries: Vec::new(),
        }
    }

    /// Create `dir` before copying.
    pub fn directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.directories.push(dir.into());
        self
    }

    /// Copy `source` to `destination`.
    pub fn file(mut self, source: &Path, destination: impl Into<PathBuf>) -> Self {
        self.entries.push(ExportEntry {
            kind: EntryKind::File,
            source: source.to_path_buf(),
            destination: destination.into(),
        });
        self
    }

    /// Merge the tree at `source` into `destination`.
    pub fn tree(mut self, source: &Path, destination: impl Into<PathBuf>) -> Self {
        self.entries.push(ExportEntry {
            kind: EntryKind::Tree,
            source: source.to_path_buf(),
            destination: destination.into(),
        });
        self
    }

    /// Destinations of all file entries.
    pub fn files(&self) -> impl Iterator<Item = &Path> {
        self.entries
            .iter()
            .filter(|e| e.kind == EntryKind::File)
            .map(|e| e.destination.as_path())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fail if any source is missing, before anything is written.
    pub fn check_sources(&self) -> PipelineResult<()> {
        for entry in &self.entries {
            let present = match entry.kind {
                EntryKind::File => entry.source.is_file(),
                EntryKind::Tree => entry.source.is_dir(),
            };
            if !present {
                return Err(PipelineError::ExportIo {
                    op: FIND_EXPORT_SOURCE,
                    path: entry.source.clone(),
                    source: std::io::Error::new(
                        std::io::ErrorKind::NotFound,
                        "expected build output is missing",
                    ),
                });
            }
        }
        Ok(())
    }

    /// Perform every copy in order.
    pub fn apply(&self) -> PipelineResult<()> {
        self.check_sources()?;

        for dir in &self.directories {
            ensure_dir(dir).map_err(PipelineError::export)?;
        }

        for entry in &self.entries {
            match entry.kind {
                EntryKind::File => {
                    copy_file(&entry.source, &entry.destination).map_err(PipelineError::export)?;
                }
                EntryKind::Tree => {
                    let copied = copy_dir_all(&entry.source, &entry.destination)
                        .map_err(PipelineError::export)?;
                    tracing::debug!(
                        "merged {} files into {}",
                        copied,
                        entry.destination.display()
                    );
                }
            }
            tracing::debug!(
                "{}: {} -> {}",
                self.scheme,
                entry.source.display(),
                entry.destination.display()
            );
        }
        Ok(())
    }
}
