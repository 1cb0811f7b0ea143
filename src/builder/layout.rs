//! Artifact location.
//!
//! Predicts where the generator places the compiled library. The per-config
//! directory names (`Release`, `Debug-iphoneos`, ...) are whatever the
//! generator emits for that platform and must track its conventions exactly.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::builder::recipe::{recipe, OutputLayout, LIBRARY_NAME};
use crate::core::error::FIND_BUILT_ARTIFACT;
use crate::core::{ParameterSet, PipelineError, PipelineResult};

/// Paths and naming components for one built library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildInfo {
    /// Absolute repository root.
    pub root_directory: PathBuf,
    /// `root/build/{platform}/{arch}/{config}`
    pub build_directory: PathBuf,
    /// Where the build tool is expected to leave the library.
    pub artifact_path: PathBuf,
    /// `.lib` or `.a`
    pub artifact_extension: String,
    /// `""` or `"lib"`
    pub artifact_name_prefix: String,
    /// Public headers, copied on export.
    pub headers_directory: PathBuf,
    /// Library sources, copied on export.
    pub sources_directory: PathBuf,
}

impl BuildInfo {
    /// `{prefix}marl{ext}`
    pub fn artifact_file_name(&self) -> String {
        format!(
            "{}{}{}",
            self.artifact_name_prefix, LIBRARY_NAME, self.artifact_extension
        )
    }

    /// Check that the build tool actually produced the artifact.
    ///
    /// A missing file after a successful build means the generator's output
    /// layout no longer matches [`locate`].
    pub fn verify_artifact(&self) -> PipelineResult<()> {
        if self.artifact_path.is_file() {
            return Ok(());
        }
        Err(PipelineError::ExportIo {
            op: FIND_BUILT_ARTIFACT,
            path: self.artifact_path.clone(),
            source: std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "the build reported success but produced no library here",
            ),
        })
    }
}

/// `root/build/{platform}/{arch}/{config}`
pub fn build_directory(params: &ParameterSet, root: &Path) -> PathBuf {
    root.join("build")
        .join(params.platform.as_str())
        .join(params.arch.as_str())
        .join(params.config.as_str())
}

/// Compute the [`BuildInfo`] for `params` under `root`.
///
/// Unsupported platforms are rejected when the [`ParameterSet`] is parsed, so
/// this never fails.
pub fn locate(params: &ParameterSet, root: &Path) -> BuildInfo {
    let recipe = recipe(params.platform);
    let build_dir = build_directory(params, root);

    let output_dir = match recipe.layout {
        OutputLayout::PerConfig { suffix } => {
            build_dir.join(format!("{}{}", params.config.label(), suffix))
        }
        OutputLayout::Flat => build_dir.clone(),
    };

    BuildInfo {
        root_directory: root.to_path_buf(),
        artifact_path: output_dir.join(recipe.library_file_name()),
        build_directory: build_dir,
        artifact_extension: recipe.extension.to_string(),
        artifact_name_prefix: recipe.prefix.to_string(),
        headers_directory: root.join("include"),
        sources_directory: root.join("src"),
    }
}
