//! Canonical export layout.
//!
//! ```text
//! build/export/libs/{config}/marl.{platform}.{arch}{ext}
//! build/export/include/**
//! build/export/src/**
//! ```

use crate::builder::layout::BuildInfo;
use crate::builder::recipe::LIBRARY_NAME;
use crate::core::{ParameterSet, PipelineResult};
use crate::export::manifest::ExportManifest;

pub const SCHEME: &str = "canonical";

/// Compute the canonical export manifest.
pub fn plan(info: &BuildInfo, params: &ParameterSet) -> ExportManifest {
    let export_root = info.root_directory.join("build").join("export");
    let libs_dir = export_root.join("libs").join(params.config.as_str());
    let file_name = format!(
        "{}.{}.{}{}",
        LIBRARY_NAME, params.platform, params.arch, info.artifact_extension
    );

    ExportManifest::new(SCHEME)
        .directory(&libs_dir)
        .file(&info.artifact_path, libs_dir.join(file_name))
        .tree(&info.headers_directory, export_root.join("include"))
        .tree(&info.sources_directory, export_root.join("src"))
}

/// Copy the artifact, headers and sources into the canonical layout.
pub fn export(info: &BuildInfo, params: &ParameterSet) -> PipelineResult<ExportManifest> {
    let manifest = plan(info, params);
    manifest.apply()?;
    Ok(manifest)
}
