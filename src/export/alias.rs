//! Engine-integration alias export.
//!
//! The downstream engine binding looks libraries up by its own naming
//! convention, so the same artifact is copied under several names:
//!
//! ```text
//! build/export/gdcompatible_libs/{prefix}marl.{platform}.{config}.{arch}{ext}
//! build/export/gdcompatible_libs/{prefix}marl.{platform}.{config}.dev.{arch}{ext}
//! build/export/gdcompatible_libs/{prefix}marl.{platform}.editor.{arch}{ext}      (release only)
//! build/export/gdcompatible_libs/{prefix}marl.{platform}.editor.dev.{arch}{ext}  (release only)
//! ```
//!
//! The vocabulary here is kept in its own functions even where it currently
//! matches the internal names, so the two can change independently.

use crate::builder::layout::BuildInfo;
use crate::builder::recipe::LIBRARY_NAME;
use crate::core::{Architecture, Configuration, ParameterSet, Platform, PipelineResult};
use crate::export::manifest::ExportManifest;

pub const SCHEME: &str = "alias";

/// Directory under `build/export` holding the aliased copies.
pub const ALIAS_DIR: &str = "gdcompatible_libs";

const EDITOR: &str = "editor";
const DEV: &str = "dev";

pub fn platform_name(platform: Platform) -> &'static str {
    match platform {
        Platform::Windows => "windows",
        Platform::Macos => "macos",
        Platform::Android => "android",
        Platform::Ios => "ios",
    }
}

pub fn arch_name(arch: Architecture) -> &'static str {
    match arch {
        Architecture::X86 => "x86",
        Architecture::X86_64 => "x86_64",
        Architecture::ArmeabiV7a => "arm32",
        Architecture::Arm64V8a => "arm64",
    }
}

pub fn config_name(config: Configuration) -> &'static str {
    match config {
        Configuration::Debug => "template_debug",
        Configuration::Release => "template_release",
    }
}

/// Alias vocabulary for one parameter set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasNames {
    pub platform: &'static str,
    pub arch: &'static str,
    pub config: &'static str,
}

impl AliasNames {
    pub fn for_params(params: &ParameterSet) -> Self {
        AliasNames {
            platform: platform_name(params.platform),
            arch: arch_name(params.arch),
            config: config_name(params.config),
        }
    }

    /// File names to produce, in order. Release builds also serve as the
    /// editor library.
    pub fn file_names(&self, params: &ParameterSet, prefix: &str, ext: &str) -> Vec<String> {
        let mut variants = vec![vec![self.config], vec![self.config, DEV]];
        if params.config.is_release() {
            variants.push(vec![EDITOR]);
            variants.push(vec![EDITOR, DEV]);
        }

        variants
            .into_iter()
            .map(|parts| {
                format!(
                    "{}{}.{}.{}.{}{}",
                    prefix,
                    LIBRARY_NAME,
                    self.platform,
                    parts.join("."),
                    self.arch,
                    ext
                )
            })
            .collect()
    }
}

/// Compute the alias export manifest.
pub fn plan(info: &BuildInfo, params: &ParameterSet) -> ExportManifest {
    let alias_dir = info
        .root_directory
        .join("build")
        .join("export")
        .join(ALIAS_DIR);
    let names = AliasNames::for_params(params);

    names
        .file_names(params, &info.artifact_name_prefix, &info.artifact_extension)
        .into_iter()
        .fold(
            ExportManifest::new(SCHEME).directory(&alias_dir),
            |manifest, name| manifest.file(&info.artifact_path, alias_dir.join(name)),
        )
}

/// Copy the artifact under every alias name.
pub fn export(info: &BuildInfo, params: &ParameterSet) -> PipelineResult<ExportManifest> {
    let manifest = plan(info, params);
    manifest.apply()?;
    Ok(manifest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    use crate::builder::layout::locate;
    use crate::test_support::{list_files, RepoFixture};

    #[test]
    fn test_vocabulary_is_distinct() {
        let arches: Vec<_> = Architecture::ALL.iter().map(|a| arch_name(*a)).collect();
        assert_eq!(arches, ["x86", "x86_64", "arm64", "arm32"]);

        for platform in Platform::ALL {
            assert_eq!(platform_name(platform), platform.as_str());
        }
        assert_ne!(config_name(Configuration::Debug), config_name(Configuration::Release));
    }

    #[test]
    fn test_arch_mapping() {
        let params = ParameterSet::parse("android", "armeabi-v7a", "debug").unwrap();
        let names = AliasNames::for_params(&params);
        assert_eq!(names.arch, "arm32");
        assert_eq!(names.config, "template_debug");

        let params = ParameterSet::parse("ios", "arm64-v8a", "release").unwrap();
        let names = AliasNames::for_params(&params);
        assert_eq!(names.arch, "arm64");
        assert_eq!(names.platform, "ios");
        assert_eq!(names.config, "template_release");
    }

    #[test]
    fn test_debug_writes_two_files() {
        let repo = RepoFixture::new();
        let params = ParameterSet::parse("android", "arm64-v8a", "debug").unwrap();
        let info = locate(&params, repo.root());
        repo.write_artifact(&info.artifact_path, b"android-arm64");

        let manifest = export(&info, &params).unwrap();

        let alias_dir = repo.root().join("build/export").join(ALIAS_DIR);
        assert_eq!(
            list_files(&alias_dir),
            vec![
                "libmarl.android.template_debug.arm64.a",
                "libmarl.android.template_debug.dev.arm64.a",
            ]
        );
        assert_eq!(manifest.len(), 2);
        for dest in manifest.files() {
            assert_eq!(fs::read(dest).unwrap(), b"android-arm64");
        }
    }

    #[test]
    fn test_release_writes_four_files_including_editor() {
        let repo = RepoFixture::new();
        let params = ParameterSet::parse("windows", "x86_64", "release").unwrap();
        let info = locate(&params, repo.root());
        repo.write_artifact(&info.artifact_path, b"windows-x64");

        let manifest = export(&info, &params).unwrap();

        let alias_dir = repo.root().join("build/export").join(ALIAS_DIR);
        assert_eq!(
            list_files(&alias_dir),
            vec![
                "marl.windows.editor.dev.x86_64.lib",
                "marl.windows.editor.x86_64.lib",
                "marl.windows.template_release.dev.x86_64.lib",
                "marl.windows.template_release.x86_64.lib",
            ]
        );
        assert_eq!(manifest.len(), 4);
        assert!(manifest.entries.iter().all(|e| e.source == info.artifact_path));
        for dest in manifest.files() {
            assert_eq!(fs::read(dest).unwrap(), b"windows-x64");
        }
    }
}
