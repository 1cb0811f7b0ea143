//! Toolchain resolution.
//!
//! Maps a [`ParameterSet`] to the generator, the toolchain-injection
//! arguments, and the configuration label for the build step. Pure: the only
//! environment input is the [`ToolchainEnv`] snapshot passed in.

use std::path::Path;

use serde::Serialize;

use crate::builder::recipe::{recipe, vs_year, GeneratorSpec, ToolchainSpec};
use crate::core::{ParameterSet, PipelineError, PipelineResult};
use crate::util::context::{ToolchainEnv, ANDROID_NDK_ROOT};

/// Resolved generator and arguments for one parameter set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedToolchain {
    /// CMake generator name passed with `-G`.
    pub generator: String,
    /// Extra `-D` arguments for the configure step, in order. The last one is
    /// always `-DCMAKE_BUILD_TYPE={configuration}` (lowercase).
    pub toolchain_args: Vec<String>,
    /// Configuration label for `cmake --build --config` (capitalized).
    pub build_config_label: String,
}

/// Resolves toolchain arguments against a repository root.
#[derive(Debug, Clone, Copy)]
pub struct ToolchainResolver<'a> {
    root: &'a Path,
    env: &'a ToolchainEnv,
}

impl<'a> ToolchainResolver<'a> {
    pub fn new(root: &'a Path, env: &'a ToolchainEnv) -> Self {
        ToolchainResolver { root, env }
    }

    /// Resolve the toolchain for `params`.
    pub fn resolve(&self, params: &ParameterSet) -> PipelineResult<ResolvedToolchain> {
        let recipe = recipe(params.platform);

        let generator = match recipe.generator {
            GeneratorSpec::VisualStudio => format!(
                "Visual Studio {} {}",
                params.vs_version,
                vs_year(params.vs_version)
            ),
            GeneratorSpec::Fixed(name) => name.to_string(),
        };

        let mut toolchain_args = match recipe.toolchain {
            ToolchainSpec::Host => Vec::new(),
            ToolchainSpec::AndroidNdk => {
                let ndk_root = self.env.android_ndk_root.as_ref().ok_or_else(|| {
                    PipelineError::MissingEnvironment {
                        var: ANDROID_NDK_ROOT.to_string(),
                    }
                })?;
                let toolchain_file = ndk_root
                    .join("build")
                    .join("cmake")
                    .join("android.toolchain.cmake");
                vec![
                    toolchain_file_arg(&toolchain_file),
                    format!("-DANDROID_ABI={}", params.arch),
                    format!("-DANDROID_NATIVE_API_LEVEL={}", params.android_api_level),
                ]
            }
            ToolchainSpec::Repository {
                path,
                combined_arch,
                combined_platform,
                device_platform,
            } => {
                let platform = if params.arch == combined_arch {
                    combined_platform
                } else {
                    device_platform
                };
                vec![
                    toolchain_file_arg(&self.root.join(path)),
                    format!("-DPLATFORM={}", platform),
                ]
            }
        };

        // Generation uses the lowercase name; the build step uses the label.
        toolchain_args.push(format!("-DCMAKE_BUILD_TYPE={}", params.config.as_str()));

        tracing::debug!(
            "resolved toolchain for {}: -G \"{}\" {}",
            params,
            generator,
            toolchain_args.join(" ")
        );

        Ok(ResolvedToolchain {
            generator,
            toolchain_args,
            build_config_label: params.config.label().to_string(),
        })
    }
}

fn toolchain_file_arg(path: &Path) -> String {
    format!("-DCMAKE_TOOLCHAIN_FILE:PATH={}", path.display())
}
