//! Per-platform build recipes.
//!
//! All platform-dependent knowledge lives in the recipe rows below. The toolchain
//! resolver and the artifact locator both read from it, so adding a platform
//! means adding a row here rather than a new branch in either of them.

use crate::core::{Architecture, Platform};

/// Base name of the library target.
pub const LIBRARY_NAME: &str = "marl";

/// How the CMake generator name is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratorSpec {
    /// `Visual Studio {version} {year}`, year looked up in [`VS_YEARS`].
    VisualStudio,
    /// A generator name used verbatim.
    Fixed(&'static str),
}

/// Where the toolchain file comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolchainSpec {
    /// Host toolchain, no extra arguments.
    Host,
    /// `{ANDROID_NDK_ROOT}/build/cmake/android.toolchain.cmake` plus ABI and API level.
    AndroidNdk,
    /// Toolchain file shipped in the repository, plus a `PLATFORM` define.
    Repository {
        path: &'static str,
        /// Architecture built as a combined simulator + device library.
        combined_arch: Architecture,
        combined_platform: &'static str,
        device_platform: &'static str,
    },
}

/// Output directory layout the generator produces under the build directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputLayout {
    /// Multi-config generators: `{build_dir}/{Debug|Release}{suffix}/`.
    PerConfig { suffix: &'static str },
    /// Single-config generators write straight into the build directory.
    Flat,
}

/// Everything needed to build and locate the library on one platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformRecipe {
    pub platform: Platform,
    pub generator: GeneratorSpec,
    pub toolchain: ToolchainSpec,
    pub prefix: &'static str,
    pub extension: &'static str,
    pub layout: OutputLayout,
}

/// Visual Studio major version to release year. Unlisted versions use [`VS_LATEST_YEAR`].
pub const VS_YEARS: &[(u32, &str)] = &[(16, "2019")];

/// Year label for any Visual Studio version not in [`VS_YEARS`].
pub const VS_LATEST_YEAR: &str = "2022";

pub static WINDOWS: PlatformRecipe = PlatformRecipe {
    platform: Platform::Windows,
    generator: GeneratorSpec::VisualStudio,
    toolchain: ToolchainSpec::Host,
    prefix: "",
    extension: ".lib",
    layout: OutputLayout::PerConfig { suffix: "" },
};

pub static MACOS: PlatformRecipe = PlatformRecipe {
    platform: Platform::Macos,
    generator: GeneratorSpec::Fixed("Xcode"),
    toolchain: ToolchainSpec::Host,
    prefix: "lib",
    extension: ".a",
    layout: OutputLayout::PerConfig { suffix: "" },
};

pub static ANDROID: PlatformRecipe = PlatformRecipe {
    platform: Platform::Android,
    generator: GeneratorSpec::Fixed("Unix Makefiles"),
    toolchain: ToolchainSpec::AndroidNdk,
    prefix: "lib",
    extension: ".a",
    layout: OutputLayout::Flat,
};

pub static IOS: PlatformRecipe = PlatformRecipe {
    platform: Platform::Ios,
    generator: GeneratorSpec::Fixed("Xcode"),
    toolchain: ToolchainSpec::Repository {
        path: "cmake/ios.toolchain.cmake",
        combined_arch: Architecture::X86_64,
        combined_platform: "OS64COMBINED",
        device_platform: "OS64",
    },
    prefix: "lib",
    extension: ".a",
    layout: OutputLayout::PerConfig { suffix: "-iphoneos" },
};

/// Look up the recipe for a platform.
pub fn recipe(platform: Platform) -> &'static PlatformRecipe {
    match platform {
        Platform::Windows => &WINDOWS,
        Platform::Macos => &MACOS,
        Platform::Android => &ANDROID,
        Platform::Ios => &IOS,
    }
}

/// Year label for a Visual Studio major version.
pub fn vs_year(version: u32) -> &'static str {
    VS_YEARS
        .iter()
        .find(|(v, _)| *v == version)
        .map(|(_, year)| *year)
        .unwrap_or(VS_LATEST_YEAR)
}

impl PlatformRecipe {
    /// File name of the built library, e.g. `libmarl.a`.
    pub fn library_file_name(&self) -> String {
        format!("{}{}{}", self.prefix, LIBRARY_NAME, self.extension)
    }
}
