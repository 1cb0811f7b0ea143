//! Test utilities for marl-export unit tests.
//!
//! Provides a stub CMake that lays out build output the way the real
//! generators do, and a fixture repository on disk.
//!
//! # Example
//!
//! ```rust,ignore
//! use marl_export::test_support::{RepoFixture, StubCMake};
//!
//! #[test]
//! fn test_example() {
//!     let repo = RepoFixture::new();
//!     let mut cmake = StubCMake::new();
//!     // Run the orchestrator against repo.root() with &mut cmake...
//!     assert_eq!(cmake.calls().len(), 2);
//! }
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Output};

use anyhow::{bail, Result};
use tempfile::TempDir;

use crate::util::process::{CommandRunner, ProcessBuilder};

/// Build an `ExitStatus` carrying `code`.
pub fn exit_status(code: i32) -> ExitStatus {
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        ExitStatus::from_raw(code << 8)
    }
    #[cfg(windows)]
    {
        use std::os::windows::process::ExitStatusExt;
        ExitStatus::from_raw(code as u32)
    }
}

fn output(code: i32, stdout: &str, stderr: &str) -> Output {
    Output {
        status: exit_status(code),
        stdout: stdout.as_bytes().to_vec(),
        stderr: stderr.as_bytes().to_vec(),
    }
}

/// What the stub remembers about a configured build directory.
#[derive(Debug, Clone)]
struct ConfiguredTree {
    generator: String,
    sdk_suffix: &'static str,
}

/// A stand-in for the `cmake` executable.
///
/// It knows nothing about the resolver's tables: it derives the output layout
/// purely from the arguments it receives, mimicking the real generators.
/// Multi-config generators (Visual Studio, Xcode) write into a per-config
/// subdirectory, with `-iphoneos` appended when an iOS `PLATFORM` was given;
/// Makefile generators write into the build directory itself.
#[derive(Debug, Default)]
pub struct StubCMake {
    calls: Vec<ProcessBuilder>,
    configured: HashMap<PathBuf, ConfiguredTree>,
    configure_exit: Option<i32>,
    build_exit: Option<i32>,
    skip_artifact: bool,
    missing: bool,
}

impl StubCMake {
    /// Create a stub where every step succeeds.
    pub fn new() -> Self {
        StubCMake::default()
    }

    /// Make the configure step exit with `code`.
    pub fn fail_configure(mut self, code: i32) -> Self {
        self.configure_exit = Some(code);
        self
    }

    /// Make the build step exit with `code`.
    pub fn fail_build(mut self, code: i32) -> Self {
        self.build_exit = Some(code);
        self
    }

    /// Report success from the build step without writing the library.
    pub fn without_artifact(mut self) -> Self {
        self.skip_artifact = true;
        self
    }

    /// Pretend cmake is not installed.
    pub fn not_installed(mut self) -> Self {
        self.missing = true;
        self
    }

    /// All invocations, in order.
    pub fn calls(&self) -> &[ProcessBuilder] {
        &self.calls
    }

    fn configure(&mut self, args: &[String]) -> Result<Output> {
        let build_dir = value_after(args, "-B")?;
        let generator = value_after(args, "-G")?;
        if !Path::new(&build_dir).is_dir() {
            bail!("build directory {} does not exist", build_dir);
        }

        let sdk_suffix = if args.iter().any(|a| a.starts_with("-DPLATFORM=OS64")) {
            "-iphoneos"
        } else {
            ""
        };

        if let Some(code) = self.configure_exit {
            return Ok(output(code, "", "CMake Error: stub configure failure"));
        }

        self.configured.insert(
            PathBuf::from(build_dir),
            ConfiguredTree {
                generator: generator.clone(),
                sdk_suffix,
            },
        );
        Ok(output(0, &format!("-- Generating done ({})", generator), ""))
    }

    fn build(&mut self, args: &[String]) -> Result<Output> {
        let build_dir = PathBuf::from(value_after(args, "--build")?);
        let label = value_after(args, "--config")?;

        let Some(tree) = self.configured.get(&build_dir) else {
            return Ok(output(1, "", "Error: could not load cache"));
        };

        if let Some(code) = self.build_exit {
            return Ok(output(code, "", "error: stub build failure"));
        }

        let multi_config = tree.generator.starts_with("Visual Studio") || tree.generator == "Xcode";
        let out_dir = if multi_config {
            build_dir.join(format!("{}{}", label, tree.sdk_suffix))
        } else {
            build_dir.clone()
        };
        let name = if tree.generator.starts_with("Visual Studio") {
            "marl.lib"
        } else {
            "libmarl.a"
        };

        if !self.skip_artifact {
            fs::create_dir_all(&out_dir)?;
            fs::write(
                out_dir.join(name),
                format!("{}|{}", tree.generator, label).as_bytes(),
            )?;
        }
        Ok(output(0, "[100%] Built target marl", ""))
    }
}

impl CommandRunner for StubCMake {
    fn run(&mut self, cmd: &ProcessBuilder) -> Result<Output> {
        self.calls.push(cmd.clone());
        let args = cmd.get_args().to_vec();
        if args.first().map(String::as_str) == Some("--build") {
            self.build(&args)
        } else {
            self.configure(&args)
        }
    }

    fn find_program(&self, program: &Path) -> Option<PathBuf> {
        if self.missing {
            None
        } else {
            Some(program.to_path_buf())
        }
    }
}

fn value_after(args: &[String], flag: &str) -> Result<String> {
    match args.iter().position(|a| a == flag) {
        Some(i) if i + 1 < args.len() => Ok(args[i + 1].clone()),
        _ => bail!("missing `{}` in {:?}", flag, args),
    }
}

/// A repository on disk shaped like the marl source tree.
pub struct RepoFixture {
    dir: TempDir,
}

impl RepoFixture {
    /// Create the fixture with a CMakeLists.txt, headers, sources and the
    /// iOS toolchain file.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        let root = dir.path();

        let files: &[(&str, &str)] = &[
            ("CMakeLists.txt", "cmake_minimum_required(VERSION 3.10)\nproject(marl)\n"),
            ("include/marl/scheduler.h", "#pragma once\nnamespace marl { class Scheduler; }\n"),
            ("include/marl/defer.h", "#pragma once\n"),
            ("src/scheduler.cpp", "#include \"marl/scheduler.h\"\n"),
            ("src/osfiber_asm_aarch64.S", "// asm\n"),
            ("cmake/ios.toolchain.cmake", "# ios toolchain\n"),
        ];
        for (rel, contents) in files {
            let path = root.join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, contents).unwrap();
        }

        RepoFixture { dir }
    }

    /// Repository root.
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Write a fake library at `path`.
    pub fn write_artifact(&self, path: &Path, contents: &[u8]) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }
}

impl Default for RepoFixture {
    fn default() -> Self {
        RepoFixture::new()
    }
}

/// Sorted list of file paths under `dir`, relative to it.
pub fn list_files(dir: &Path) -> Vec<String> {
    let mut files: Vec<String> = walkdir::WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            e.path()
                .strip_prefix(dir)
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect();
    files.sort();
    files
}
