//! CLI integration tests for marl-export.
//!
//! These tests run the real binary against a throwaway repository. Builds
//! use a small shell script in place of CMake, so they only run on Unix.

use std::fs;
use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get the marl-export binary command.
fn marl_export() -> Command {
    Command::cargo_bin("marl-export").unwrap()
}

/// Create a minimal marl checkout.
fn repo() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();

    fs::write(root.join("CMakeLists.txt"), "project(marl)\n").unwrap();
    fs::create_dir_all(root.join("include/marl")).unwrap();
    fs::write(root.join("include/marl/scheduler.h"), "#pragma once\n").unwrap();
    fs::create_dir_all(root.join("src")).unwrap();
    fs::write(root.join("src/scheduler.cpp"), "// scheduler\n").unwrap();
    fs::create_dir_all(root.join("cmake")).unwrap();
    fs::write(root.join("cmake/ios.toolchain.cmake"), "# ios\n").unwrap();

    tmp
}

/// Command running inside `root` with home and toolchain variables isolated.
fn in_repo(root: &Path) -> Command {
    let mut cmd = marl_export();
    cmd.current_dir(root)
        .env("HOME", root)
        .env_remove("ANDROID_NDK_ROOT")
        .env_remove("MARL_EXPORT_ROOT")
        .env_remove("MARL_EXPORT_ANDROID_API_LEVEL")
        .env_remove("MARL_EXPORT_VS_VERSION");
    cmd
}

// ============================================================================
// help
// ============================================================================

#[test]
fn test_help_lists_commands() {
    marl_export()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("build"))
        .stdout(predicate::str::contains("export"))
        .stdout(predicate::str::contains("plan"))
        .stdout(predicate::str::contains("clean"));
}

#[test]
fn test_build_help_lists_parameters() {
    marl_export()
        .args(["build", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--platform"))
        .stdout(predicate::str::contains("--android-api-level"))
        .stdout(predicate::str::contains("--no-alias"));
}

// ============================================================================
// marl-export plan
// ============================================================================

#[test]
fn test_plan_windows_release() {
    let tmp = repo();

    in_repo(tmp.path())
        .args(["plan", "--platform", "windows", "--arch", "x86_64", "--config", "release"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Visual Studio 17 2022"))
        .stdout(predicate::str::contains("--config Release"))
        .stdout(predicate::str::contains("marl.lib"))
        .stdout(predicate::str::contains("marl.windows.editor.dev.x86_64.lib"));

    assert!(!tmp.path().join("build").exists());
}

#[test]
fn test_plan_vs_2019() {
    let tmp = repo();

    in_repo(tmp.path())
        .args(["plan", "--vs-version", "16"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Visual Studio 16 2019"));
}

#[test]
fn test_vs_version_from_env() {
    let tmp = repo();

    in_repo(tmp.path())
        .env("MARL_EXPORT_VS_VERSION", "16")
        .arg("plan")
        .assert()
        .success()
        .stdout(predicate::str::contains("Visual Studio 16 2019"));
}

#[test]
fn test_android_api_level_from_env() {
    let tmp = repo();

    let output = in_repo(tmp.path())
        .env("ANDROID_NDK_ROOT", "/opt/ndk")
        .env("MARL_EXPORT_ANDROID_API_LEVEL", "29")
        .args(["plan", "--json", "-p", "android", "-a", "arm64-v8a"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let args = json["build"]["toolchain"]["toolchain_args"].as_array().unwrap();
    assert!(args.iter().any(|a| a == "-DANDROID_NATIVE_API_LEVEL=29"));
}

#[test]
fn test_root_from_env() {
    let tmp = repo();
    let elsewhere = TempDir::new().unwrap();
    fs::create_dir_all(tmp.path().join("build/export")).unwrap();

    in_repo(elsewhere.path())
        .env("MARL_EXPORT_ROOT", tmp.path())
        .arg("clean")
        .assert()
        .success();

    assert!(!tmp.path().join("build").exists());
    assert!(tmp.path().join("CMakeLists.txt").exists());
}

#[test]
fn test_zero_android_api_level_is_rejected() {
    let tmp = repo();

    in_repo(tmp.path())
        .env("ANDROID_NDK_ROOT", "/opt/ndk")
        .args(["plan", "-p", "android", "--android-api-level", "0"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("--android-api-level"));

    in_repo(tmp.path())
        .env("ANDROID_NDK_ROOT", "/opt/ndk")
        .env("MARL_EXPORT_ANDROID_API_LEVEL", "0")
        .args(["plan", "-p", "android"])
        .assert()
        .failure()
        .code(2);
}

#[test]
fn test_zero_android_api_level_in_config_is_rejected() {
    let tmp = repo();
    let config_dir = tmp.path().join(".marl-export");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(
        config_dir.join("config.toml"),
        "[defaults]\nandroid_api_level = 0\n",
    )
    .unwrap();

    in_repo(tmp.path())
        .env("ANDROID_NDK_ROOT", "/opt/ndk")
        .args(["plan", "-p", "android"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("unsupported Android API level"));
}

#[test]
fn test_plan_json() {
    let tmp = repo();

    let output = in_repo(tmp.path())
        .env("ANDROID_NDK_ROOT", "/opt/ndk")
        .args(["plan", "--json", "-p", "android", "-a", "armeabi-v7a", "-c", "debug"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["build"]["toolchain"]["generator"], "Unix Makefiles");
    let args = json["build"]["toolchain"]["toolchain_args"].as_array().unwrap();
    assert!(args.iter().any(|a| a == "-DANDROID_ABI=armeabi-v7a"));
    assert!(args.iter().any(|a| a == "-DANDROID_NATIVE_API_LEVEL=24"));
    assert_eq!(json["exports"][0]["scheme"], "canonical");
    assert_eq!(json["exports"][1]["scheme"], "alias");
}

#[test]
fn test_plan_uses_project_config() {
    let tmp = repo();
    let config_dir = tmp.path().join(".marl-export");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(
        config_dir.join("config.toml"),
        "[defaults]\nplatform = \"macos\"\narch = \"arm64-v8a\"\n",
    )
    .unwrap();

    in_repo(tmp.path())
        .arg("plan")
        .assert()
        .success()
        .stdout(predicate::str::contains("macos/arm64-v8a/debug"))
        .stdout(predicate::str::contains("Xcode"));
}

// ============================================================================
// failures
// ============================================================================

#[test]
fn test_unsupported_platform_fails() {
    let tmp = repo();

    in_repo(tmp.path())
        .args(["build", "--platform", "linux"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("unsupported platform"))
        .stderr(predicate::str::contains("linux"));

    assert!(!tmp.path().join("build").exists());
}

#[test]
fn test_android_without_ndk_fails_before_building() {
    let tmp = repo();

    in_repo(tmp.path())
        .args(["build", "--platform", "android", "--arch", "arm64-v8a"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("ANDROID_NDK_ROOT"));

    assert!(!tmp.path().join("build").exists());
}

#[test]
fn test_export_without_build_fails() {
    let tmp = repo();

    in_repo(tmp.path())
        .args(["export", "--platform", "macos"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("libmarl.a"));

    assert!(!tmp.path().join("build/export").exists());
}

// ============================================================================
// marl-export build (with a scripted cmake)
// ============================================================================

/// Install a fake `cmake` and point the project config at it.
///
/// The build step drops `libmarl.a` directly in the build directory, which
/// is where Makefile generators put it.
#[cfg(unix)]
fn fake_cmake(root: &Path, configure_exit: i32) {
    use std::os::unix::fs::PermissionsExt;

    let script = root.join("fake-cmake.sh");
    fs::write(
        &script,
        format!(
            "#!/bin/sh\n\
             if [ \"$1\" = \"--build\" ]; then\n\
             \x20 printf 'marl' > \"$2/libmarl.a\"\n\
             \x20 exit 0\n\
             fi\n\
             if [ {code} -ne 0 ]; then\n\
             \x20 echo 'CMake Error: scripted failure' >&2\n\
             fi\n\
             exit {code}\n",
            code = configure_exit
        ),
    )
    .unwrap();
    fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();

    let config_dir = root.join(".marl-export");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(
        config_dir.join("config.toml"),
        format!("[build]\ncmake = {:?}\n", script.display().to_string()),
    )
    .unwrap();
}

#[cfg(unix)]
#[test]
fn test_build_android_release_exports_everything() {
    let tmp = repo();
    let root = tmp.path();
    fake_cmake(root, 0);

    in_repo(root)
        .env("ANDROID_NDK_ROOT", "/opt/ndk")
        .args(["build", "-p", "android", "-a", "arm64-v8a", "-c", "release"])
        .assert()
        .success();

    let export = root.join("build/export");
    assert_eq!(
        fs::read(export.join("libs/release/marl.android.arm64-v8a.a")).unwrap(),
        b"marl"
    );
    assert!(export.join("include/marl/scheduler.h").is_file());
    assert!(export.join("src/scheduler.cpp").is_file());

    let alias = export.join("gdcompatible_libs");
    for name in [
        "libmarl.android.template_release.arm64.a",
        "libmarl.android.template_release.dev.arm64.a",
        "libmarl.android.editor.arm64.a",
        "libmarl.android.editor.dev.arm64.a",
    ] {
        assert_eq!(fs::read(alias.join(name)).unwrap(), b"marl", "{}", name);
    }
}

#[cfg(unix)]
#[test]
fn test_build_json_events() {
    let tmp = repo();
    let root = tmp.path();
    fake_cmake(root, 0);

    in_repo(root)
        .env("ANDROID_NDK_ROOT", "/opt/ndk")
        .args(["build", "-p", "android", "--no-canonical", "--message-format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""reason":"configure-started""#))
        .stdout(predicate::str::contains(r#""reason":"pipeline-finished""#))
        .stdout(predicate::str::contains("gdcompatible_libs"));

    assert!(!root.join("build/export/libs").exists());
}

#[cfg(unix)]
#[test]
fn test_configure_failure_propagates_exit_code() {
    let tmp = repo();
    let root = tmp.path();
    fake_cmake(root, 3);

    in_repo(root)
        .env("ANDROID_NDK_ROOT", "/opt/ndk")
        .args(["build", "-p", "android", "-a", "x86"])
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("scripted failure"));

    assert!(!root.join("build/export").exists());
}

// ============================================================================
// marl-export clean
// ============================================================================

#[test]
fn test_clean_export_only() {
    let tmp = repo();
    let root = tmp.path();
    fs::create_dir_all(root.join("build/export/libs")).unwrap();
    fs::create_dir_all(root.join("build/windows/x86_64/debug")).unwrap();

    in_repo(root)
        .args(["clean", "--export-only"])
        .assert()
        .success();

    assert!(!root.join("build/export").exists());
    assert!(root.join("build/windows/x86_64/debug").exists());

    in_repo(root).arg("clean").assert().success();
    assert!(!root.join("build").exists());
}

#[test]
fn test_clean_from_subdirectory_finds_root() {
    let tmp = repo();
    let root = tmp.path();
    fs::create_dir_all(root.join("build")).unwrap();

    in_repo(&root.join("include/marl"))
        .arg("clean")
        .assert()
        .success();

    assert!(!root.join("build").exists());
    assert!(root.join("include/marl/scheduler.h").exists());
}

// ============================================================================
// marl-export completions
// ============================================================================

#[test]
fn test_completions_bash() {
    marl_export()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("marl-export"));
}
