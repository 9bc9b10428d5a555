//! End-to-end tests for the `portable_bundler` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::{Path, PathBuf};

fn bundler() -> Command {
    let mut cmd = Command::cargo_bin("portable_bundler").unwrap();
    cmd.env_remove("PORTABLE_BUNDLER_CONFIG")
        .env_remove("PORTABLE_BUNDLER_RESOURCES")
        .env_remove("RUST_LOG");
    cmd
}

fn shipped_resources() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("app_bundle")
}

fn portable_python(root: &Path) -> PathBuf {
    let python = root.join("python");
    std::fs::create_dir_all(python.join("bin")).unwrap();
    std::fs::create_dir_all(python.join("lib/python3.6/json")).unwrap();
    std::fs::write(python.join("bin/python3.6"), "").unwrap();
    std::fs::write(python.join("lib/python3.6/json/__init__.pyc"), "").unwrap();
    python
}

#[test]
fn help_lists_subcommands() {
    bundler()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("bundle"))
        .stdout(predicate::str::contains("trim"))
        .stdout(predicate::str::contains("smoke-test"));
}

#[test]
fn missing_arguments_are_usage_errors() {
    bundler().arg("bundle").assert().code(2);
    bundler().assert().code(2);
}

#[test]
fn nonexistent_python_dir_is_rejected() {
    let tmp = tempfile::tempdir().unwrap();

    bundler()
        .current_dir(tmp.path())
        .args(["bundle", "no-such-python", "Demo"])
        .arg("--resources")
        .arg(shipped_resources())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("but it is not a valid path"));

    assert!(!tmp.path().join("Demo.app").exists());
}

#[test]
fn bundles_with_shipped_resources() {
    let tmp = tempfile::tempdir().unwrap();
    let python = portable_python(tmp.path());
    let out = tmp.path().join("dist");
    std::fs::create_dir(&out).unwrap();

    bundler()
        .arg("bundle")
        .arg(&python)
        .arg("Viewer")
        .arg("--resources")
        .arg(shipped_resources())
        .arg("--output-dir")
        .arg(&out)
        .arg("--no-compress")
        .assert()
        .success()
        .stdout(predicate::str::contains("Viewer.app"));

    let contents = out.join("Viewer.app/Contents");
    let plist = std::fs::read_to_string(contents.join("Info.plist")).unwrap();
    assert!(plist.contains("<string>Viewer</string>"));
    assert!(plist.contains("<string>org.portable.viewer</string>"));
    assert!(!plist.contains("{{"));
    assert!(plist.contains("<string>appIcon</string>"));

    let launcher = std::fs::read_to_string(contents.join("MacOS/Viewer")).unwrap();
    assert!(launcher.contains("PYTHON_DIR_NAME=python\n"));
    assert!(launcher.contains("PYTHON_EXE=python3.6\n"));
    assert!(!launcher.contains("{{"));

    assert!(contents.join("Resources/appIcon.icns").is_file());
    assert!(contents.join("Resources/pyqt_test.py").is_file());
    assert!(contents.join("Resources/python/lib/python3.6/json/__init__.pyc").is_file());
    assert!(!out.join("viewer-portable.zip").exists());
}

#[test]
fn bundles_and_compresses() {
    let tmp = tempfile::tempdir().unwrap();
    let python = portable_python(tmp.path());

    bundler()
        .current_dir(tmp.path())
        .arg("bundle")
        .arg(&python)
        .arg("Viewer")
        .arg("--resources")
        .arg(shipped_resources())
        .assert()
        .success();

    let zip_path = tmp.path().join("viewer-portable.zip");
    let archive = zip::ZipArchive::new(std::fs::File::open(&zip_path).unwrap()).unwrap();
    assert!(
        archive
            .file_names()
            .any(|n| n == "Viewer.app/Contents/Info.plist")
    );
}

#[test]
fn existing_bundle_is_not_overwritten() {
    let tmp = tempfile::tempdir().unwrap();
    let python = portable_python(tmp.path());
    std::fs::create_dir(tmp.path().join("Viewer.app")).unwrap();

    bundler()
        .current_dir(tmp.path())
        .arg("bundle")
        .arg(&python)
        .arg("Viewer")
        .arg("--resources")
        .arg(shipped_resources())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("already exists"));

    assert!(std::fs::read_dir(tmp.path().join("Viewer.app")).unwrap().next().is_none());
}

#[test]
fn config_file_supplies_resources() {
    let tmp = tempfile::tempdir().unwrap();
    let python = portable_python(tmp.path());
    let config = tmp.path().join("bundle.toml");
    std::fs::write(
        &config,
        format!(
            "[bundle]\nresources = {:?}\nidentifier = \"com.example.viewer\"\ncompress = false\n",
            shipped_resources().display().to_string()
        ),
    )
    .unwrap();

    bundler()
        .current_dir(tmp.path())
        .arg("--config")
        .arg(&config)
        .arg("bundle")
        .arg(&python)
        .arg("Viewer")
        .assert()
        .success();

    let plist = std::fs::read_to_string(tmp.path().join("Viewer.app/Contents/Info.plist")).unwrap();
    assert!(plist.contains("com.example.viewer"));
    assert!(!tmp.path().join("viewer-portable.zip").exists());
}

#[test]
fn smoke_test_requires_a_bundle() {
    let tmp = tempfile::tempdir().unwrap();

    bundler()
        .arg("smoke-test")
        .arg(tmp.path().join("Missing.app"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("not found"));
}

#[cfg(unix)]
#[test]
fn trims_with_explicit_interpreter() {
    use std::os::unix::fs::PermissionsExt;

    let tmp = tempfile::tempdir().unwrap();
    let python = tmp.path().join("python");
    let lib = python.join("lib/python3.6");
    std::fs::create_dir_all(lib.join("idlelib")).unwrap();
    std::fs::create_dir_all(lib.join("tkinter")).unwrap();
    std::fs::write(lib.join("os.py"), "").unwrap();

    let compiler = tmp.path().join("compileall.sh");
    std::fs::write(
        &compiler,
        "#!/bin/sh\nfind \"$5\" -name '*.py' | while read -r f; do cp \"$f\" \"${f}c\"; done\n",
    )
    .unwrap();
    std::fs::set_permissions(&compiler, std::fs::Permissions::from_mode(0o755)).unwrap();

    bundler()
        .arg("trim")
        .arg(&python)
        .arg("--interpreter")
        .arg(&compiler)
        .args(["--remove-dir", "tkinter"])
        .assert()
        .success()
        .stdout(predicate::str::contains("sources removed: 1"));

    assert!(!lib.join("tkinter").exists());
    assert!(lib.join("idlelib").is_dir());
    assert!(!lib.join("os.py").exists());
    assert!(lib.join("os.pyc").is_file());
}

#[cfg(unix)]
#[test]
fn awkward_names_stay_well_formed() {
    let tmp = tempfile::tempdir().unwrap();
    let python = tmp.path().join("my \"py\" $dir");
    std::fs::create_dir_all(python.join("bin")).unwrap();
    std::fs::write(python.join("bin/python3.6"), "").unwrap();

    bundler()
        .current_dir(tmp.path())
        .arg("bundle")
        .arg(&python)
        .arg("Tom & Jerry")
        .arg("--resources")
        .arg(shipped_resources())
        .arg("--no-compress")
        .assert()
        .success();

    let contents = tmp.path().join("Tom & Jerry.app/Contents");
    let plist = std::fs::read_to_string(contents.join("Info.plist")).unwrap();
    assert!(plist.contains("<string>Tom &amp; Jerry</string>"));
    assert!(!plist.contains("Tom & Jerry"));

    let launcher = std::fs::read_to_string(contents.join("MacOS/Tom & Jerry")).unwrap();
    assert!(launcher.contains("PYTHON_DIR_NAME='my \"py\" $dir'\n"));
}
