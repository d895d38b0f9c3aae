//! Shared test helpers and utilities

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Get the path to the pickle binary built for this test run
#[allow(dead_code)]
pub(crate) fn get_pickle_binary() -> String {
    env!("CARGO_BIN_EXE_pickle").to_string()
}

/// Write an executable shell script
#[allow(dead_code)]
pub(crate) fn write_script(path: &Path, body: &str) {
    fs::write(path, format!("#!/bin/sh\n{body}\n")).expect("Failed to write script");
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))
        .expect("Failed to make script executable");
}

/// Create a fake extension source tree under `temp_dir/src`
///
/// The tree has a `composer.json` with the given configure options (a JSON
/// array), a `configure` script that records its arguments in
/// `configure.args` of its working directory and exits with
/// `configure_exit`, and a `make.sh` that compiles successfully but fails
/// `install` with exit code 4.
///
/// # Returns
/// The path to the source tree
#[allow(dead_code)]
pub(crate) fn create_test_package(
    temp_dir: &TempDir,
    name: &str,
    version: &str,
    options_json: &str,
    configure_exit: i32,
) -> PathBuf {
    let root = temp_dir.path().join("src");
    fs::create_dir_all(&root).expect("Failed to create source dir");

    let manifest = format!(
        r#"{{
    "name": "pickle-test/{name}",
    "version": "{version}",
    "type": "extension",
    "extra": {{ "configure-options": {options_json} }}
}}"#
    );
    fs::write(root.join("composer.json"), manifest).expect("Failed to write composer.json");

    write_script(
        &root.join("configure"),
        &format!("echo \"$@\" > configure.args\necho \"checking for {name} support... yes\"\nexit {configure_exit}"),
    );
    write_script(
        &root.join("make.sh"),
        "if [ \"$1\" = install ]; then\n  echo \"cp modules/*.so /nowhere\" >&2\n  exit 4\nfi\necho compiled > build.out",
    );

    root
}
