mod common;

use common::helpers::create_test_package;
use pickle::{
    BuildError, BuildSession, InstallOutcome, OutputCallback, Package, Stage, Toolchain,
};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::rc::Rc;
use tempfile::TempDir;

fn fake_toolchain(root: &Path) -> Toolchain {
    Toolchain {
        phpize: "touch phpize.ran".to_string(),
        make: format!("sh {}/make.sh", root.display()),
    }
}

#[derive(Debug, Default)]
struct Collect {
    lines: Rc<RefCell<Vec<String>>>,
}

impl OutputCallback for Collect {
    fn output(&mut self, tag: &str, line: &str) {
        self.lines.borrow_mut().push(format!("{tag}: {line}"));
    }
}

#[test]
fn builds_package_end_to_end() {
    let temp = TempDir::new().unwrap();
    let root = create_test_package(
        &temp,
        "foo",
        "1.0",
        r#"[{ "name": "foo", "type": "enable", "default": true }]"#,
        0,
    );
    let package = Package::from_manifest(&root).unwrap();
    let root = package.root_dir().to_path_buf();
    let options = package.session_options(&HashMap::new()).unwrap();
    assert!(options.is_empty());

    let mut session = BuildSession::new(&package, options)
        .with_temp_root(temp.path())
        .with_toolchain(fake_toolchain(&root));
    let report = session.run().unwrap();

    let workspace = temp.path().join("pickle-foo1.0");
    assert_eq!(report.workspace, workspace);
    assert_eq!(report.install, InstallOutcome::FailedIgnored { code: 4 });
    assert_eq!(session.stage(), Stage::Installed);

    // phpize ran in the source tree, everything else in the workspace
    assert!(root.join("phpize.ran").exists());
    assert!(workspace.join("build.out").exists());
    assert_eq!(
        fs::read_to_string(workspace.join("configure.args"))
            .unwrap()
            .trim_end(),
        "--enable-foo=shared"
    );

    let entries: Vec<(u8, String)> = session
        .log()
        .entries()
        .map(|(level, message)| (level, message.to_string()))
        .collect();
    assert!(entries.contains(&(
        1,
        format!("running: {}/configure --enable-foo=shared ", root.display())
    )));
    assert!(entries.contains(&(2, "checking for foo support... yes".to_string())));
    assert!(entries.contains(&(2, "cp modules/*.so /nowhere".to_string())));

    session.cleanup().unwrap();
    assert!(!workspace.exists());
}

#[test]
fn passes_declared_options_in_order() {
    let temp = TempDir::new().unwrap();
    let root = create_test_package(
        &temp,
        "apcu",
        "5.1.23",
        r#"[
            { "name": "apcu", "type": "disable", "default": true },
            { "name": "apcu-debug", "type": "enable", "default": false },
            { "name": "apcu-mmap", "type": "disable", "default": true }
        ]"#,
        0,
    );
    let package = Package::from_manifest(&root).unwrap();
    let overrides = HashMap::from([("apcu-debug".to_string(), true)]);
    let options = package.session_options(&overrides).unwrap();

    let mut session = BuildSession::new(&package, options)
        .with_temp_root(temp.path())
        .with_toolchain(fake_toolchain(package.root_dir()));
    session.run().unwrap();

    let args = fs::read_to_string(session.workspace_path().join("configure.args")).unwrap();
    assert_eq!(
        args.trim_end(),
        "--with-apcu=shared --enable-apcu-debug --disable-apcu-mmap"
    );
}

#[test]
fn stale_workspace_is_replaced() {
    let temp = TempDir::new().unwrap();
    let root = create_test_package(&temp, "redis", "6.0.2", "[]", 0);
    let package = Package::from_manifest(&root).unwrap();

    let stale = temp.path().join("pickle-redis6.0.2");
    fs::create_dir_all(stale.join("modules")).unwrap();
    fs::write(stale.join("modules").join("redis.so"), b"old").unwrap();

    let mut session = BuildSession::new(&package, Vec::new())
        .with_temp_root(temp.path())
        .with_toolchain(fake_toolchain(package.root_dir()));
    session.run().unwrap();

    assert!(!stale.join("modules").exists());
    assert!(stale.join("configure.args").exists());
}

#[test]
fn configure_failure_keeps_caller_directory() {
    let temp = TempDir::new().unwrap();
    let root = create_test_package(&temp, "xdebug", "3.3.0", "[]", 1);
    let package = Package::from_manifest(&root).unwrap();
    let before = std::env::current_dir().unwrap();

    let mut session = BuildSession::new(&package, Vec::new())
        .with_temp_root(temp.path())
        .with_toolchain(fake_toolchain(package.root_dir()));
    let err = session.run().unwrap_err();

    assert!(matches!(err, BuildError::ConfigureFailed { .. }));
    assert!(err.to_string().contains("config.log"));
    assert_eq!(session.stage(), Stage::Failed);
    assert_eq!(std::env::current_dir().unwrap(), before);
    assert_eq!(session.original_dir(), Some(before.as_path()));

    // Nothing was compiled after configure failed
    assert!(!session.workspace_path().join("build.out").exists());
    session.cleanup().unwrap();
}

#[test]
fn callback_replaces_output_logging() {
    let temp = TempDir::new().unwrap();
    let root = create_test_package(&temp, "igbinary", "3.2.15", "[]", 0);
    let package = Package::from_manifest(&root).unwrap();
    let lines = Rc::new(RefCell::new(Vec::new()));

    let mut session = BuildSession::new(&package, Vec::new())
        .with_temp_root(temp.path())
        .with_toolchain(fake_toolchain(package.root_dir()))
        .with_callback(Box::new(Collect {
            lines: Rc::clone(&lines),
        }));
    session.configure().unwrap();

    assert_eq!(session.stage(), Stage::Configured);
    assert_eq!(
        *lines.borrow(),
        vec!["cmdoutput: checking for igbinary support... yes".to_string()]
    );
    assert!(session.log().entries().all(|(level, _)| level == 1));
    session.cleanup().unwrap();
}

#[test]
fn missing_phpize_fails_the_build() {
    let temp = TempDir::new().unwrap();
    let root = create_test_package(&temp, "memcached", "3.2.0", "[]", 0);
    let package = Package::from_manifest(&root).unwrap();

    let mut session = BuildSession::new(&package, Vec::new())
        .with_temp_root(temp.path())
        .with_toolchain(Toolchain {
            phpize: "pickle-test-no-such-phpize".to_string(),
            make: "true".to_string(),
        });
    let err = session.run().unwrap_err();

    assert!(matches!(err, BuildError::PhpizeFailed));
    assert!(
        session
            .log()
            .as_str()
            .contains("1: running: pickle-test-no-such-phpize\n")
    );
    session.cleanup().unwrap();
}
