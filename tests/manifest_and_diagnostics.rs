//! Integration tests for manifest facts and issue reporting through a codebase.

use apiscope::{prelude::*, Result};
use std::{path::PathBuf, sync::Arc};

const MANIFEST: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<manifest xmlns:android="http://schemas.android.com/apk/res/android"
    package="android" coreApp="true">
    <uses-sdk android:minSdkVersion="30" />
    <permission android:name="android.permission.BLUETOOTH_CONNECT"
        android:protectionLevel="dangerous" />
    <permission android:name="android.permission.READ_LOGS"
        android:protectionLevel="signature|privileged|development" />
</manifest>"#;

fn manifest_file(name: &str, contents: &str) -> Result<PathBuf> {
    let path = std::env::temp_dir().join(format!("apiscope-{}-{name}", std::process::id()));
    std::fs::write(&path, contents)?;
    Ok(path)
}

#[test]
fn manifest_from_file() -> Result<()> {
    let path = manifest_file("AndroidManifest.xml", MANIFEST)?;
    let codebase = TextCodebase::new("system-current.txt")
        .with_manifest(ManifestSource::File(path.clone()));

    let manifest = codebase.manifest();
    assert!(manifest.is_configured());
    assert_eq!(manifest.min_sdk_version(), MinSdkVersion::Set(30));
    assert_eq!(manifest.permissions()?, 2);
    assert_eq!(
        manifest.protection_levels("android.permission.READ_LOGS")?,
        ["signature", "privileged", "development"]
    );
    assert_eq!(
        manifest.permission_protection_level("android.permission.BLUETOOTH_CONNECT")?,
        Some("dangerous")
    );

    std::fs::remove_file(path)?;
    Ok(())
}

#[test]
fn manifest_not_configured() {
    let codebase = TextCodebase::new("current.txt");
    assert!(matches!(
        codebase
            .manifest()
            .permission_protection_level("android.permission.INTERNET"),
        Err(Error::ManifestNotConfigured)
    ));
    assert_eq!(codebase.manifest().min_sdk_version(), MinSdkVersion::Unset);
    assert_eq!(codebase.reporter().count(), 0);
}

#[test]
fn broken_manifest_goes_to_the_codebase_reporter() -> Result<()> {
    let configuration = Arc::new(IssueConfiguration::new());
    configuration.warning(Issue::ParseError);
    let reporter = Arc::new(Reporter::with_configuration(configuration));

    let codebase =
        TextCodebase::with_reporter("current.txt", Arc::new(Config::default()), reporter.clone())
            .with_manifest(ManifestSource::Xml("<manifest><uses-sdk".to_string()));

    assert_eq!(codebase.manifest().permissions()?, 0);
    assert_eq!(codebase.manifest().min_sdk_version(), MinSdkVersion::Unset);

    let diagnostics = reporter.by_issue(Issue::ParseError);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].severity, Severity::Warning);
    assert!(!reporter.has_errors());
    assert_eq!(reporter.warning_count(), 1);
    Ok(())
}

#[test]
fn overrides_from_a_string() {
    let reporter = Reporter::new();
    let applied = reporter
        .configuration()
        .apply_overrides("UnresolvedClass:error,NoSuchIssue:error,DuplicateClass:hidden");
    assert_eq!(applied, 2);

    let codebase = TextCodebase::with_reporter(
        "current.txt",
        Arc::new(Config::default()),
        Arc::new(reporter),
    );
    codebase
        .add_class(ClassModel::builder("android.app.Activity").build())
        .expect("first declaration");
    assert!(codebase
        .add_class(ClassModel::builder("android.app.Activity").build())
        .is_err());

    // The duplicate is hidden and therefore not recorded
    assert_eq!(codebase.reporter().count(), 0);
    codebase
        .reporter()
        .report(Issue::UnresolvedClass, Some("current.txt"), "class Foo is missing");
    assert!(codebase.reporter().has_errors());
}
