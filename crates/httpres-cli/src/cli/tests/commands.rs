use super::super::commands::{run_check, run_checksum, run_in, run_out};
use super::super::{error_report, load_settings};
use httpres_core::config::Settings;
use httpres_core::{ErrorClass, ResourceError};

fn resource_error(err: &anyhow::Error) -> &ResourceError {
    err.chain()
        .find_map(|e| e.downcast_ref::<ResourceError>())
        .expect("ResourceError in chain")
}

#[test]
fn run_out_always_fails() {
    let dir = tempfile::tempdir().unwrap();
    let err = run_out(dir.path()).unwrap_err();
    assert_eq!(resource_error(&err).class(), ErrorClass::Unimplemented);
}

#[test]
fn failure_report_is_one_line() {
    let dir = tempfile::tempdir().unwrap();
    let err = run_out(dir.path()).unwrap_err();
    assert_eq!(error_report(&err), "httpres error: out is not implemented");

    let err = run_check(&Settings::default(), &b"{"[..], Vec::new()).unwrap_err();
    let report = error_report(&err);
    assert!(report.starts_with("httpres error: failed to parse check request: "), "{report}");
    assert!(!report.contains('\n'), "{report}");
}

#[test]
fn run_checksum_prints_digest_and_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hello.txt");
    std::fs::write(&path, b"hello").unwrap();
    let mut out = Vec::new();
    run_checksum(&path, &mut out).unwrap();
    let line = String::from_utf8(out).unwrap();
    assert_eq!(
        line,
        format!("aaf4c61ddcc5e8a2dabede0f3b482cd9aea9434d  {}\n", path.display())
    );
}

#[test]
fn run_checksum_missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    assert!(run_checksum(&dir.path().join("missing"), Vec::new()).is_err());
}

#[test]
fn run_check_rejects_malformed_request() {
    let mut out = Vec::new();
    let err = run_check(&Settings::default(), &b"{not json"[..], &mut out).unwrap_err();
    assert!(format!("{err:#}").contains("failed to parse check request"));
    assert!(out.is_empty());
}

#[test]
fn run_check_bad_timeout_fails_before_network() {
    let input = br#"{"source": {"url": "http://127.0.0.1:9/x", "timeout": "eventually"}}"#;
    let mut out = Vec::new();
    let err = run_check(&Settings::default(), &input[..], &mut out).unwrap_err();
    assert_eq!(resource_error(&err).class(), ErrorClass::Configuration);
    assert!(out.is_empty());
}

#[test]
fn run_in_bad_url_fails_without_writing() {
    let dir = tempfile::tempdir().unwrap();
    let input = br#"{"source": {"url": "ftp://example.com/x"}, "version": {"sha1": "abc"}}"#;
    let mut out = Vec::new();
    let err = run_in(&Settings::default(), dir.path(), &input[..], &mut out).unwrap_err();
    assert_eq!(resource_error(&err).class(), ErrorClass::RequestConstruction);
    assert!(out.is_empty());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn load_settings_explicit_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    assert!(load_settings(Some(&path)).is_err());

    std::fs::write(&path, "default_timeout = \"45s\"\n").unwrap();
    let settings = load_settings(Some(&path)).unwrap();
    assert_eq!(settings.default_timeout, "45s");
}
