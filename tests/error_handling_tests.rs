//! Error paths of the application layer: exit codes, messages and JSON errors.

use clap::Parser;
use dupsweep::cli::Cli;
use dupsweep::error::{ExitCode, StructuredError};
use dupsweep::scanner::ScanError;
use std::fs::File;
use tempfile::tempdir;

#[test]
fn test_missing_path_argument() {
    let cli = Cli::try_parse_from(["dupsweep", "-q"]).unwrap();
    let err = dupsweep::run_app(cli).unwrap_err();

    assert_eq!(err.to_string(), "Directory is not specified");
    assert_eq!(ExitCode::for_error(&err), ExitCode::InvalidRoot);
}

#[test]
fn test_nonexistent_root_fails_before_prompting() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("nowhere");
    let cli = Cli::try_parse_from(["dupsweep", "-q", missing.to_str().unwrap()]).unwrap();

    let err = dupsweep::run_app(cli).unwrap_err();

    assert!(matches!(
        err.downcast_ref::<ScanError>(),
        Some(ScanError::NotFound(p)) if *p == missing
    ));
    assert_eq!(ExitCode::for_error(&err), ExitCode::InvalidRoot);
    assert!(err.to_string().contains("nowhere"));
}

#[test]
fn test_file_root_is_invalid() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("file.txt");
    File::create(&file).unwrap();
    let cli = Cli::try_parse_from(["dupsweep", "-q", file.to_str().unwrap()]).unwrap();

    let err = dupsweep::run_app(cli).unwrap_err();

    assert!(matches!(
        err.downcast_ref::<ScanError>(),
        Some(ScanError::NotADirectory(_))
    ));
    assert_eq!(ExitCode::for_error(&err), ExitCode::InvalidRoot);
}

#[test]
fn test_structured_error_for_invalid_root() {
    let cli = Cli::try_parse_from(["dupsweep", "-q"]).unwrap();
    let err = dupsweep::run_app(cli).unwrap_err();
    let code = ExitCode::for_error(&err);

    let json = serde_json::to_string(&StructuredError::new(&err, code)).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["code"], "DS002");
    assert_eq!(value["exit_code"], 2);
    assert_eq!(value["message"], "Directory is not specified");
    assert_eq!(value["interrupted"], false);
}
