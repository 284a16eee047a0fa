//! Integration tests for the factor command
//!
//! These tests drive `FactorArgs::execute` against real files in a temporary
//! directory.

use idfactor::cli::commands::factor::FactorArgs;
use idfactor::cli::{EXIT_CONFIG_ERROR, EXIT_INPUT_ERROR, EXIT_SUCCESS};
use idfactor::config::IdFactorConfig;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const HEADER: &str = "record_id|first_name|last_name|middle_initial|suffix|dob|ssn|\
address_line_1|address_line_2|city|state|zip|phone|email";

fn write_input(dir: &Path, rows: &[&str]) -> PathBuf {
    let path = dir.join("identities.psv");
    let mut text = format!("{HEADER}\n");
    for row in rows {
        text.push_str(row);
        text.push('\n');
    }
    fs::write(&path, text).unwrap();
    path
}

fn config_for(out: &Path) -> IdFactorConfig {
    let mut config = IdFactorConfig::default();
    config.output.directory = out.display().to_string();
    config
}

fn listing(dir: &Path) -> Vec<String> {
    if !dir.exists() {
        return Vec::new();
    }
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

const ANN: &str = "1|Ann|Lee|||1980-01-01|111-22-3333|1 Main||Springfield|IL|62701|555-1212|ann@x.com";
const BO: &str = "2|Bo|Kim|||||||||||";

#[tokio::test]
async fn test_factor_writes_stores_and_map() {
    let dir = TempDir::new().unwrap();
    let input = write_input(dir.path(), &[ANN, BO]);
    let out = dir.path().join("out");

    let args = FactorArgs {
        map_file: Some("identity_map.psv".to_string()),
        file: Some(input),
        ..Default::default()
    };
    let code = args.execute(config_for(&out)).await.unwrap();
    assert_eq!(code, EXIT_SUCCESS);

    assert_eq!(
        listing(&out),
        vec![
            "address_elements.psv",
            "email_elements.psv",
            "identity_map.psv",
            "name_address_elements.psv",
            "name_dob_elements.psv",
            "name_phone_elements.psv",
            "phone_elements.psv",
            "ssn_elements.psv",
        ]
    );

    let ssn = fs::read_to_string(out.join("ssn_elements.psv")).unwrap();
    assert_eq!(ssn.lines().count(), 2);
    assert!(ssn.contains("111-22-3333"));

    let map = fs::read_to_string(out.join("identity_map.psv")).unwrap();
    assert_eq!(map.lines().count(), 3);
    assert!(map.lines().next().unwrap().starts_with("record_id|name_id|ssn_id"));
}

#[tokio::test]
async fn test_selected_fragments_only() {
    let dir = TempDir::new().unwrap();
    let input = write_input(dir.path(), &[ANN, BO]);
    let out = dir.path().join("out");

    let args = FactorArgs {
        fragments: Some("email,ssn".to_string()),
        file: Some(input),
        ..Default::default()
    };
    assert_eq!(args.execute(config_for(&out)).await.unwrap(), EXIT_SUCCESS);
    assert_eq!(listing(&out), vec!["email_elements.psv", "ssn_elements.psv"]);
}

#[tokio::test]
async fn test_dry_run_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let input = write_input(dir.path(), &[ANN, BO]);
    let out = dir.path().join("out");

    let args = FactorArgs {
        dry_run: true,
        map_file: Some("identity_map.psv".to_string()),
        file: Some(input),
        ..Default::default()
    };
    assert_eq!(args.execute(config_for(&out)).await.unwrap(), EXIT_SUCCESS);
    assert!(!out.exists());
}

#[tokio::test]
async fn test_short_row_leaves_no_output() {
    let dir = TempDir::new().unwrap();
    let input = write_input(dir.path(), &[ANN, "2|Bo|Kim||||||||||"]);
    let out = dir.path().join("out");

    let args = FactorArgs {
        map_file: Some("identity_map.psv".to_string()),
        file: Some(input),
        ..Default::default()
    };
    assert_eq!(
        args.execute(config_for(&out)).await.unwrap(),
        EXIT_INPUT_ERROR
    );
    assert!(listing(&out).is_empty());
}

#[tokio::test]
async fn test_header_only_input_is_input_error() {
    let dir = TempDir::new().unwrap();
    let input = write_input(dir.path(), &[]);
    let out = dir.path().join("out");

    let args = FactorArgs {
        file: Some(input),
        ..Default::default()
    };
    assert_eq!(
        args.execute(config_for(&out)).await.unwrap(),
        EXIT_INPUT_ERROR
    );
    assert!(listing(&out).is_empty());
}

#[tokio::test]
async fn test_compromised_flag_reads_breach_id() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("breach.psv");
    fs::write(&path, "header\n1|B-9|Ann|Lee|||||||||||ann@x.com\n").unwrap();
    let out = dir.path().join("out");

    let args = FactorArgs {
        compromised: true,
        fragments: Some("email".to_string()),
        file: Some(path),
        ..Default::default()
    };
    assert_eq!(args.execute(config_for(&out)).await.unwrap(), EXIT_SUCCESS);

    let email = fs::read_to_string(out.join("email_elements.psv")).unwrap();
    let mut lines = email.lines();
    assert_eq!(lines.next(), Some("breach_id|email_id|email"));
    assert!(lines.next().unwrap().starts_with("B-9|"));
}

#[tokio::test]
async fn test_unknown_fragment_is_config_error() {
    let dir = TempDir::new().unwrap();
    let input = write_input(dir.path(), &[ANN]);
    let out = dir.path().join("out");

    let args = FactorArgs {
        fragments: Some("passport".to_string()),
        file: Some(input),
        ..Default::default()
    };
    assert_eq!(
        args.execute(config_for(&out)).await.unwrap(),
        EXIT_CONFIG_ERROR
    );
    assert!(!out.exists());
}

#[tokio::test]
async fn test_map_file_named_like_a_store_is_config_error() {
    let dir = TempDir::new().unwrap();
    let input = write_input(dir.path(), &[ANN, BO]);
    let out = dir.path().join("out");

    let args = FactorArgs {
        map_file: Some("ssn_elements.psv".to_string()),
        file: Some(input),
        ..Default::default()
    };
    assert_eq!(
        args.execute(config_for(&out)).await.unwrap(),
        EXIT_CONFIG_ERROR
    );
    assert!(!out.exists());
}
