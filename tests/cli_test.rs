use clap::Parser;
use setupgen::cli::Args;
use std::ffi::OsString;
use std::path::PathBuf;

fn make_args(args: &[&str]) -> Vec<OsString> {
    let mut res = vec![OsString::from("setupgen")];
    res.extend(args.iter().map(OsString::from));
    res
}

#[test]
fn test_basic_args() {
    let args = make_args(&["--config", "setup-config.java.yaml", "--output", "./out"]);
    let parsed = Args::try_parse_from(args).unwrap();

    assert_eq!(parsed.config, vec![PathBuf::from("setup-config.java.yaml")]);
    assert_eq!(parsed.output, PathBuf::from("./out"));
    assert!(parsed.profiles.is_none());
    assert!(parsed.templates.is_none());
    assert!(!parsed.list);
    assert!(!parsed.verbose);
}

#[test]
fn test_repeated_config() {
    let args = make_args(&["-c", "a.yaml", "-c", "b.yaml", "-o", "out"]);
    let parsed = Args::try_parse_from(args).unwrap();

    assert_eq!(parsed.config, vec![PathBuf::from("a.yaml"), PathBuf::from("b.yaml")]);
}

#[test]
fn test_all_flags() {
    let args = make_args(&[
        "--profiles",
        "profiles",
        "--templates",
        "profiles/templates",
        "--output",
        "out",
        "--list",
        "--verbose",
    ]);
    let parsed = Args::try_parse_from(args).unwrap();

    assert_eq!(parsed.profiles, Some(PathBuf::from("profiles")));
    assert_eq!(parsed.templates, Some(PathBuf::from("profiles/templates")));
    assert!(parsed.list);
    assert!(parsed.verbose);
}

#[test]
fn test_config_and_profiles_together() {
    let args = make_args(&["--config", "a.yaml", "--profiles", "dir", "--output", "out"]);
    let parsed = Args::try_parse_from(args).unwrap();

    assert_eq!(parsed.config, vec![PathBuf::from("a.yaml")]);
    assert_eq!(parsed.profiles, Some(PathBuf::from("dir")));
}

#[test]
fn test_missing_output() {
    let args = make_args(&["--config", "a.yaml"]);
    assert!(Args::try_parse_from(args).is_err());
}

#[test]
fn test_missing_source() {
    let args = make_args(&["--output", "out"]);
    assert!(Args::try_parse_from(args).is_err());
}

#[test]
fn test_positional_args_rejected() {
    let args = make_args(&["--config", "a.yaml", "--output", "out", "extra"]);
    assert!(Args::try_parse_from(args).is_err());
}
