use pulse::commands::{DEFAULT_BASE_URL, command_argument_builder};
use pulse::handlers::settings_from_matches;
use pulse_core::report::ReportFormat;
use pulse_scanner::sitemap::DecodePolicy;
use std::path::PathBuf;
use std::time::Duration;

fn settings(args: &[&str]) -> pulse::CatalogSettings {
    let mut argv = vec!["pulse"];
    argv.extend_from_slice(args);
    let matches = command_argument_builder()
        .try_get_matches_from(argv)
        .unwrap();
    settings_from_matches(&matches).unwrap()
}

#[test]
fn test_defaults() {
    let settings = settings(&[]);

    assert_eq!(DEFAULT_BASE_URL, "a7.co");
    assert_eq!(settings.base_url.as_str(), "http://a7.co/");
    assert_eq!(settings.format, ReportFormat::Text);
    assert_eq!(settings.policy, DecodePolicy::Lenient);
    assert_eq!(settings.keyword, None);
    assert!(!settings.watch);
    assert_eq!(settings.poll, Duration::from_secs(10));
    assert!(!settings.quiet);
    assert_eq!(
        settings.config_path.unwrap().file_name().unwrap(),
        "config.json"
    );
}

#[test]
fn test_base_url_gets_scheme() {
    let settings = settings(&["--base-url", "us.bape.com"]);
    assert_eq!(settings.base_url.as_str(), "http://us.bape.com/");
}

#[test]
fn test_base_url_with_scheme() {
    let settings = settings(&["--base-url=https://shop.example.com"]);
    assert_eq!(settings.base_url.as_str(), "https://shop.example.com/");
}

#[test]
fn test_invalid_base_url_is_rejected() {
    let result = command_argument_builder().try_get_matches_from(["pulse", "--base-url", "ftp://x"]);
    assert!(result.is_err());
}

#[test]
fn test_all_flags() {
    let settings = settings(&[
        "-b",
        "a7.co",
        "--config",
        "/tmp/pulse/config.json",
        "--format",
        "json",
        "--strict",
        "--keyword",
        "  cap ",
        "--watch",
        "--poll",
        "30",
        "-q",
    ]);

    assert_eq!(
        settings.config_path,
        Some(PathBuf::from("/tmp/pulse/config.json"))
    );
    assert_eq!(settings.format, ReportFormat::Json);
    assert_eq!(settings.policy, DecodePolicy::Strict);
    assert_eq!(settings.keyword.as_deref(), Some("cap"));
    assert!(settings.watch);
    assert_eq!(settings.poll, Duration::from_secs(30));
    assert!(settings.quiet);
}

#[test]
fn test_blank_keyword_is_ignored() {
    let settings = settings(&["--keyword", "   "]);
    assert_eq!(settings.keyword, None);
}

#[test]
fn test_zero_poll_is_rejected() {
    let result = command_argument_builder().try_get_matches_from(["pulse", "--poll", "0"]);
    assert!(result.is_err());
}

#[test]
fn test_unknown_format_is_rejected() {
    let result = command_argument_builder().try_get_matches_from(["pulse", "--format", "csv"]);
    assert!(result.is_err());
}

#[test]
fn test_verbose_counts() {
    let matches = command_argument_builder()
        .try_get_matches_from(["pulse", "-vv"])
        .unwrap();
    assert_eq!(matches.get_count("verbose"), 2);
}

#[test]
fn test_config_tilde_expands() {
    let settings = settings(&["--config", "~/pulse.json"]);
    let path = settings.config_path.unwrap();
    assert!(!path.to_string_lossy().starts_with('~'));
    assert!(path.ends_with("pulse.json"));
}
