//! CLI parsing tests.

use clap::Parser;

use killfeed_daemon::cli::DaemonCli;

#[test]
fn test_no_arguments_uses_defaults() {
    let cli = DaemonCli::try_parse_from(["killfeed-daemon"]).expect("should parse");
    assert!(cli.config.is_none());
    assert!(cli.log_path.is_none());
    assert!(cli.session_tag.is_none());
    assert!(!cli.validate);
}

#[test]
fn test_all_flags_are_parsed() {
    let cli = DaemonCli::try_parse_from([
        "killfeed-daemon",
        "--config",
        "custom.toml",
        "--log-path",
        "C:\\Games\\Game.log",
        "--session-tag",
        "123456789",
        "--aux-label",
        "Cutlass Black",
        "--log-level",
        "debug",
        "--log-format",
        "json",
        "--validate",
    ])
    .expect("should parse");

    assert_eq!(cli.config.as_deref(), Some(std::path::Path::new("custom.toml")));
    assert_eq!(cli.log_path.as_deref(), Some("C:\\Games\\Game.log"));
    assert_eq!(cli.session_tag.as_deref(), Some("123456789"));
    assert_eq!(cli.aux_label.as_deref(), Some("Cutlass Black"));
    assert_eq!(cli.log_level.as_deref(), Some("debug"));
    assert_eq!(cli.log_format.as_deref(), Some("json"));
    assert!(cli.validate);
}

#[test]
fn test_short_config_flag() {
    let cli = DaemonCli::try_parse_from(["killfeed-daemon", "-c", "a.toml"]).expect("should parse");
    assert!(cli.config.is_some());
}

#[test]
fn test_unknown_flag_is_rejected() {
    assert!(DaemonCli::try_parse_from(["killfeed-daemon", "--pid-file", "x"]).is_err());
}
