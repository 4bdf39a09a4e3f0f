// tests/logging_level.rs

use status_reporter::cli::LogLevel;
use status_reporter::logging::resolve_level;
use tracing::Level;

#[test]
fn flag_wins_over_verbose_and_env() {
    assert_eq!(resolve_level(Some(LogLevel::Warn), true, Some("trace")), Level::WARN);
}

#[test]
fn verbose_wins_over_env() {
    assert_eq!(resolve_level(None, true, Some("error")), Level::DEBUG);
}

#[test]
fn env_is_used_when_no_flags() {
    assert_eq!(resolve_level(None, false, Some(" Warning ")), Level::WARN);
    assert_eq!(resolve_level(None, false, Some("trace")), Level::TRACE);
}

#[test]
fn defaults_to_info() {
    assert_eq!(resolve_level(None, false, None), Level::INFO);
    assert_eq!(resolve_level(None, false, Some("loud")), Level::INFO);
}
