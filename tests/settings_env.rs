//! Environment-driven parsing. Kept in its own test binary with a single test
//! so no other test reads the process environment while it is mutated.

use clap::Parser;

use podpulse::Settings;

fn parse_with_capture(value: &str) -> Result<bool, clap::Error> {
    // SAFETY: this binary runs exactly one test, so nothing else touches the
    // environment concurrently.
    unsafe { std::env::set_var("CAPTURE_LAST_LOG", value) };
    Settings::try_parse_from(["podpulse"]).map(|settings| settings.capture_logs)
}

#[test]
fn test_capture_logs_accepts_boolish_env_values() {
    for value in ["1", "true", "yes", "on"] {
        assert!(parse_with_capture(value).unwrap(), "{value}");
    }
    for value in ["0", "false", "no", "off"] {
        assert!(!parse_with_capture(value).unwrap(), "{value}");
    }
    assert!(parse_with_capture("maybe").is_err());

    // SAFETY: as above.
    unsafe { std::env::remove_var("CAPTURE_LAST_LOG") };
    let settings = Settings::try_parse_from(["podpulse"]).unwrap();
    assert!(!settings.capture_logs);
    let settings = Settings::try_parse_from(["podpulse", "--capture-logs"]).unwrap();
    assert!(settings.capture_logs);
}
