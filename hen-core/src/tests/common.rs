use crate::Config;
use chrono::{NaiveDate, NaiveDateTime};

/// Friday 2025-11-07 09:00, the "now" every test runs at.
pub fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 11, 7)
        .and_then(|d| d.and_hms_opt(9, 0, 0))
        .expect("valid datetime")
}

/// Test helper to create a default `Config` for testing purposes.
///
/// This is the single source of truth for test configuration.
/// If you add a field to `Config`, you only need to update it here.
pub fn mk_config() -> Config {
    Config {
        reference_datetime: Some(now()),
        ..Config::default()
    }
}
