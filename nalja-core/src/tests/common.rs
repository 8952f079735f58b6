use crate::Config;
use chrono::{NaiveDate, NaiveDateTime};

/// Test helper to create a default `Config` for testing purposes.
///
/// Built the same way a config file without any keys would be, so tests never
/// depend on the machine's own `config.toml`.
pub fn mk_config() -> Config {
    Config::from_toml("").expect("empty config parses")
}

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
}

pub fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    day(y, m, d).and_hms_opt(h, min, 0).expect("valid test time")
}
