use anyhow::{Context, Result, bail};
use chrono::Duration;
use chrono::format::{Item, StrftimeItems};
use directories::BaseDirs;
use log::warn;
use serde::Deserialize;
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use crate::heuristics::{BARE_HOUR_PM_BEFORE, Heuristics, PAST_ROLLOVER_DAYS};
use crate::keywords::Keywords;

const DEFAULT_EVENT_MINUTES: i64 = 60;
const DEFAULT_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Debug, Clone)]
pub struct Config {
    /// Thresholds for the ambiguous-input guesses.
    pub heuristics: Heuristics,
    /// Built-in keywords plus the `[synonyms]` table.
    pub keywords: Keywords,
    /// Length given to a timed event when only its start was typed. Default is one hour.
    pub event_duration: Duration,
    /// chrono format used when printing resolved dates.
    pub datetime_format: String,
}

#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    past_rollover_days: Option<i64>,
    bare_hour_pm_before: Option<u32>,
    event_duration_minutes: Option<i64>,
    datetime_format: Option<String>,
    /// Optional table:
    /// [synonyms]
    /// "낼" = "내일"
    /// "담주" = "다음주"
    synonyms: Option<HashMap<String, String>>,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_file_config(FileConfig::default())
    }
}

impl Config {
    /// Load config from disk (first XDG path, then native) and apply defaults.
    ///
    /// An unreadable or malformed file is reported with a warning and ignored.
    pub fn load() -> Result<Self> {
        let file_config = Self::read_file_config().unwrap_or_else(|e| {
            warn!("ignoring config file: {e:#}");
            FileConfig::default()
        });
        Ok(Self::from_file_config(file_config))
    }

    /// Load a specific config file. Unlike [`load`](Self::load), a missing or
    /// malformed file is an error.
    pub fn load_from(path: &Path) -> Result<Self> {
        let s = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let file_config =
            Self::parse_file(&s).with_context(|| format!("parsing {}", path.display()))?;
        Ok(Self::from_file_config(file_config))
    }

    /// Parse a TOML string into a `Config`, applying defaults for missing keys.
    pub fn from_toml(s: &str) -> Result<Self> {
        Ok(Self::from_file_config(Self::parse_file(s)?))
    }

    fn from_file_config(file_config: FileConfig) -> Self {
        let heuristics = Heuristics {
            past_rollover_days: file_config.past_rollover_days.unwrap_or(PAST_ROLLOVER_DAYS),
            bare_hour_pm_before: file_config.bare_hour_pm_before.unwrap_or(BARE_HOUR_PM_BEFORE),
        };

        let event_duration = file_config
            .event_duration_minutes
            .and_then(Duration::try_minutes)
            .unwrap_or_else(Self::default_event_duration);

        let datetime_format = file_config
            .datetime_format
            .unwrap_or_else(|| DEFAULT_DATETIME_FORMAT.to_string());

        Self {
            heuristics,
            keywords: Self::load_synonyms(&file_config.synonyms),
            event_duration,
            datetime_format,
        }
    }

    fn default_event_duration() -> Duration {
        Duration::minutes(DEFAULT_EVENT_MINUTES)
    }

    /// `~/.config/nalja/config.toml`, then the platform config dir.
    pub fn config_file_paths() -> Vec<PathBuf> {
        let mut v = Vec::new();
        if let Some(b) = BaseDirs::new() {
            let xdg = b.home_dir().join(".config").join("nalja").join("config.toml");
            v.push(xdg);
            let native = b.config_dir().join("nalja").join("config.toml");
            if !v.contains(&native) {
                v.push(native);
            }
        }
        v
    }

    /// Read the first existing config file and parse it.
    fn read_file_config() -> Result<FileConfig> {
        for path in Self::config_file_paths() {
            if !path.exists() {
                continue;
            }
            let s =
                fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
            return Self::parse_file(&s).with_context(|| format!("parsing {}", path.display()));
        }
        Ok(FileConfig::default())
    }

    fn parse_file(s: &str) -> Result<FileConfig> {
        let file_config = toml::from_str::<FileConfig>(s)?;
        if let Some(format) = &file_config.datetime_format {
            Self::check_datetime_format(format)?;
        }
        Ok(file_config)
    }

    /// Rejects formats chrono would fail on while rendering.
    pub fn check_datetime_format(format: &str) -> Result<()> {
        if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
            bail!("invalid datetime_format {format:?}");
        }
        Ok(())
    }

    /// Built-in keywords extended with `[synonyms]`, sorted so the result does
    /// not depend on table order.
    fn load_synonyms(synonyms: &Option<HashMap<String, String>>) -> Keywords {
        let mut keywords = Keywords::default();
        match synonyms {
            Some(map) if !map.is_empty() => {
                let mut pairs: Vec<(String, String)> = map
                    .iter()
                    .filter(|(alias, _)| !Keywords::is_canonical(alias))
                    .map(|(a, t)| (a.clone(), t.clone()))
                    .collect();
                pairs.sort();
                keywords.extend(&pairs);
            }
            _ => {}
        }
        keywords
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keywords::Keyword;
    use std::io::Write;

    #[test]
    fn candidates_prioritize_xdg_then_native() {
        if let Some(b) = BaseDirs::new() {
            let expected_xdg = b.home_dir().join(".config").join("nalja").join("config.toml");
            let c = Config::config_file_paths();
            assert_eq!(c.first(), Some(&expected_xdg));
            assert!(c.iter().all(|p| p.ends_with("nalja/config.toml")));
        }
    }

    #[test]
    fn empty_file_gives_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.heuristics, Heuristics::default());
        assert_eq!(config.event_duration, Duration::minutes(60));
        assert_eq!(config.datetime_format, "%Y-%m-%d %H:%M");
    }

    #[test]
    fn parse_file_accepts_heuristics_and_duration() {
        let toml = r#"
            past_rollover_days = 14
            bare_hour_pm_before = 7
            event_duration_minutes = 30
            datetime_format = "%m/%d %H:%M"
        "#;
        let config = Config::from_toml(toml).unwrap();
        assert_eq!(config.heuristics.past_rollover_days, 14);
        assert_eq!(config.heuristics.bare_hour_pm_before, 7);
        assert_eq!(config.event_duration, Duration::minutes(30));
        assert_eq!(config.datetime_format, "%m/%d %H:%M");
    }

    #[test]
    fn out_of_range_duration_falls_back() {
        let config = Config::from_toml("event_duration_minutes = 9223372036854775807").unwrap();
        assert_eq!(config.event_duration, Duration::minutes(60));
    }

    #[test]
    fn parse_file_accepts_synonyms() {
        let toml = r#"
            [synonyms]
            "낼" = "내일"
            "담주" = "다음주"
            PM = "오후"
        "#;
        let config = Config::from_toml(toml).unwrap();
        assert!(config.keywords.matches(Keyword::Tomorrow, "낼"));
        assert!(config.keywords.matches(Keyword::NextWeek, "담주"));
        assert!(config.keywords.matches(Keyword::Pm, "pm"));
    }

    #[test]
    fn parse_file_no_accepts_canonical_synonyms() {
        let toml = r#"
            [synonyms]
            "오늘" = "내일"
            "낼" = "내일"
        "#;
        let config = Config::from_toml(toml).unwrap();
        assert!(config.keywords.matches(Keyword::Today, "오늘"));
        assert!(!config.keywords.matches(Keyword::Tomorrow, "오늘"));
        assert!(config.keywords.matches(Keyword::Tomorrow, "낼"));
    }

    #[test]
    fn malformed_file_is_an_error() {
        assert!(Config::from_toml("past_rollover_days = \"soon\"").is_err());
        assert!(Config::from_toml("[synonyms").is_err());
    }

    #[test]
    fn unrenderable_datetime_format_is_an_error() {
        let err = Config::from_toml("datetime_format = \"%Q\"").unwrap_err();
        assert!(format!("{err:#}").contains("%Q"));
        assert!(Config::check_datetime_format("%Y-%m-%d %H:%M").is_ok());
        assert!(Config::check_datetime_format("%d/%m %").is_err());
    }

    #[test]
    fn load_from_rejects_unrenderable_datetime_format() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "datetime_format = \"%Y %Q\"").unwrap();
        let err = Config::load_from(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("parsing"));
    }

    #[test]
    fn load_from_reads_a_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "bare_hour_pm_before = 9").unwrap();
        writeln!(file, "[synonyms]").unwrap();
        writeln!(file, "\"낼\" = \"내일\"").unwrap();
        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.heuristics.bare_hour(8), 20);
        assert!(config.keywords.matches(Keyword::Tomorrow, "낼"));
    }

    #[test]
    fn load_from_missing_file_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let err = Config::load_from(&path).unwrap_err();
        assert!(format!("{err:#}").contains("absent.toml"));
    }
}
