use anyhow::{Context, Result, bail};
use chrono::format::{Item, StrftimeItems};
use chrono::{NaiveDateTime, NaiveTime};
use directories::BaseDirs;
use serde::Deserialize;
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use crate::keywords::{Keyword, Keywords};
use crate::time_span::SpanMergePolicy;

#[derive(Debug, Clone)]
pub struct Config {
    /// Hour used when the text names a day but no time of day.
    /// Valid format is "%H:%M" (e.g. 08:40 or 16:33). Default is 09:00.
    pub default_time: NaiveTime,
    /// Hour used for `cuối tuần` without an explicit time. Default is 09:00.
    pub weekend_time: NaiveTime,
    pub period_hours: PeriodHours,
    /// Characters of context kept on each side of the time span.
    pub span_pad: usize,
    pub span_merge: SpanMergePolicy,
    /// Longest location taken after `ở`/`tại` when no tagger recognises one.
    pub location_max_len: usize,
    /// Place names known to the built-in gazetteer tagger.
    pub places: Vec<String>,
    /// Keyword registry, including user synonyms.
    pub keywords: Keywords,
    pub datetime_format: String,
    /// Pins "now". Never read from the config file.
    pub reference_datetime: Option<NaiveDateTime>,
}

/// Default hours for the period-of-day words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PeriodHours {
    pub morning: u32,
    pub noon: u32,
    pub afternoon: u32,
    pub evening: u32,
    pub night: u32,
}

impl Default for PeriodHours {
    fn default() -> Self {
        Self {
            morning: 8,
            noon: 12,
            afternoon: 15,
            evening: 20,
            night: 22,
        }
    }
}

impl PeriodHours {
    /// The default hour of a period keyword; `None` for day keywords.
    pub fn hour(&self, keyword: Keyword) -> Option<u32> {
        match keyword {
            Keyword::Morning => Some(self.morning),
            Keyword::Noon => Some(self.noon),
            Keyword::Afternoon => Some(self.afternoon),
            Keyword::Evening => Some(self.evening),
            Keyword::Night => Some(self.night),
            _ => None,
        }
    }

    fn validate(&self) -> Result<()> {
        for (name, hour) in [
            ("morning", self.morning),
            ("noon", self.noon),
            ("afternoon", self.afternoon),
            ("evening", self.evening),
            ("night", self.night),
        ] {
            if hour > 23 {
                bail!("period_hours.{name} must be between 0 and 23, got {hour}");
            }
        }
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    default_time: Option<String>,
    weekend_time: Option<String>,
    period_hours: Option<PeriodHours>,
    span_pad: Option<usize>,
    span_merge: Option<SpanMergePolicy>,
    location_max_len: Option<usize>,
    places: Option<Vec<String>>,
    datetime_format: Option<String>,
    /// Optional table:
    /// [synonyms]
    /// "bữa nay" = "today"
    /// "mai nha" = "ngày mai"
    synonyms: Option<HashMap<String, String>>,
}

const DEFAULT_DATETIME_FORMAT: &str = "%a, %d/%m/%Y %H:%M";

impl Default for Config {
    fn default() -> Self {
        Self {
            default_time: Self::default_fallback_time(),
            weekend_time: Self::default_fallback_time(),
            period_hours: PeriodHours::default(),
            span_pad: 5,
            span_merge: SpanMergePolicy::default(),
            location_max_len: 50,
            places: Vec::new(),
            keywords: Keywords::default(),
            datetime_format: DEFAULT_DATETIME_FORMAT.to_string(),
            reference_datetime: None,
        }
    }
}

impl Config {
    /// Public entrypoint: load config from disk (first XDG path, then native)
    /// and apply defaults. No file at all means the defaults; a file that is
    /// there but cannot be read or parsed is an error.
    pub fn load() -> Result<Self> {
        let file_config = Self::read_file_config()?;
        Self::from_file_config(file_config)
    }

    /// Loads the config from one specific file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let file_config = Self::read_path(path)?;
        Self::from_file_config(file_config)
    }

    /// Config file candidates, in the order they are tried.
    pub fn config_file_paths() -> Vec<PathBuf> {
        let mut v = Vec::new();
        if let Some(b) = BaseDirs::new() {
            let xdg = b.home_dir().join(".config").join("hen").join("config.toml");
            v.push(xdg);
            let native = b.config_dir().join("hen").join("config.toml");
            if !v.contains(&native) {
                v.push(native);
            }
        }
        v
    }

    fn from_file_config(file_config: FileConfig) -> Result<Self> {
        let defaults = Self::default();

        let default_time = match file_config.default_time.as_deref() {
            Some(time) => Self::parse_time(time).context("invalid default_time")?,
            None => defaults.default_time,
        };
        let weekend_time = match file_config.weekend_time.as_deref() {
            Some(time) => Self::parse_time(time).context("invalid weekend_time")?,
            None => defaults.weekend_time,
        };

        let period_hours = file_config.period_hours.unwrap_or_default();
        period_hours.validate()?;

        let datetime_format = file_config
            .datetime_format
            .unwrap_or(defaults.datetime_format);
        if StrftimeItems::new(&datetime_format).any(|item| matches!(item, Item::Error)) {
            bail!("invalid datetime_format {datetime_format:?}");
        }

        let mut keywords = defaults.keywords;
        Self::load_synonyms(&mut keywords, &file_config.synonyms);

        Ok(Self {
            default_time,
            weekend_time,
            period_hours,
            span_pad: file_config.span_pad.unwrap_or(defaults.span_pad),
            span_merge: file_config.span_merge.unwrap_or(defaults.span_merge),
            location_max_len: file_config
                .location_max_len
                .filter(|&len| len > 0)
                .unwrap_or(defaults.location_max_len),
            places: file_config.places.unwrap_or_default(),
            keywords,
            datetime_format,
            reference_datetime: None,
        })
    }

    /// Default fallback time when the user didn't set one in config.
    fn default_fallback_time() -> NaiveTime {
        NaiveTime::from_hms_opt(9, 0, 0).unwrap_or(NaiveTime::MIN)
    }

    /// Parse a "%H:%M" string into NaiveTime.
    fn parse_time(time: &str) -> Result<NaiveTime> {
        NaiveTime::parse_from_str(time.trim(), "%H:%M")
            .with_context(|| format!("expected HH:MM, got {time:?}"))
    }

    /// Read the first existing config file and parse it.
    fn read_file_config() -> Result<FileConfig> {
        for path in Self::config_file_paths() {
            if !path.exists() {
                continue;
            }
            return Self::read_path(&path);
        }
        Ok(FileConfig::default())
    }

    fn read_path(path: &Path) -> Result<FileConfig> {
        let s = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        Self::parse_file(&s).with_context(|| format!("parsing {}", path.display()))
    }

    /// Parse a TOML string into `FileConfig`.
    fn parse_file(s: &str) -> Result<FileConfig> {
        Ok(toml::from_str::<FileConfig>(s)?)
    }

    /// Merge `[synonyms]` into the keyword registry.
    /// Omits synonyms that collide with a canonical Keyword name (eg. "today").
    fn load_synonyms(keywords: &mut Keywords, synonyms: &Option<HashMap<String, String>>) {
        match synonyms {
            Some(map) if !map.is_empty() => {
                let mut pairs: Vec<(String, String)> = map
                    .iter()
                    .filter(|(alias, _)| !Keywords::is_canonical(&alias.to_lowercase()))
                    .map(|(a, t)| (a.clone(), t.clone()))
                    .collect();
                // HashMap order is random; keep the registry deterministic.
                pairs.sort();

                if !pairs.is_empty() {
                    keywords.extend(&pairs);
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn candidates_prioritize_xdg_then_native() {
        if let Some(b) = BaseDirs::new() {
            let expected_xdg = b.home_dir().join(".config").join("hen").join("config.toml");
            let c = super::Config::config_file_paths();
            assert_eq!(c.first(), Some(&expected_xdg));
            let expected_native = b.config_dir().join("hen").join("config.toml");
            assert!(c.contains(&expected_native));
        }
    }

    #[test]
    fn empty_file_gives_defaults() {
        let fc = super::Config::parse_file("").unwrap();
        let config = super::Config::from_file_config(fc).unwrap();
        assert_eq!(config.default_time, NaiveTime::from_hms_opt(9, 0, 0).unwrap());
        assert_eq!(config.span_pad, 5);
        assert_eq!(config.location_max_len, 50);
        assert_eq!(config.period_hours, PeriodHours::default());
        assert_eq!(config.span_merge, SpanMergePolicy::Enclosing);
        assert_eq!(config.datetime_format, DEFAULT_DATETIME_FORMAT);
    }

    #[test]
    fn parse_file_accepts_times_and_tables() {
        let toml = r#"
            default_time = "07:30"
            weekend_time = "10:00"
            span_pad = 3
            places = ["Hồ Gươm", "đại học sài gòn"]

            [period_hours]
            evening = 19
        "#;
        let fc = super::Config::parse_file(toml).unwrap();
        let config = super::Config::from_file_config(fc).unwrap();
        assert_eq!(config.default_time, NaiveTime::from_hms_opt(7, 30, 0).unwrap());
        assert_eq!(config.weekend_time, NaiveTime::from_hms_opt(10, 0, 0).unwrap());
        assert_eq!(config.span_pad, 3);
        assert_eq!(config.places.len(), 2);
        assert_eq!(config.period_hours.evening, 19);
        assert_eq!(config.period_hours.morning, 8);
    }

    #[test]
    fn parse_file_accepts_merge_policy() {
        let fc = super::Config::parse_file(
            r#"
            [span_merge.adjacent]
            max_gap = 4
        "#,
        )
        .unwrap();
        let config = super::Config::from_file_config(fc).unwrap();
        assert_eq!(config.span_merge, SpanMergePolicy::Adjacent { max_gap: 4 });
    }

    #[test]
    fn parse_file_accepts_synonyms_and_extends_registry() {
        let toml = r#"
            [synonyms]
            "bữa kia" = "day-before-yesterday"
            "MAI NHA" = "ngày mai"
        "#;

        let fc = super::Config::parse_file(toml).unwrap();
        assert!(fc.synonyms.is_some());
        let config = super::Config::from_file_config(fc).unwrap();

        assert!(config.keywords.matches(Keyword::DayBeforeYesterday, "bữa kia"));
        assert!(config.keywords.matches(Keyword::Tomorrow, "mai nha"));
    }

    #[test]
    fn parse_file_no_accepts_canonical_synonyms() {
        let toml = r#"
            [synonyms]
            tomorrow = "yesterday"
            "hôm trước" = "yesterday"
        "#;

        let fc = super::Config::parse_file(toml).unwrap();
        let config = super::Config::from_file_config(fc).unwrap();

        assert!(!config.keywords.matches(Keyword::Yesterday, "tomorrow"));
        assert!(config.keywords.matches(Keyword::Yesterday, "hôm trước"));
    }

    #[test]
    fn rejects_bad_values() {
        for toml in [
            r#"default_time = "9am""#,
            r#"weekend_time = "25:00""#,
            "[period_hours]\nmorning = 24",
            r#"datetime_format = "%Q""#,
        ] {
            let fc = super::Config::parse_file(toml).unwrap();
            assert!(super::Config::from_file_config(fc).is_err(), "{toml}");
        }
    }

    #[test]
    fn load_from_reads_the_given_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "default_time = \"18:15\"").unwrap();
        let config = super::Config::load_from(file.path()).unwrap();
        assert_eq!(config.default_time, NaiveTime::from_hms_opt(18, 15, 0).unwrap());
    }

    #[test]
    fn load_from_reports_malformed_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "default_time = ").unwrap();
        let err = super::Config::load_from(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("parsing"));
    }

    #[test]
    fn load_from_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = super::Config::load_from(&dir.path().join("nope.toml")).unwrap_err();
        assert!(format!("{err:#}").contains("reading"));
    }
}
