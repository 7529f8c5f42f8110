use crate::{
    Config,
    event_name::EventNameResolver,
    extraction::ExtractionResult,
    location::LocationExtractor,
    normalize::compose,
    reminder::ReminderExtractor,
    tagger::{EntityTagger, GazetteerTagger},
    time_resolver::TimeResolver,
    time_span::TimeSpanLocator,
};
use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime};
use log::debug;

/// The extraction pipeline: reminder, location, time span, event name, then
/// the time itself. Built once from a [`Config`]; parsing never mutates it, so
/// one `Hen` can serve any number of calls.
pub struct Hen<T = GazetteerTagger> {
    pub config: Config,
    reminders: ReminderExtractor,
    locations: LocationExtractor<T>,
    spans: TimeSpanLocator,
    names: EventNameResolver,
    times: TimeResolver,
}

impl Hen {
    /// Creates a new `Hen` instance, loading configuration from standard paths.
    pub fn new() -> Result<Self> {
        let config = Config::load()?;
        Self::with_config(config)
    }

    /// Creates a new `Hen` instance with a specific `Config`, tagging
    /// locations with the configured `places`.
    pub fn with_config(config: Config) -> Result<Self> {
        let tagger = GazetteerTagger::new(&config.places);
        Self::with_tagger(config, tagger)
    }
}

impl<T: EntityTagger> Hen<T> {
    /// Creates a `Hen` that asks `tagger` for location entities.
    pub fn with_tagger(config: Config, tagger: T) -> Result<Self> {
        let keywords = config
            .keywords
            .matcher()
            .context("compiling keyword patterns")?;
        let spans = TimeSpanLocator::new(keywords.clone(), config.span_pad, config.span_merge);
        let locations = LocationExtractor::new(tagger, config.location_max_len, spans.clone())
            .context("compiling location pattern")?;
        let times = TimeResolver::new(
            keywords,
            config.default_time,
            config.weekend_time,
            config.period_hours,
        );
        Ok(Self {
            config,
            reminders: ReminderExtractor,
            locations,
            spans,
            names: EventNameResolver,
            times,
        })
    }

    /// Parses `text` relative to the configured reference time, or the
    /// local wall clock when none is set.
    pub fn parse(&self, text: &str) -> ExtractionResult {
        let now = self
            .config
            .reference_datetime
            .unwrap_or_else(|| Local::now().naive_local());
        self.parse_at(text, now)
    }

    /// Parses `text` with relative dates counted from `now`.
    ///
    /// ```
    /// # use chrono::NaiveDate;
    /// # use hen_core::{Config, Hen};
    /// let hen = Hen::with_config(Config::default()).unwrap();
    /// let now = NaiveDate::from_ymd_opt(2025, 11, 7).unwrap().and_hms_opt(9, 0, 0).unwrap();
    /// let result = hen.parse_at("Họp nhóm 10h sáng mai ở phòng 302", now);
    /// assert_eq!(result.event_name.as_deref(), Some("Họp nhóm"));
    /// assert_eq!(result.location.as_deref(), Some("phòng 302"));
    /// assert_eq!(result.start_time.unwrap().to_iso(), "2025-11-08T10:00:00");
    /// ```
    pub fn parse_at(&self, text: &str, now: NaiveDateTime) -> ExtractionResult {
        let text = compose(text);
        debug!("parsing {text:?} at {now}");

        let reminder = self.reminders.extract(&text);
        let location = self.locations.extract(&reminder.residual);
        let span = self.spans.locate(&location.residual);

        let matched = span.span.as_ref().map(|s| s.text.as_str());
        let event_name = self
            .names
            .resolve(&span.prefix, matched, &span.suffix, &span.residual);
        let time = self.times.resolve(span.span_text.as_deref(), now);

        let result = ExtractionResult {
            event_name,
            start_time: time.start,
            end_time: time.end,
            location: location.location,
            reminder_minutes: reminder.minutes,
        };
        debug!("result: {result:?}");
        result
    }
}
