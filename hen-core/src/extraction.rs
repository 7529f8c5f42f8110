use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Serialize, Serializer};

/// A resolved date-time. It carries an offset only when the text named a
/// timezone (`UTC+7`, `múi giờ +9`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventTime {
    Local(NaiveDateTime),
    Zoned(DateTime<FixedOffset>),
}

impl EventTime {
    /// Wall-clock date-time, ignoring any offset.
    pub fn naive(&self) -> NaiveDateTime {
        match self {
            EventTime::Local(t) => *t,
            EventTime::Zoned(t) => t.naive_local(),
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.naive().date()
    }

    pub fn time(&self) -> NaiveTime {
        self.naive().time()
    }

    pub fn offset(&self) -> Option<FixedOffset> {
        match self {
            EventTime::Local(_) => None,
            EventTime::Zoned(t) => Some(*t.offset()),
        }
    }

    /// `2025-11-08T10:00:00`, or `2025-11-08T10:00:00+07:00` with an offset.
    pub fn to_iso(&self) -> String {
        match self {
            EventTime::Local(t) => t.format("%Y-%m-%dT%H:%M:%S").to_string(),
            EventTime::Zoned(t) => t.format("%Y-%m-%dT%H:%M:%S%:z").to_string(),
        }
    }
}

impl fmt::Display for EventTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_iso())
    }
}

impl Serialize for EventTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_iso())
    }
}

/// Everything understood from one utterance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractionResult {
    pub event_name: Option<String>,
    pub start_time: Option<EventTime>,
    pub end_time: Option<EventTime>,
    pub location: Option<String>,
    pub reminder_minutes: u32,
}

impl ExtractionResult {
    /// Neither a name nor a time could be found: the text was not understood.
    pub fn is_empty(&self) -> bool {
        self.event_name.is_none() && self.start_time.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn iso_output() {
        let local = EventTime::Local(at(2025, 11, 8, 10, 0));
        assert_eq!(local.to_iso(), "2025-11-08T10:00:00");
        assert_eq!(local.offset(), None);

        let offset = FixedOffset::east_opt(7 * 3600).unwrap();
        let zoned = EventTime::Zoned(at(2025, 11, 8, 10, 0).and_local_timezone(offset).unwrap());
        assert_eq!(zoned.to_iso(), "2025-11-08T10:00:00+07:00");
        assert_eq!(zoned.time(), NaiveTime::from_hms_opt(10, 0, 0).unwrap());
    }

    #[test]
    fn serializes_as_json_record() {
        let result = ExtractionResult {
            event_name: Some("Họp nhóm".into()),
            start_time: Some(EventTime::Local(at(2025, 11, 8, 10, 0))),
            end_time: None,
            location: Some("phòng 302".into()),
            reminder_minutes: 15,
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "event_name": "Họp nhóm",
                "start_time": "2025-11-08T10:00:00",
                "end_time": null,
                "location": "phòng 302",
                "reminder_minutes": 15,
            })
        );
    }

    #[test]
    fn empty_result() {
        assert!(ExtractionResult::default().is_empty());
        let named = ExtractionResult {
            event_name: Some("họp".into()),
            ..Default::default()
        };
        assert!(!named.is_empty());
    }
}
