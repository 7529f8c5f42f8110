//! Turning a located time span into absolute date-times.
//!
//! Each fragment kind is looked up on its own over the folded span text.
//! The day and the hour are then picked separately, each from the most
//! specific fragment that produced one:
//!
//! - day: explicit date, duration, relative-day keyword, weekday, today;
//! - hour: clock time, sub-day duration, `cuối tuần`, period of day, the
//!   configured default.

use std::ops::Range;

use chrono::{
    Datelike, Days, Duration, FixedOffset, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeZone,
    Timelike, Weekday,
};
use log::debug;
use regex::Captures;

use crate::config::PeriodHours;
use crate::extraction::EventTime;
use crate::keywords::{Keyword, KeywordMatcher};
use crate::normalize::{FoldedText, compose};
use crate::patterns::{
    CLOCK_COLON, CLOCK_GIO, CLOCK_H, DURATION_LEAD, DURATION_TRAIL, EXPLICIT_DATE, NUMERIC_DATE,
    RANGE_JOINER, TIMEZONE, TIMEZONE_WORD, WEEKDAY,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolvedTime {
    pub start: Option<EventTime>,
    pub end: Option<EventTime>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Clock {
    hour: u32,
    minute: u32,
    /// Index of the pattern that found it; lower is more explicit.
    rank: usize,
    start: usize,
    end: usize,
}

impl Clock {
    fn overlaps(&self, range: &Range<usize>) -> bool {
        self.start < range.end && range.start < self.end
    }

    fn time(&self) -> Option<NaiveTime> {
        NaiveTime::from_hms_opt(self.hour, self.minute, 0)
    }

    /// `3h chiều` is 15:00; `14h chiều` stays 14:00; `1h trưa` is 13:00.
    fn shifted(mut self, period: Option<Keyword>) -> Self {
        let pm = match period {
            Some(Keyword::Noon) => (1..=2).contains(&self.hour),
            Some(Keyword::Afternoon | Keyword::Evening) => (1..=11).contains(&self.hour),
            Some(Keyword::Night) => (6..=11).contains(&self.hour),
            _ => false,
        };
        if pm {
            self.hour += 12;
        }
        self
    }
}

#[derive(Debug, Clone, Copy)]
struct Offset {
    at: NaiveDateTime,
    /// Minutes or hours: the offset names a time of day as well as a day.
    sub_day: bool,
}

/// The relative day named by a keyword or weekday.
#[derive(Debug, Clone, Copy)]
struct RelativeDay {
    date: NaiveDate,
    weekend: bool,
}

#[derive(Debug, Clone)]
pub struct TimeResolver {
    keywords: KeywordMatcher,
    default_time: NaiveTime,
    weekend_time: NaiveTime,
    period_hours: PeriodHours,
}

impl TimeResolver {
    pub fn new(
        keywords: KeywordMatcher,
        default_time: NaiveTime,
        weekend_time: NaiveTime,
        period_hours: PeriodHours,
    ) -> Self {
        Self {
            keywords,
            default_time,
            weekend_time,
            period_hours,
        }
    }

    /// Resolves `span` against `now`. No span means no time at all.
    pub fn resolve(&self, span: Option<&str>, now: NaiveDateTime) -> ResolvedTime {
        let Some(span) = span else {
            return ResolvedTime::default();
        };
        let span = compose(span);
        let folded = FoldedText::new(&span);
        let text = folded.as_str();

        let timezone = timezone(text);
        let offset = duration(text, now);

        let mut taken: Vec<Range<usize>> = Vec::new();
        taken.extend(timezone.as_ref().map(|(_, range)| range.clone()));
        taken.extend(offset.as_ref().map(|(_, range)| range.clone()));

        let periods = self.keywords.periods(&folded);
        let period = periods.first().map(|(keyword, _)| *keyword);
        let clocks = clocks(text, &taken);
        let own = clock_periods(&clocks, &periods);
        let (clock, range_end) = match clock_range(text, &clocks) {
            Some(i) => {
                let (from, to) = (clocks[i], clocks[i + 1]);
                let (mut from_period, mut to_period) = (own[i], own[i + 1]);
                // `2h tới 4h chiều`: one period word covers both ends, unless
                // the range runs past it (`10h đến 1h chiều`).
                if from.hour < to.hour {
                    from_period = from_period.or(to_period);
                    to_period = to_period.or(from_period);
                }
                (Some(from.shifted(from_period)), Some(to.shifted(to_period)))
            }
            None => {
                let first = clocks
                    .iter()
                    .enumerate()
                    .min_by_key(|(_, c)| (c.rank, c.start))
                    .map(|(i, c)| c.shifted(own[i]));
                (first, None)
            }
        };

        let relative = self.relative_day(&folded, now.date());

        let day = if let Some(date) = explicit_date(text, now.year()) {
            debug!("day from explicit date: {date}");
            date
        } else if let Some((offset, _)) = offset {
            debug!("day from duration: {}", offset.at);
            offset.at.date()
        } else if let Some(relative) = relative {
            debug!("day from relative word: {}", relative.date);
            relative.date
        } else {
            now.date()
        };

        let time = if let Some(time) = clock.and_then(|c| c.time()) {
            debug!("time from clock: {time}");
            time
        } else if let Some((offset, _)) = offset.filter(|(o, _)| o.sub_day) {
            debug!("time from duration: {}", offset.at);
            offset.at.time().with_second(0).unwrap_or(self.default_time)
        } else if relative.is_some_and(|r| r.weekend) {
            self.weekend_time
        } else if let Some(time) = period
            .and_then(|p| self.period_hours.hour(p))
            .and_then(|h| NaiveTime::from_hms_opt(h, 0, 0))
        {
            debug!("time from period {period:?}: {time}");
            time
        } else {
            self.default_time
        };

        let start = NaiveDateTime::new(day, time.with_nanosecond(0).unwrap_or(time));
        let end = range_end.and_then(|c| c.time()).map(|end_time| {
            let end = NaiveDateTime::new(day, end_time);
            if end > start {
                end
            } else {
                end + Duration::days(1)
            }
        });

        let zone = |at: NaiveDateTime| match &timezone {
            Some((tz, _)) => tz
                .from_local_datetime(&at)
                .single()
                .map_or(EventTime::Local(at), EventTime::Zoned),
            None => EventTime::Local(at),
        };
        ResolvedTime {
            start: Some(zone(start)),
            end: end.map(zone),
        }
    }

    fn relative_day(&self, folded: &FoldedText, today: NaiveDate) -> Option<RelativeDay> {
        let keyword = self
            .keywords
            .days(folded)
            .into_iter()
            .find_map(|(keyword, _)| match keyword {
                Keyword::Weekend => Some(RelativeDay {
                    date: upcoming(today, Weekday::Sat, false, true),
                    weekend: true,
                }),
                _ => keyword.day_offset().map(|days| RelativeDay {
                    date: today + Duration::days(days),
                    weekend: false,
                }),
            });
        keyword.or_else(|| {
            let caps = WEEKDAY.captures(folded.as_str())?;
            let target = weekday(&caps)?;
            let next_week = caps.get(4).is_some();
            Some(RelativeDay {
                date: upcoming(today, target, next_week, false),
                weekend: false,
            })
        })
    }
}

/// Next `target` from `today`. A weekday never means today: asking for
/// today's weekday, or for `tuần sau`, adds a week. `cuối tuần` on a
/// Saturday is the same day.
fn upcoming(today: NaiveDate, target: Weekday, next_week: bool, allow_today: bool) -> NaiveDate {
    let ahead = (target.num_days_from_monday() as i64
        - today.weekday().num_days_from_monday() as i64)
        .rem_euclid(7);
    let ahead = if next_week || (ahead == 0 && !allow_today) {
        ahead + 7
    } else {
        ahead
    };
    today + Duration::days(ahead)
}

fn weekday(caps: &Captures) -> Option<Weekday> {
    if caps.get(2).is_some() {
        return Some(Weekday::Sun);
    }
    let day = caps.get(1).or_else(|| caps.get(3))?.as_str();
    match day {
        "2" | "hai" => Some(Weekday::Mon),
        "3" | "ba" => Some(Weekday::Tue),
        "4" | "tu" => Some(Weekday::Wed),
        "5" | "nam" => Some(Weekday::Thu),
        "6" | "sau" => Some(Weekday::Fri),
        "7" | "bay" => Some(Weekday::Sat),
        _ => None,
    }
}

fn timezone(text: &str) -> Option<(FixedOffset, Range<usize>)> {
    [&*TIMEZONE, &*TIMEZONE_WORD].into_iter().find_map(|re| {
        let caps = re.captures(text)?;
        let hours: i32 = caps.get(2)?.as_str().parse().ok()?;
        let minutes: i32 = caps.get(3).map_or(Some(0), |m| m.as_str().parse().ok())?;
        if hours > 14 {
            return None;
        }
        let sign = if caps.get(1).is_some_and(|s| s.as_str() == "-") { -1 } else { 1 };
        let offset = FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))?;
        debug!("timezone: {offset}");
        Some((offset, caps.get(0)?.range()))
    })
}

/// Clock times in `text` that don't overlap `taken`, by position. When two
/// patterns find the same time, the more explicit one is kept.
fn clocks(text: &str, taken: &[Range<usize>]) -> Vec<Clock> {
    let mut found: Vec<Clock> = Vec::new();
    for (rank, re) in [&*CLOCK_COLON, &*CLOCK_H, &*CLOCK_GIO].into_iter().enumerate() {
        for caps in re.captures_iter(text) {
            let Some(clock) = clock(rank, &caps) else {
                continue;
            };
            let clash = taken.iter().any(|r| clock.overlaps(r))
                || found.iter().any(|c| clock.overlaps(&(c.start..c.end)));
            if !clash {
                found.push(clock);
            }
        }
    }
    found.sort_by_key(|c| c.start);
    found
}

fn clock(rank: usize, caps: &Captures) -> Option<Clock> {
    let whole = caps.get(0)?;
    let number = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<u32>().ok());
    let hour = number(1)?;
    let (hour, minute) = if rank == 2 {
        if caps.get(2).is_some() {
            (hour, 30)
        } else if let Some(before) = number(3) {
            // `10 giờ kém 15` is 9:45.
            match before {
                0 => (hour, 0),
                1..=59 => ((hour + 23) % 24, 60 - before),
                _ => return None,
            }
        } else {
            (hour, number(4).unwrap_or(0))
        }
    } else {
        // `9h30` or `9h 30 phút`; the second form keeps its minutes in 3.
        (hour, number(2).or_else(|| number(3)).unwrap_or(0))
    };
    if hour > 23 || minute > 59 {
        return None;
    }
    Some(Clock {
        hour,
        minute,
        rank,
        start: whole.start(),
        end: whole.end(),
    })
}

/// The period word each clock time reads with: the first one after it and
/// before the next clock. Period words ahead of every clock (`chiều mai 3h`)
/// go to the first clock when it has none of its own.
fn clock_periods(clocks: &[Clock], periods: &[(Keyword, Range<usize>)]) -> Vec<Option<Keyword>> {
    let mut own: Vec<Option<Keyword>> = vec![None; clocks.len()];
    let mut leading = None;
    for (keyword, range) in periods {
        match clocks.iter().rposition(|c| c.end <= range.start) {
            Some(i) => {
                own[i].get_or_insert(*keyword);
            }
            None => {
                leading.get_or_insert(*keyword);
            }
        }
    }
    if let (Some(first), Some(keyword)) = (own.first_mut(), leading) {
        first.get_or_insert(keyword);
    }
    own
}

/// `9h đến 11h`, `9:00 - 11:00`, `8h sáng đến 5h chiều`: the index of the
/// first of two clock times with only a joiner between them.
fn clock_range(text: &str, clocks: &[Clock]) -> Option<usize> {
    clocks
        .windows(2)
        .position(|pair| RANGE_JOINER.is_match(&text[pair[0].end..pair[1].start]))
}

fn explicit_date(text: &str, base_year: i32) -> Option<NaiveDate> {
    [&*EXPLICIT_DATE, &*NUMERIC_DATE]
        .into_iter()
        .flat_map(|re| re.captures_iter(text))
        .find_map(|caps| {
            let day: u32 = caps.get(1)?.as_str().parse().ok()?;
            let month: u32 = caps.get(2)?.as_str().parse().ok()?;
            let year = match caps.get(3) {
                Some(y) => y.as_str().parse().ok()?,
                None => base_year,
            };
            let date = NaiveDate::from_ymd_opt(year, month, day);
            if date.is_none() {
                debug!("ignoring impossible date {day}/{month}/{year}");
            }
            date
        })
}

/// `sau 30 phút`, `trong 2 ngày`, `3 tuần nữa`. A `sau` that belongs to
/// `tuần sau` does not start a duration.
fn duration(text: &str, now: NaiveDateTime) -> Option<(Offset, Range<usize>)> {
    [&*DURATION_LEAD, &*DURATION_TRAIL]
        .into_iter()
        .flat_map(|re| re.captures_iter(text))
        .filter(|caps| {
            caps.get(0)
                .is_some_and(|m| !text[..m.start()].trim_end().ends_with("tuan"))
        })
        .find_map(|caps| {
            let n: u32 = caps.get(1)?.as_str().parse().ok()?;
            let unit = caps.get(2)?.as_str();
            let (at, sub_day) = match unit {
                "phut" | "p" => (now.checked_add_signed(Duration::try_minutes(n.into())?)?, true),
                "gio" | "tieng" | "h" => {
                    (now.checked_add_signed(Duration::try_hours(n.into())?)?, true)
                }
                "ngay" => (now.checked_add_days(Days::new(n.into()))?, false),
                "tuan" => (now.checked_add_days(Days::new(u64::from(n) * 7))?, false),
                "thang" => (now.checked_add_months(Months::new(n))?, false),
                _ => return None,
            };
            Some((Offset { at, sub_day }, caps.get(0)?.range()))
        })
}
