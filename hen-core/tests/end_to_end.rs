use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Weekday};
use hen_core::{Config, ExtractionResult, Hen, NoopTagger, reminder::ReminderExtractor};

/// Friday 2025-11-07 09:00.
fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 11, 7)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap()
}

fn parse(text: &str) -> ExtractionResult {
    Hen::with_config(Config::default())
        .unwrap()
        .parse_at(text, now())
}

fn start(result: &ExtractionResult) -> String {
    result.start_time.unwrap().to_iso()
}

#[test]
fn meeting_tomorrow_morning_in_a_room() {
    let r = parse("Họp nhóm 10h sáng mai ở phòng 302");
    assert_eq!(r.event_name.as_deref(), Some("Họp nhóm"));
    assert_eq!(start(&r), "2025-11-08T10:00:00");
    assert_eq!(r.end_time, None);
    assert_eq!(r.location.as_deref(), Some("phòng 302"));
    assert_eq!(r.reminder_minutes, 0);
}

#[test]
fn client_next_monday_with_reminder() {
    let r = parse("Gặp khách 14h thứ 2 tuần sau nhắc trước 30 phút");
    assert_eq!(r.event_name.as_deref(), Some("Gặp khách"));
    let start = r.start_time.unwrap();
    assert_eq!(start.date().weekday(), Weekday::Mon);
    assert!(start.date() > now().date());
    assert_eq!(start.to_iso(), "2025-11-17T14:00:00");
    assert_eq!(r.reminder_minutes, 30);
}

#[test]
fn thesis_defence_on_an_explicit_date() {
    let r = parse("đi bảo vệ luận văn ngày 20 tháng 11 năm 2026 tại đại học sài gòn");
    assert_eq!(r.event_name.as_deref(), Some("đi bảo vệ luận văn"));
    assert_eq!(start(&r), "2026-11-20T09:00:00");
    assert_eq!(r.location.as_deref(), Some("đại học sài gòn"));
    assert_eq!(r.reminder_minutes, 0);
}

#[test]
fn empty_input() {
    let r = parse("");
    assert_eq!(r, ExtractionResult::default());
    assert!(r.is_empty());
}

#[test]
fn text_without_anything() {
    let r = parse("họp");
    assert_eq!(r.event_name.as_deref(), Some("họp"));
    assert_eq!(r.start_time, None);
    assert_eq!(r.location, None);
}

#[test]
fn explicit_clock_beats_period() {
    assert_eq!(start(&parse("họp 14h chiều mai")), "2025-11-08T14:00:00");
}

#[test]
fn reminder_units() {
    assert_eq!(parse("Họp nhóm 9h nhắc trước 2 giờ").reminder_minutes, 120);
    assert_eq!(parse("Họp nhóm 9h nhắc trước 15 phút").reminder_minutes, 15);
    assert_eq!(parse("Họp nhóm 9h").reminder_minutes, 0);
}

#[test]
fn explicit_date_round_trip() {
    let start = parse("ngày 20 tháng 11").start_time.unwrap();
    assert_eq!((start.date().month(), start.date().day()), (11, 20));
}

#[test]
fn time_range() {
    let r = parse("họp từ 9h đến 11h sáng mai");
    assert_eq!(r.event_name.as_deref(), Some("họp"));
    assert_eq!(start(&r), "2025-11-08T09:00:00");
    assert_eq!(r.end_time.unwrap().to_iso(), "2025-11-08T11:00:00");
}

#[test]
fn timezone_in_output() {
    let r = parse("gọi cho đối tác 10h mai UTC+7");
    assert_eq!(r.event_name.as_deref(), Some("gọi cho đối tác"));
    assert_eq!(start(&r), "2025-11-08T10:00:00+07:00");
    let json = serde_json::to_value(&r).unwrap();
    assert_eq!(json["start_time"], "2025-11-08T10:00:00+07:00");
}

#[test]
fn duration_and_weekend() {
    assert_eq!(start(&parse("gọi lại sau 30 phút")), "2025-11-07T09:30:00");
    assert_eq!(start(&parse("nộp bài trong 2 ngày")), "2025-11-09T09:00:00");
    let r = parse("đi chơi cuối tuần");
    assert_eq!(r.event_name.as_deref(), Some("đi chơi"));
    assert_eq!(start(&r), "2025-11-08T09:00:00");
}

#[test]
fn works_without_diacritics() {
    let r = parse("hop nhom 3h chieu mai o phong 302 nhac truoc 15 phut");
    assert_eq!(r.event_name.as_deref(), Some("hop nhom"));
    assert_eq!(start(&r), "2025-11-08T15:00:00");
    assert_eq!(r.location.as_deref(), Some("phong 302"));
    assert_eq!(r.reminder_minutes, 15);
}

#[test]
fn determinism() {
    let hen = Hen::with_tagger(Config::default(), NoopTagger).unwrap();
    for text in [
        "Họp nhóm 10h sáng mai ở phòng 302",
        "Gặp khách 14h thứ 2 tuần sau nhắc trước 30 phút",
        "đi chơi cuối tuần",
        "",
    ] {
        assert_eq!(hen.parse_at(text, now()), hen.parse_at(text, now()));
    }
}

#[test]
fn weekday_never_resolves_to_today() {
    let hen = Hen::with_config(Config::default()).unwrap();
    let days = [
        ("thứ 2", Weekday::Mon),
        ("thứ 3", Weekday::Tue),
        ("thứ 4", Weekday::Wed),
        ("thứ 5", Weekday::Thu),
        ("thứ 6", Weekday::Fri),
        ("thứ 7", Weekday::Sat),
        ("chủ nhật", Weekday::Sun),
    ];
    for offset in 0..7 {
        let now = now() + Duration::days(offset);
        for (word, weekday) in days {
            let date = hen
                .parse_at(&format!("họp {word}"), now)
                .start_time
                .unwrap()
                .date();
            assert_eq!(date.weekday(), weekday, "{word} from {now}");
            assert!(date > now.date(), "{word} from {now}");
            assert!(date - now.date() <= Duration::days(7), "{word} from {now}");
        }
    }
}

#[test]
fn reminder_stripping_is_idempotent() {
    for text in [
        "Gặp khách 14h thứ 2 tuần sau nhắc trước 30 phút",
        "Sinh nhật mẹ nhắc tôi trước 1 ngày",
        "1 tiếng trước báo tôi đi khám",
    ] {
        let first = ReminderExtractor.extract(text);
        assert!(first.had_phrase, "{text:?}");
        let second = ReminderExtractor.extract(&first.residual);
        assert!(!second.had_phrase, "{text:?}");
        assert_eq!(second.minutes, 0);
    }
}

#[test]
fn number_after_a_clock_is_not_minutes() {
    let r = parse("Họp 9h 15 người");
    assert_eq!(start(&r), "2025-11-07T09:00:00");
    assert_eq!(r.event_name.as_deref(), Some("Họp 15 người"));
    assert_eq!(start(&parse("Đá bóng 5h 2 đội mai")), "2025-11-08T05:00:00");
}

#[test]
fn unmarked_hour_reminders() {
    let r = parse("Họp nhóm nhắc tôi 1 tiếng");
    assert_eq!(r.reminder_minutes, 60);
    assert_eq!(r.event_name.as_deref(), Some("Họp nhóm"));

    let r = parse("Họp nhóm 9h nhắc 2 giờ");
    assert_eq!(r.reminder_minutes, 120);
    assert_eq!(start(&r), "2025-11-07T09:00:00");
    assert_eq!(r.event_name.as_deref(), Some("Họp nhóm"));
}

#[test]
fn report_after_a_duration_is_not_a_reminder() {
    let r = parse("Thuyết trình 15 phút báo cáo");
    assert_eq!(r.reminder_minutes, 0);
    assert_eq!(r.event_name.as_deref(), Some("Thuyết trình 15 phút báo cáo"));
}

#[test]
fn ranges_across_periods() {
    let r = parse("Họp từ 10h đến 1h chiều");
    assert_eq!(r.event_name.as_deref(), Some("Họp"));
    assert_eq!(start(&r), "2025-11-07T10:00:00");
    assert_eq!(r.end_time.unwrap().to_iso(), "2025-11-07T13:00:00");

    let r = parse("Làm việc từ 8h sáng đến 5h chiều");
    assert_eq!(r.event_name.as_deref(), Some("Làm việc"));
    assert_eq!(start(&r), "2025-11-07T08:00:00");
    assert_eq!(r.end_time.unwrap().to_iso(), "2025-11-07T17:00:00");
}

#[test]
fn meal_names_keep_their_period() {
    let r = parse("Ăn tối 7h");
    assert_eq!(r.event_name.as_deref(), Some("Ăn tối"));
    assert_eq!(start(&r), "2025-11-07T19:00:00");

    let r = parse("Ăn trưa 12h mai");
    assert_eq!(r.event_name.as_deref(), Some("Ăn trưa"));
    assert_eq!(start(&r), "2025-11-08T12:00:00");
}

#[test]
fn one_oclock_at_noon() {
    let r = parse("Họp 1h trưa mai");
    assert_eq!(r.event_name.as_deref(), Some("Họp"));
    assert_eq!(start(&r), "2025-11-08T13:00:00");
}
