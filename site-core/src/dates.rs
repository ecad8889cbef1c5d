use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};

use crate::language::Language;

const MONTHS_TE: [&str; 12] = [
    "జనవరి",
    "ఫిబ్రవరి",
    "మార్చి",
    "ఏప్రిల్",
    "మే",
    "జూన్",
    "జూలై",
    "ఆగస్టు",
    "సెప్టెంబర్",
    "అక్టోబర్",
    "నవంబర్",
    "డిసెంబర్",
];

/// Accepts RFC 3339, a naive `YYYY-MM-DDTHH:MM:SS`, or a bare date.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// "October 5, 2024" in English; Telugu month names otherwise.
pub fn format_long(date: NaiveDate, language: &Language) -> String {
    if *language == Language::TELUGU {
        let month = MONTHS_TE[date.month0() as usize];
        format!("{} {}, {}", date.day(), month, date.year())
    } else {
        date.format("%B %-d, %Y").to_string()
    }
}

/// Card label: "Today", "Yesterday", "N days ago", else a short date that
/// carries the year only when it differs from `today`'s.
pub fn relative_label(date: NaiveDate, today: NaiveDate) -> String {
    let days = (today - date).num_days().abs();
    match days {
        0 => "Today".to_string(),
        1 => "Yesterday".to_string(),
        2..=6 => format!("{days} days ago"),
        _ if date.year() != today.year() => date.format("%b %-d, %Y").to_string(),
        _ => date.format("%b %-d").to_string(),
    }
}

/// Relative label for a raw date string; unparseable input is shown as-is.
pub fn relative_label_for(raw: &str, today: NaiveDate) -> String {
    match parse_timestamp(raw) {
        Some(ts) => relative_label(ts.date_naive(), today),
        None => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_all_supported_shapes() {
        assert!(parse_timestamp("2024-10-05T08:30:00Z").is_some());
        assert!(parse_timestamp("2024-10-05T08:30:00").is_some());
        assert_eq!(
            parse_timestamp("2024-10-05").unwrap().date_naive(),
            day(2024, 10, 5)
        );
        assert!(parse_timestamp("yesterday-ish").is_none());
    }

    #[test]
    fn long_format_per_language() {
        let date = day(2024, 10, 5);
        assert_eq!(format_long(date, &Language::ENGLISH), "October 5, 2024");
        assert_eq!(format_long(date, &Language::TELUGU), "5 అక్టోబర్, 2024");
    }

    #[test]
    fn relative_labels() {
        let today = day(2024, 10, 10);
        assert_eq!(relative_label(today, today), "Today");
        assert_eq!(relative_label(day(2024, 10, 9), today), "Yesterday");
        assert_eq!(relative_label(day(2024, 10, 6), today), "4 days ago");
        assert_eq!(relative_label(day(2024, 9, 1), today), "Sep 1");
        assert_eq!(relative_label(day(2023, 9, 1), today), "Sep 1, 2023");
        assert_eq!(relative_label_for("not a date", today), "not a date");
    }
}
