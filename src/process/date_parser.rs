use chrono::NaiveDate;

/// Formats tried in order. Numeric forms put the day first, so an ambiguous
/// `03/04/2020` reads as the 3rd of April.
const FORMATS: &[&str] = &[
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%d %b %Y",
    "%d %B %Y",
    "%B %d, %Y",
];

/// Parse a date string, preferring day-before-month for ambiguous numeric
/// forms. Returns `None` when no known format matches.
pub fn parse_day_first(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}
