use chrono::NaiveDateTime;
use thiserror::Error;

/// Format used on the console prompt.
pub const INPUT_FORMAT: &str = "%Y-%m-%d %H:%M";

/// ISO-8601 format used for the StartTime/EndTime columns.
pub const STORAGE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

const ACCEPTED_INPUT_FORMATS: &[&str] = &[
    INPUT_FORMAT,
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    STORAGE_FORMAT,
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid timestamp '{0}', expected yyyy-MM-dd HH:mm")]
pub struct ParseTimestampError(pub String);

/// Parse a timestamp typed by the operator.
/// Example: "2024-01-01 10:00"
pub fn parse_timestamp(input: &str) -> Result<NaiveDateTime, ParseTimestampError> {
    let input = input.trim();
    ACCEPTED_INPUT_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
        .ok_or_else(|| ParseTimestampError(input.to_string()))
}

pub fn format_storage_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(STORAGE_FORMAT).to_string()
}

pub fn parse_storage_timestamp(s: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(s, STORAGE_FORMAT)
}
