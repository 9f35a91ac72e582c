use chrono::{DateTime, Utc};
use regex::Regex;

use webscope_types::LogRecord;

/// Combined-format line pattern
///
/// Eleven capture groups: ip, ident, authuser, timestamp, method, path,
/// protocol, status, size, referer, user agent. The size group accepts the
/// `-` placeholder some servers log for bodyless responses.
const COMBINED_PATTERN: &str =
    r#"^(\S+) (\S+) (\S+) \[([\w:/]+\s[+-]\d{4})\] "(\S+) (\S+) (\S+)" (\d{3}) (\d+|-) "([^"]*)" "([^"]*)""#;

/// Timestamp layout inside the brackets, e.g. `06/Apr/2025:09:15:32 +0300`
const TIMESTAMP_LAYOUT: &str = "%d/%b/%Y:%H:%M:%S %z";

/// Parser for the one supported access-log grammar
///
/// A line either matches the full pattern and yields a record, or it does
/// not and yields `None`. Not matching is an expected outcome (blank lines,
/// truncated writes, foreign formats), never an error; callers keep going.
pub struct LineParser {
    pattern: Regex,
}

impl LineParser {
    pub fn new() -> Self {
        Self {
            pattern: Regex::new(COMBINED_PATTERN).expect("combined log pattern is valid"),
        }
    }

    /// Parse one raw line into a record
    ///
    /// The bracketed timestamp must be a real calendar instant; its zone
    /// offset is applied during normalization to UTC. No partial-match
    /// recovery is attempted.
    pub fn parse_line(&self, raw: &str) -> Option<LogRecord> {
        let captures = self.pattern.captures(raw)?;

        // Groups 2 (ident), 3 (authuser), and 7 (protocol) are matched but
        // not stored.
        let request_time = DateTime::parse_from_str(&captures[4], TIMESTAMP_LAYOUT)
            .ok()?
            .with_timezone(&Utc);

        Some(LogRecord {
            id: 0,
            ip_address: captures[1].to_string(),
            request_method: captures[5].to_string(),
            request_path: captures[6].to_string(),
            status_code: captures[8].parse().ok()?,
            response_size: captures[9].parse().ok(),
            referer: optional_field(&captures[10]),
            user_agent: optional_field(&captures[11]),
            request_time,
        })
    }
}

impl Default for LineParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Map the `-` placeholder (or an empty capture) to an absent value
fn optional_field(raw: &str) -> Option<String> {
    if raw.is_empty() || raw == "-" {
        None
    } else {
        Some(raw.to_string())
    }
}
