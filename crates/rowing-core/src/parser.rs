//! Log line parser.
//!
//! Grammar, after trimming: `DD.MM.YYYY,M:SS.T,VALUE UNIT` where `UNIT` is
//! `m` or `min`. Parsing is pure; failures are returned, never raised, and
//! one bad line has no effect on the next.

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use tracing::warn;

use crate::error::{ParseError, SemanticCause};
use crate::pace;
use crate::record::{RawRecord, Unit, DATE_FORMAT};

static LINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{2}\.\d{2}\.\d{4}),(\d{1,2}:\d{2}\.\d),(\d+(?:\.\d+)?)\s+(min|m)$")
        .expect("valid log line regex")
});

/// Parse one log line.
///
/// # Errors
///
/// [`ParseError::PatternMismatch`] when the line does not follow the grammar,
/// [`ParseError::SemanticFailure`] when a field is not a valid value.
pub fn parse_line(line: &str) -> Result<RawRecord, ParseError> {
    let caps = LINE_RE
        .captures(line.trim())
        .ok_or_else(|| ParseError::PatternMismatch {
            line: line.to_string(),
        })?;

    let semantic = |cause: SemanticCause| ParseError::SemanticFailure {
        line: line.to_string(),
        cause,
    };

    let date_text = &caps[1];
    let date = NaiveDate::parse_from_str(date_text, DATE_FORMAT).map_err(|source| {
        semantic(SemanticCause::InvalidDate {
            text: date_text.to_string(),
            source,
        })
    })?;
    if date.year() < 1 {
        return Err(semantic(SemanticCause::DateOutOfRange(date_text.to_string())));
    }
    let pace = pace::decode(&caps[2]).map_err(|e| semantic(e.into()))?;
    let value: f64 = caps[3]
        .parse()
        .map_err(|_| semantic(SemanticCause::InvalidValue(caps[3].to_string())))?;
    let unit = Unit::from_symbol(&caps[4]).ok_or_else(|| ParseError::PatternMismatch {
        line: line.to_string(),
    })?;

    RawRecord::new(date, pace, value, unit).map_err(semantic)
}

/// Outcome of parsing a batch of lines: every good record in input order,
/// plus every rejected line.
#[derive(Debug, Default, Clone, Serialize)]
pub struct ParseReport {
    pub records: Vec<RawRecord>,
    #[serde(serialize_with = "failure_messages")]
    pub failures: Vec<ParseError>,
}

impl ParseReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Parse every line independently, logging and collecting the failures.
pub fn parse_lines<I, S>(lines: I) -> ParseReport
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut report = ParseReport::default();
    for line in lines {
        match parse_line(line.as_ref()) {
            Ok(record) => report.records.push(record),
            Err(err) => {
                warn!(line = err.line(), error = %err, "skipping log line");
                report.failures.push(err);
            }
        }
    }
    report
}

pub(crate) fn failure_messages<S: serde::Serializer>(
    failures: &[ParseError],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(failures.iter().map(ToString::to_string))
}
