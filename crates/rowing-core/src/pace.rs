//! Pace codec for the `M:SS.T` notation shown on the rowing monitor.
//!
//! The single tenths digit is worth 100 ms, so `2:12.6` decodes to
//! 132 600 ms. Encoding truncates to tenths.

use std::time::Duration;

use crate::error::PaceFormatError;

/// Decode `M:SS.T` or `MM:SS.T` into a duration.
///
/// Seconds of 60 or more are carried into minutes rather than rejected.
///
/// # Errors
///
/// Returns [`PaceFormatError`] when a separator is missing or a segment has
/// the wrong digit count.
pub fn decode(text: &str) -> Result<Duration, PaceFormatError> {
    let (minutes, rest) = text
        .split_once(':')
        .ok_or_else(|| PaceFormatError::MissingColon(text.to_string()))?;
    let (seconds, tenths) = rest
        .split_once('.')
        .ok_or_else(|| PaceFormatError::MissingTenths(text.to_string()))?;

    let minutes = digits(minutes, 1, 2).ok_or_else(|| segment_error(text, "minutes"))?;
    let seconds = digits(seconds, 2, 2).ok_or_else(|| segment_error(text, "seconds"))?;
    let tenths = digits(tenths, 1, 1).ok_or_else(|| segment_error(text, "tenths"))?;

    Ok(Duration::from_secs(minutes * 60 + seconds) + Duration::from_millis(tenths * 100))
}

/// Render a duration as `M:SS.T`, truncating below a tenth of a second.
///
/// Minutes are total minutes, so an hour-long pace renders as `60:00.0`.
pub fn encode(pace: Duration) -> String {
    let total = pace.as_secs();
    format!(
        "{}:{:02}.{}",
        total / 60,
        total % 60,
        pace.subsec_millis() / 100
    )
}

fn digits(segment: &str, min_len: usize, max_len: usize) -> Option<u64> {
    let len = segment.len();
    if len < min_len || len > max_len || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse().ok()
}

fn segment_error(text: &str, segment: &'static str) -> PaceFormatError {
    PaceFormatError::Segment {
        text: text.to_string(),
        segment,
    }
}
