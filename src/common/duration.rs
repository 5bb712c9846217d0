use lazy_static::lazy_static;
use regex::Regex;
use time::OffsetDateTime;
use tracing::debug;

use crate::models::giveaway::GiveawayError;

lazy_static! {
    static ref DURATION_REGEX: Regex = Regex::new(r"^([0-9]+)([smhdw])$").unwrap();
}

/// Parses a compact duration such as `30s`, `45m`, `3h`, `2d` or `1w` into seconds.
///
/// Surrounding whitespace is ignored and the unit is case-insensitive. A single
/// magnitude and unit pair is accepted, so `1d2h` and `2 d` are rejected.
pub fn parse_duration(string: &str) -> Result<u64, GiveawayError> {
    let normalised = string.trim().to_ascii_lowercase();
    debug!("Parsing duration: {}", normalised);

    let invalid = || GiveawayError::InvalidDuration(string.to_string());

    let Some(capture) = DURATION_REGEX.captures(&normalised) else {
        return Err(invalid());
    };

    let Ok(magnitude) = capture[1].parse::<u64>() else {
        return Err(invalid());
    };

    let multiplier = match &capture[2] {
        "s" => 1,
        "m" => 60,
        "h" => 60 * 60,
        "d" => 60 * 60 * 24,
        "w" => 60 * 60 * 24 * 7,
        _ => return Err(invalid()),
    };

    let seconds = magnitude.checked_mul(multiplier).ok_or_else(invalid)?;
    debug!("Parsed duration {} as {} seconds", normalised, seconds);
    Ok(seconds)
}

/// Resolves a duration string to an end time, truncated to whole seconds.
pub fn end_time(string: &str, now: OffsetDateTime) -> Result<OffsetDateTime, GiveawayError> {
    let seconds = parse_duration(string)?;
    i64::try_from(seconds)
        .ok()
        .and_then(|seconds| now.unix_timestamp().checked_add(seconds))
        .and_then(|epoch| OffsetDateTime::from_unix_timestamp(epoch).ok())
        .ok_or_else(|| GiveawayError::InvalidDuration(string.to_string()))
}
