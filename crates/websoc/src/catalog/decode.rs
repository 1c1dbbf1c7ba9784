//! Field decoders for a single listing cell.
//!
//! Each decoder is a pure function over the cell's text. Values the registrar
//! prints as "TBA" come back as [`Listed::Tba`]; values that don't apply come
//! back as [`Listed::NotApplicable`].

use chrono::{Month, NaiveDate, NaiveTime};
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;
use url::Url;

use super::error::FieldError;
use super::types::*;
use crate::term::Term;

/// Page that relative links in the listing are resolved against.
pub const WEBSOC_URL: &str = "https://www.reg.uci.edu/perl/WebSoc";

static BASE_URL: LazyLock<Url> = LazyLock::new(|| Url::parse(WEBSOC_URL).unwrap());
static TIME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2}):(\d{2})\s*-\s*(\d{1,2}):(\d{2})\s*([apAP])?[mM]?$").unwrap()
});
// e.g. "Mon, Dec 9, 8:00-10:00am"
static FINAL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[A-Za-z]+,?\s+([A-Za-z]{3})[a-z]*\.?\s+(\d{1,2}),?\s+(\d{1,2}):(\d{2})\s*-\s*(\d{1,2}):(\d{2})\s*([apAP])?[mM]?$",
    )
    .unwrap()
});
static DIGITS_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").unwrap());

fn is_tba(raw: &str) -> bool {
    raw.eq_ignore_ascii_case("TBA")
}

/// Splits a section token into its letter and number parts.
///
/// The order isn't fixed ("A1", "1A", "12"), so the split is positional: the
/// first character decides which part leads, and the second character joins
/// it when it is of the same kind. Whatever follows is the other part.
pub fn decode_section(raw: &str) -> Section {
    let raw = raw.trim();
    let mut chars = raw.chars();
    let Some(first) = chars.next() else {
        return Section::default();
    };

    let leads_with_number = first.is_ascii_digit();
    let prefix_len = match chars.next() {
        Some(second) if second.is_ascii_digit() == leads_with_number => 2,
        _ => 1,
    };
    let split = raw
        .char_indices()
        .nth(prefix_len)
        .map(|(i, _)| i)
        .unwrap_or(raw.len());
    let (prefix, rest) = raw.split_at(split);

    if leads_with_number {
        Section {
            letter: (!rest.is_empty()).then(|| rest.to_string()),
            number: prefix.parse().ok(),
        }
    } else {
        Section {
            letter: Some(prefix.to_string()),
            number: rest.parse().ok(),
        }
    }
}

/// Parses a day string such as "MWF" or "TuTh".
///
/// `T` and `S` always start a two-letter code (Tu/Th, Sa/Su).
fn decode_days(raw: &str) -> Result<Vec<Weekday>, FieldError> {
    let chars: Vec<char> = raw.chars().filter(|c| !c.is_whitespace()).collect();
    if chars.is_empty() {
        return Err(FieldError::format("days", raw));
    }

    let mut days = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let width = if matches!(chars[i], 'T' | 'S') { 2 } else { 1 };
        let token: String = chars[i..(i + width).min(chars.len())].iter().collect();
        let day = Weekday::from_code(&token).ok_or_else(|| FieldError::unknown_code("day", &token))?;
        days.push(day);
        i += width;
    }

    Ok(days)
}

/// Converts 12-hour clock hours to 24-hour form.
///
/// Only the end carries the am/pm marker. With `p` the end always moves to
/// the afternoon; the start moves only when it reads below 10, so starts such
/// as "11:00-12:20p" stay in the morning.
fn resolve_hours(start: u32, end: u32, pm: bool) -> (u32, u32) {
    let (start, end) = (start % 12, end % 12);
    if !pm {
        return (start, end);
    }

    let start = if start < 10 { start + 12 } else { start };
    (start, end + 12)
}

fn clock(hour: u32, minute: u32, raw: &str, field: &'static str) -> Result<NaiveTime, FieldError> {
    NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(|| FieldError::format(field, raw))
}

fn number<T: std::str::FromStr>(text: &str, raw: &str, field: &'static str) -> Result<T, FieldError> {
    text.trim()
        .parse::<T>()
        .map_err(|_| FieldError::format(field, raw))
}

/// Parses a weekly meeting time, e.g. `"MWF\u{a0}1:00-1:50p"` or `"TBA"`.
pub fn decode_recurring_time(raw: &str) -> Result<Listed<RecurringPeriod>, FieldError> {
    const FIELD: &str = "time";

    let trimmed = raw.trim();
    if is_tba(trimmed) {
        return Ok(Listed::Tba);
    }

    let (day_part, time_part) = trimmed
        .split_once('\u{a0}')
        .or_else(|| trimmed.split_once(char::is_whitespace))
        .ok_or_else(|| FieldError::format(FIELD, raw))?;

    let days = decode_days(day_part.trim())?;
    let caps = TIME_REGEX
        .captures(time_part.trim())
        .ok_or_else(|| FieldError::format(FIELD, raw))?;

    let pm = caps
        .get(5)
        .is_some_and(|m| m.as_str().eq_ignore_ascii_case("p"));
    let (start_hour, end_hour) = resolve_hours(
        number(&caps[1], raw, FIELD)?,
        number(&caps[3], raw, FIELD)?,
        pm,
    );

    Ok(Listed::Known(RecurringPeriod {
        days,
        start: clock(start_hour, number(&caps[2], raw, FIELD)?, raw, FIELD)?,
        end: clock(end_hour, number(&caps[4], raw, FIELD)?, raw, FIELD)?,
    }))
}

/// Parses a final exam slot, e.g. `"Mon, Dec 9, 8:00-10:00am"`.
///
/// An empty cell means no final is scheduled; "TBA" means there is one but
/// its time hasn't been set. The year comes from the term.
pub fn decode_final(raw: &str, term: &Term) -> Result<Listed<ExactPeriod>, FieldError> {
    const FIELD: &str = "final";

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(Listed::NotApplicable);
    }
    if is_tba(trimmed) {
        return Ok(Listed::Tba);
    }

    let caps = FINAL_REGEX
        .captures(trimmed)
        .ok_or_else(|| FieldError::format(FIELD, raw))?;

    let month = caps[1]
        .parse::<Month>()
        .map_err(|_| FieldError::unknown_code("month", &caps[1]))?
        .number_from_month();
    let day: u32 = number(&caps[2], raw, FIELD)?;
    let date = NaiveDate::from_ymd_opt(term.year(), month, day)
        .ok_or_else(|| FieldError::format(FIELD, raw))?;

    let pm = caps
        .get(7)
        .is_some_and(|m| m.as_str().eq_ignore_ascii_case("p"));
    let (start_hour, end_hour) = resolve_hours(
        number(&caps[3], raw, FIELD)?,
        number(&caps[5], raw, FIELD)?,
        pm,
    );

    Ok(Listed::Known(ExactPeriod {
        start: date.and_time(clock(start_hour, number(&caps[4], raw, FIELD)?, raw, FIELD)?),
        end: date.and_time(clock(end_hour, number(&caps[6], raw, FIELD)?, raw, FIELD)?),
    }))
}

/// Parses `"cur/max"`; a lone number is both.
pub fn decode_enrolled(raw: &str) -> Result<Enrolled, FieldError> {
    const FIELD: &str = "enrolled";

    let (current, max) = match raw.split_once('/') {
        Some((current, max)) => (number(current, raw, FIELD)?, number(max, raw, FIELD)?),
        None => {
            let current = number(raw, raw, FIELD)?;
            (current, current)
        }
    };

    Ok(Enrolled { current, max })
}

/// Parses the waitlist cell. "off" anywhere means the waitlist is closed;
/// the first number found is the student count.
pub fn decode_waitlist(raw: &str) -> Waitlist {
    // A listed "0" stays Some(0). Older listing tools folded zero into "no
    // count"; here None only means no number was printed.
    Waitlist {
        students: DIGITS_REGEX
            .find(raw)
            .and_then(|m| m.as_str().parse().ok()),
        turned_off: raw.to_ascii_lowercase().contains("off"),
    }
}

/// Parses `"4"` or a variable range such as `"2-4"`.
pub fn decode_units(raw: &str) -> Result<Units, FieldError> {
    const FIELD: &str = "units";

    match raw.split_once('-') {
        Some((min, max)) => Ok(Units {
            min: number(min, raw, FIELD)?,
            max: number(max, raw, FIELD)?,
        }),
        None => {
            let min = number(raw, raw, FIELD)?;
            Ok(Units { min, max: min })
        }
    }
}

/// Parses a non-negative count (code, max, requests, ...).
pub fn decode_count(raw: &str, field: &'static str) -> Result<u32, FieldError> {
    number(raw, raw, field)
}

/// Parses restriction codes separated by commas or spaces.
///
/// Tokens that aren't restriction codes (such as the "and" in "A and N")
/// are dropped.
pub fn decode_restrictions(raw: &str) -> Vec<Restriction> {
    raw.replace(',', " ")
        .split_whitespace()
        .filter_map(|token| {
            let restriction = Restriction::from_code(token);
            if restriction.is_none() {
                debug!(token, "Dropping unrecognized restriction token");
            }
            restriction
        })
        .collect()
}

/// Collects instructor names, one per line of the cell.
pub fn decode_instructors<S: AsRef<str>>(lines: &[S]) -> Vec<String> {
    lines
        .iter()
        .map(|line| line.as_ref().trim())
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Decodes the room. Online classes have none; a blank cell is unannounced.
///
/// An unreadable modality is treated like in-person so the room text survives.
pub fn decode_place(raw: &str, modality: Option<Modality>) -> Listed<String> {
    if modality == Some(Modality::Online) {
        return Listed::NotApplicable;
    }

    let place = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if place.is_empty() || is_tba(&place) {
        Listed::Tba
    } else {
        Listed::Known(place)
    }
}

pub fn decode_class_type(raw: &str) -> Result<ClassType, FieldError> {
    let code = raw.trim();
    ClassType::from_code(code).ok_or_else(|| FieldError::unknown_code("type", code))
}

pub fn decode_modality(raw: &str) -> Result<Modality, FieldError> {
    let code = raw.trim();
    Modality::from_code(code).ok_or_else(|| FieldError::unknown_code("modality", code))
}

pub fn decode_status(raw: &str) -> Result<Status, FieldError> {
    let code = raw.trim();
    Status::from_code(code).ok_or_else(|| FieldError::unknown_code("status", code))
}

/// Resolves an anchor's href, relative to the listing page if needed.
pub fn decode_link(href: &str) -> Option<Url> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }

    match Url::parse(href) {
        Ok(url) => Some(url),
        Err(url::ParseError::RelativeUrlWithoutBase) => BASE_URL.join(href).ok(),
        Err(e) => {
            debug!(href, error = %e, "Ignoring malformed link");
            None
        }
    }
}
