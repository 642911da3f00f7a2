//! Heuristic schedule entry extraction.
//!
//! The parser is an ordered set of independent pattern rules over a bounded
//! scope. A course-code anchor (`BUAD 123`, `MATH201`) starts a candidate;
//! everything until the next anchor belongs to that candidate. Within the
//! scope each rule owns one field: days, time range, instructor, credits,
//! term, location. Rules consume their matched spans so later rules never
//! re-read the same text.
//!
//! Input is line-oriented with no guaranteed format: reconstructed PDF rows
//! (tab-separated columns) and raw pasted text go through the same path.

use std::sync::LazyLock;

use chrono::NaiveTime;
use regex::Regex;
use tracing::debug;

use crate::schedule::{decode_day_token, ParsedClass, Season, Term};

/// Course-code anchor: 2-4 uppercase letters, optional whitespace, 2-4
/// digits, as the leading token of a line.
static ANCHOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Z]{2,4}[ \t]?\d{2,4})\b[ \t]*(.*)$").unwrap());

/// Two clock times separated by a dash, each optionally suffixed AM/PM.
static TIME_RANGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(\d{1,2}):(\d{2})\s*(AM|PM)?\s*[-–—]\s*(\d{1,2}):(\d{2})\s*(AM|PM)?\b",
    )
    .unwrap()
});

/// A lone clock time; sets `start_time` only.
static SINGLE_TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(\d{1,2}):(\d{2})\s*(AM|PM)?\b").unwrap());

/// Instructor token prefixed by a known title marker. The full match,
/// title included, is kept; without a marker the field stays unset rather
/// than guessed.
static INSTRUCTOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:Dr\.|Prof\.|Professor)\s+[A-Z][\w'’.-]*(?:\s+[A-Z][\w'’.-]*)?").unwrap()
});

/// Credit-hour token, e.g. `3 credits`, `4 cr`.
static CREDITS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(\d{1,2}(?:\.\d)?)\s*(?:credits?|crs?\.?|cr\.?)\b").unwrap());

/// Explicit term label, e.g. `Fall 2026`.
static TERM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(spring|summer|fall|autumn|winter)\s+(\d{4})\b").unwrap());

/// Building code + room number, e.g. `HAL 101`, `SCI 204B`. Applied last,
/// to text left over after the other rules consumed their spans.
static LOCATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[A-Z]{2,4}[ \t]?\d{1,4}[A-Z]?\b").unwrap());

/// Extract candidate class entries from a text blob, in document order.
///
/// Duplicate course codes are *not* merged; each detected block becomes its
/// own candidate, leaving de-duplication to the user during review. Text
/// with no course-code-shaped anchor yields an empty list (the importer
/// maps that to a distinct "no classes found" condition).
pub fn parse_schedule(text: &str) -> Vec<ParsedClass> {
    let mut candidates: Vec<ParsedClass> = Vec::new();

    for raw_line in text.lines() {
        let line = raw_line.replace('\t', " ");
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some((code, rest)) = match_anchor(line) {
            // A bare code-shaped line ("HAL 101") is ambiguous with an
            // anchor ("MATH201"). It is read as the current candidate's
            // location when that candidate already has schedule detail and
            // no location yet; otherwise it anchors a new candidate.
            if rest.trim().is_empty() {
                if let Some(current) = candidates.last_mut() {
                    if current.location.is_none()
                        && (!current.days.is_empty() || current.start_time.is_some())
                    {
                        current.location = Some(normalize_ws(code));
                        continue;
                    }
                }
            }

            debug!(code, "anchor detected");
            let mut class = ParsedClass::new(code);
            let residual = apply_field_rules(rest, &mut class);
            class.course_name = strip_name_separator(&residual);
            candidates.push(class);
            continue;
        }

        if let Some(current) = candidates.last_mut() {
            let residual = apply_field_rules(line, current);
            if current.location.is_none() {
                if let Some(m) = LOCATION_RE.find(&residual) {
                    current.location = Some(normalize_ws(m.as_str()));
                }
            }
        }
        // Lines before the first anchor have nothing to attach to.
    }

    debug!(count = candidates.len(), "parse complete");
    candidates
}

/// Match the course-code anchor at the start of a line.
///
/// `MW 10:00AM` also fits the letters-then-digits shape (`MW 10`), so an
/// anchor whose remainder starts with `:` followed by a digit is rejected:
/// the leading token was a clock time on a schedule line, not a course
/// code. `CHEM 110: Lab` still anchors because `: Lab` is not minutes.
fn match_anchor(line: &str) -> Option<(&str, &str)> {
    let caps = ANCHOR_RE.captures(line)?;
    let code = caps.get(1)?.as_str();
    let rest = caps.get(2).map_or("", |m| m.as_str());

    let bytes = rest.as_bytes();
    if bytes.first() == Some(&b':') && bytes.get(1).is_some_and(u8::is_ascii_digit) {
        return None;
    }

    Some((code, rest))
}

/// Run the span-consuming field rules over one line of a candidate's scope.
/// Returns the line with all matched spans blanked out, for the rules that
/// operate on leftovers (course name, location).
fn apply_field_rules(line: &str, class: &mut ParsedClass) -> String {
    let mut residual = line.to_string();

    if let Some(caps) = TIME_RANGE_RE.captures(&residual) {
        if class.start_time.is_none() && class.end_time.is_none() {
            class.start_time = clock_time(&caps[1], &caps[2], caps.get(3).map(|m| m.as_str()));
            class.end_time = clock_time(&caps[4], &caps[5], caps.get(6).map(|m| m.as_str()));
        }
        let span = caps.get(0).unwrap();
        residual = blank_span(&residual, span.start(), span.end());
    } else if let Some(caps) = SINGLE_TIME_RE.captures(&residual) {
        if class.start_time.is_none() {
            class.start_time = clock_time(&caps[1], &caps[2], caps.get(3).map(|m| m.as_str()));
        }
        let span = caps.get(0).unwrap();
        residual = blank_span(&residual, span.start(), span.end());
    }

    if let Some(m) = INSTRUCTOR_RE.find(&residual) {
        if class.instructor.is_none() {
            class.instructor = Some(normalize_ws(m.as_str()));
        }
        residual = blank_span(&residual, m.start(), m.end());
    }

    if let Some(caps) = CREDITS_RE.captures(&residual) {
        if class.credits.is_none() {
            class.credits = caps[1].parse().ok();
        }
        let span = caps.get(0).unwrap();
        residual = blank_span(&residual, span.start(), span.end());
    }

    if let Some(caps) = TERM_RE.captures(&residual) {
        if class.term.is_none() {
            class.term = Some(Term {
                season: caps[1].parse().unwrap_or(Season::Fall),
                year: caps[2].parse().unwrap_or(0),
            });
        }
        let span = caps.get(0).unwrap();
        residual = blank_span(&residual, span.start(), span.end());
    }

    // Day tokens last among the consuming rules: whole whitespace-separated
    // tokens drawn from the {M, T, W, Th, F} vocabulary, decomposed into
    // the canonical set independent of appearance order.
    let mut kept = Vec::new();
    for token in residual.split_whitespace() {
        match decode_day_token(token) {
            Some(days) if class.days.is_empty() => {
                class.days = days;
            }
            Some(_) => {} // further day tokens are duplicates, drop them
            None => kept.push(token),
        }
    }
    kept.join(" ")
}

/// Convert matched 12-hour text to the internal 24-hour representation.
/// Without an AM/PM suffix the hour is taken as written.
fn clock_time(hour: &str, minute: &str, meridiem: Option<&str>) -> Option<NaiveTime> {
    let mut hour: u32 = hour.parse().ok()?;
    let minute: u32 = minute.parse().ok()?;

    match meridiem.map(str::to_ascii_uppercase).as_deref() {
        Some("PM") if hour != 12 => hour += 12,
        Some("AM") if hour == 12 => hour = 0,
        _ => {}
    }

    NaiveTime::from_hms_opt(hour, minute, 0)
}

/// Blank a matched span with spaces, preserving byte offsets for later
/// rules in the same pass.
fn blank_span(text: &str, start: usize, end: usize) -> String {
    let mut out = String::with_capacity(text.len());
    out.push_str(&text[..start]);
    out.extend(std::iter::repeat(' ').take(text[start..end].chars().count()));
    out.push_str(&text[end..]);
    out
}

/// Course name is the anchor-line remainder after an optional dash/colon
/// separator.
fn strip_name_separator(rest: &str) -> String {
    let rest = rest.trim();
    let rest = rest
        .strip_prefix(['-', ':', '–', '—'])
        .unwrap_or(rest);
    normalize_ws(rest)
}

fn normalize_ws(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
