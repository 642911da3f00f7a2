//! Core schedule data model.
//!
//! [`ParsedClass`] is the unit flowing through the whole pipeline: produced
//! as a *candidate* by the parser, mutated during review, and handed to the
//! calendar-sync collaborator on commit. Until confirmed, candidates live
//! only in session memory.

use std::collections::BTreeSet;
use std::fmt;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A weekday in the schedule vocabulary.
///
/// Derived `Ord` follows declaration order, so a `BTreeSet<Weekday>` always
/// iterates in the canonical M, T, W, Th, F order regardless of insertion
/// order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

impl Weekday {
    /// All weekdays in canonical order.
    pub const ALL: [Weekday; 5] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
    ];

    /// The schedule token for this day (`M`, `T`, `W`, `Th`, `F`).
    pub fn token(self) -> &'static str {
        match self {
            Weekday::Monday => "M",
            Weekday::Tuesday => "T",
            Weekday::Wednesday => "W",
            Weekday::Thursday => "Th",
            Weekday::Friday => "F",
        }
    }

    /// Full display name.
    pub fn name(self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// An ordered set of weekdays.
pub type DaySet = BTreeSet<Weekday>;

/// Decode a concatenated day token (`MWF`, `TTh`, `WFM`) into the canonical
/// day set.
///
/// Matching is greedy with `Th` tried before `T` so that `TTh` decodes as
/// {Tuesday, Thursday}. Returns `None` if any part of the token falls
/// outside the vocabulary; a valid token must be consumed completely.
pub fn decode_day_token(token: &str) -> Option<DaySet> {
    let mut days = DaySet::new();
    let mut rest = token;

    while !rest.is_empty() {
        if let Some(tail) = rest.strip_prefix("Th") {
            days.insert(Weekday::Thursday);
            rest = tail;
        } else if let Some(tail) = rest.strip_prefix('M') {
            days.insert(Weekday::Monday);
            rest = tail;
        } else if let Some(tail) = rest.strip_prefix('T') {
            days.insert(Weekday::Tuesday);
            rest = tail;
        } else if let Some(tail) = rest.strip_prefix('W') {
            days.insert(Weekday::Wednesday);
            rest = tail;
        } else if let Some(tail) = rest.strip_prefix('F') {
            days.insert(Weekday::Friday);
            rest = tail;
        } else {
            return None;
        }
    }

    if days.is_empty() {
        None
    } else {
        Some(days)
    }
}

/// Render a day set as a concatenated token in canonical order
/// (e.g. `{W, M, F}` → `MWF`).
pub fn encode_day_set(days: &DaySet) -> String {
    days.iter().map(|d| d.token()).collect()
}

/// Academic term season. The bounded vocabulary users pick from when
/// overriding an inferred term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Season {
    Spring,
    Summer,
    Fall,
    Winter,
}

impl Season {
    pub const ALL: [Season; 4] = [Season::Spring, Season::Summer, Season::Fall, Season::Winter];

    pub fn name(self) -> &'static str {
        match self {
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Fall => "Fall",
            Season::Winter => "Winter",
        }
    }
}

impl std::str::FromStr for Season {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "spring" => Ok(Season::Spring),
            "summer" => Ok(Season::Summer),
            "fall" | "autumn" => Ok(Season::Fall),
            "winter" => Ok(Season::Winter),
            _ => Err(()),
        }
    }
}

/// A semester label, e.g. `Fall 2026`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    pub season: Season,
    pub year: i32,
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.season.name(), self.year)
    }
}

/// A class record, candidate or committed.
///
/// `course_code` is the mandatory anchor and the dedup/display key; every
/// other field may be empty pending user edit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedClass {
    /// Stable identifier, assigned at parse time for candidates.
    pub id: Uuid,
    /// Canonical uppercase course code, e.g. `BUAD 123`. Never empty.
    pub course_code: String,
    /// Free-text title; may be empty pending edit.
    #[serde(default)]
    pub course_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructor: Option<String>,
    /// Meeting days in canonical order.
    #[serde(default)]
    pub days: DaySet,
    /// 24-hour internal representation; rendered back to 12-hour text only
    /// for display.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<NaiveTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<NaiveTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credits: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub term: Option<Term>,
    /// Display color hex string, assigned from the palette at normalize
    /// time and stable thereafter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl ParsedClass {
    /// Create a candidate anchored on a course code. The code is
    /// canonicalized to uppercase with single-space internal whitespace.
    pub fn new(course_code: &str) -> Self {
        let code = course_code
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_uppercase();
        debug_assert!(!code.is_empty(), "course code is the mandatory anchor");

        Self {
            id: Uuid::new_v4(),
            course_code: code,
            course_name: String::new(),
            instructor: None,
            days: DaySet::new(),
            start_time: None,
            end_time: None,
            location: None,
            credits: None,
            term: None,
            color: None,
            notes: None,
        }
    }

    /// Concatenated day token in canonical order, empty when no days set.
    pub fn day_code(&self) -> String {
        encode_day_set(&self.days)
    }

    /// True when both times are present and start is not before end.
    /// Such candidates are kept and surfaced for manual correction.
    pub fn times_inverted(&self) -> bool {
        matches!((self.start_time, self.end_time), (Some(s), Some(e)) if s >= e)
    }

    /// Render a time as 12-hour display text, e.g. `9:30AM`.
    pub fn display_time(time: NaiveTime) -> String {
        time.format("%-I:%M%p").to_string()
    }

    /// Parse user-entered time text, 12-hour (`9:30AM`) or 24-hour
    /// (`14:00`).
    pub fn parse_display_time(text: &str) -> Option<NaiveTime> {
        let text = text.trim().to_uppercase().replace(' ', "");
        NaiveTime::parse_from_str(&text, "%I:%M%p")
            .or_else(|_| NaiveTime::parse_from_str(&text, "%H:%M"))
            .ok()
    }

    /// `9:30AM - 10:45AM`, or partial forms when one side is missing.
    pub fn display_time_range(&self) -> String {
        match (self.start_time, self.end_time) {
            (Some(s), Some(e)) => {
                format!("{} - {}", Self::display_time(s), Self::display_time(e))
            }
            (Some(s), None) => Self::display_time(s),
            _ => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_token_decodes_in_canonical_order() {
        let days = decode_day_token("MWF").unwrap();
        let tokens: Vec<_> = days.iter().map(|d| d.token()).collect();
        assert_eq!(tokens, vec!["M", "W", "F"]);
    }

    #[test]
    fn day_token_order_independent() {
        assert_eq!(decode_day_token("WFM"), decode_day_token("MWF"));
        assert_eq!(encode_day_set(&decode_day_token("WFM").unwrap()), "MWF");
    }

    #[test]
    fn day_token_th_wins_over_t() {
        let days = decode_day_token("TTh").unwrap();
        assert!(days.contains(&Weekday::Tuesday));
        assert!(days.contains(&Weekday::Thursday));
        assert_eq!(days.len(), 2);
    }

    #[test]
    fn day_token_duplicates_collapse() {
        let days = decode_day_token("MMM").unwrap();
        assert_eq!(days.len(), 1);
    }

    #[test]
    fn day_token_rejects_foreign_letters() {
        assert!(decode_day_token("MXF").is_none());
        assert!(decode_day_token("").is_none());
        assert!(decode_day_token("Sat").is_none());
    }

    #[test]
    fn full_week_round_trips() {
        let days = decode_day_token("MTWThF").unwrap();
        assert_eq!(days.len(), 5);
        assert_eq!(encode_day_set(&days), "MTWThF");
    }

    #[test]
    fn course_code_canonicalized() {
        let class = ParsedClass::new("buad   123");
        assert_eq!(class.course_code, "BUAD 123");
    }

    #[test]
    fn times_inverted_flags_reversed_range() {
        let mut class = ParsedClass::new("MATH 201");
        class.start_time = NaiveTime::from_hms_opt(14, 0, 0);
        class.end_time = NaiveTime::from_hms_opt(9, 30, 0);
        assert!(class.times_inverted());

        class.end_time = NaiveTime::from_hms_opt(15, 15, 0);
        assert!(!class.times_inverted());
    }

    #[test]
    fn display_time_renders_12_hour() {
        let t = NaiveTime::from_hms_opt(9, 30, 0).unwrap();
        assert_eq!(ParsedClass::display_time(t), "9:30AM");
        let t = NaiveTime::from_hms_opt(13, 5, 0).unwrap();
        assert_eq!(ParsedClass::display_time(t), "1:05PM");
    }

    #[test]
    fn display_time_round_trips_through_parse() {
        for (h, m) in [(0, 5), (9, 30), (12, 0), (16, 45)] {
            let t = NaiveTime::from_hms_opt(h, m, 0).unwrap();
            let rendered = ParsedClass::display_time(t);
            assert_eq!(ParsedClass::parse_display_time(&rendered), Some(t), "{rendered}");
        }
    }

    #[test]
    fn parse_display_time_accepts_both_clocks() {
        let t = NaiveTime::from_hms_opt(14, 0, 0).unwrap();
        assert_eq!(ParsedClass::parse_display_time("2:00PM"), Some(t));
        assert_eq!(ParsedClass::parse_display_time("2:00 pm"), Some(t));
        assert_eq!(ParsedClass::parse_display_time("14:00"), Some(t));
        assert_eq!(ParsedClass::parse_display_time("lunch"), None);
    }

    #[test]
    fn term_displays_season_year() {
        let term = Term { season: Season::Fall, year: 2026 };
        assert_eq!(term.to_string(), "Fall 2026");
    }
}
