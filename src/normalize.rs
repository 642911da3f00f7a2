//! Candidate canonicalization before display and commit.
//!
//! Much of the canonical shape is carried by the types themselves: `days`
//! is an ordered set (always M, T, W, Th, F, duplicates impossible) and
//! times are already 24-hour [`chrono::NaiveTime`]. What remains here is
//! the derived state: a best-guess term when the source text named none,
//! and a display color drawn from the fixed palette.

use chrono::{Datelike, Local, NaiveDate};
use rand::Rng;

use crate::schedule::{ParsedClass, Season, Term};

/// Fixed, visually-distinct display palette. Chosen pseudo-randomly per
/// candidate; stable once assigned.
pub const COLOR_PALETTE: [&str; 8] = [
    "#4A90D9", // blue
    "#D95649", // red
    "#50A762", // green
    "#E8A33D", // amber
    "#8E5BB8", // purple
    "#3BA8A0", // teal
    "#E07B39", // orange
    "#D967A8", // pink
];

/// Infer the current term from a date. Deterministic in the supplied date:
/// January–May reads as Spring, June–July as Summer, August–December as
/// Fall, always of that date's year. Users can override from the bounded
/// [`Season`] list during review.
pub fn infer_term(today: NaiveDate) -> Term {
    let season = match today.month() {
        1..=5 => Season::Spring,
        6 | 7 => Season::Summer,
        _ => Season::Fall,
    };
    Term { season, year: today.year() }
}

/// Pick a palette color pseudo-randomly.
pub fn pick_color<R: Rng>(rng: &mut R) -> &'static str {
    COLOR_PALETTE[rng.gen_range(0..COLOR_PALETTE.len())]
}

/// Fill in the derived fields of one candidate. Existing values are never
/// overwritten: a term parsed from the source text wins over inference,
/// and a color already shown to the user is never silently reassigned.
pub fn normalize_candidate<R: Rng>(class: &mut ParsedClass, today: NaiveDate, rng: &mut R) {
    if class.term.is_none() {
        class.term = Some(infer_term(today));
    }
    if class.color.is_none() {
        class.color = Some(pick_color(rng).to_string());
    }
}

/// Normalize a whole candidate batch against today's date.
pub fn normalize_all(classes: &mut [ParsedClass]) {
    let today = Local::now().date_naive();
    let mut rng = rand::thread_rng();
    for class in classes {
        normalize_candidate(class, today, &mut rng);
    }
}
