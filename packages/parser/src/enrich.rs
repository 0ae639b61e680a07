//! Publication year inference.
//!
//! Runs after segmentation over the raw text. The segmenter itself never
//! sets a year.

use std::sync::LazyLock;

use chrono::Datelike;
use regex::Regex;

use crate::config::{YEAR_MAX, YEAR_MIN};

/// Four-digit year token not embedded in a longer number.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static YEAR_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(1[89]\d{2}|20\d{2})\b").expect("valid regex"));

/// Phrases that announce the official publication date on the same line.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static PUBLICATION_PHRASE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:diario\s+oficial\s+de\s+la\s+federaci[óo]n|\bD\.?\s?O\.?\s?F\.?(?:\s|$|,)|publicad[ao]s?\b)")
        .expect("valid regex")
});

/// Upper bound for inferred years: the current year, capped at [`YEAR_MAX`].
#[must_use]
pub fn year_ceiling() -> i32 {
    chrono::Local::now().year().min(YEAR_MAX)
}

/// Infer the publication year against [`year_ceiling`].
#[must_use]
pub fn infer_publication_year(text: &str) -> Option<i32> {
    infer_publication_year_with_ceiling(text, year_ceiling())
}

/// Infer the publication year with an explicit ceiling.
///
/// A year that follows a publication phrase on the same line wins. Otherwise
/// the largest year in `[YEAR_MIN, ceiling]` anywhere in the text.
#[must_use]
pub fn infer_publication_year_with_ceiling(text: &str, ceiling: i32) -> Option<i32> {
    let in_range = |year: i32| (YEAR_MIN..=ceiling).contains(&year);
    let years_in = |s: &str| {
        YEAR_TOKEN
            .find_iter(s)
            .filter_map(|m| m.as_str().parse::<i32>().ok())
            .filter(|y| in_range(*y))
            .collect::<Vec<_>>()
    };

    let announced = text.lines().find_map(|line| {
        let phrase = PUBLICATION_PHRASE.find(line)?;
        years_in(&line[phrase.end()..]).into_iter().next()
    });

    if let Some(year) = announced {
        tracing::debug!(year, "Publication year from publication phrase");
        return Some(year);
    }

    let largest = years_in(text).into_iter().max();
    if let Some(year) = largest {
        tracing::debug!(year, "Publication year from largest year token");
    }
    largest
}
