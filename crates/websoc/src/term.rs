//! Academic term codes and the release-date term resolver.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Quarter encoded by the two-digit suffix of a term code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Quarter {
    Fall,
    Winter,
    Spring,
    SummerSession1,
    Summer10Week,
    SummerSession2,
}

impl Quarter {
    /// Returns the registrar's suffix for this quarter.
    pub fn code(&self) -> &'static str {
        match self {
            Quarter::Fall => "92",
            Quarter::Winter => "03",
            Quarter::Spring => "14",
            Quarter::SummerSession1 => "25",
            Quarter::Summer10Week => "39",
            Quarter::SummerSession2 => "76",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "92" => Some(Quarter::Fall),
            "03" => Some(Quarter::Winter),
            "14" => Some(Quarter::Spring),
            "25" => Some(Quarter::SummerSession1),
            "39" => Some(Quarter::Summer10Week),
            "76" => Some(Quarter::SummerSession2),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid term code: {0:?} (expected YYYY-NN)")]
pub struct InvalidTerm(pub String);

/// A term code such as `2024-92`.
///
/// The calendar year is needed to place final exams, which are printed
/// without one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Term {
    code: String,
    year: i32,
}

impl Term {
    pub fn new(code: &str) -> Result<Self, InvalidTerm> {
        let code = code.trim();
        let invalid = || InvalidTerm(code.to_string());

        // Normally the YYYY prefix; a bare trailing year is also accepted.
        let year_digits = match code.split_once('-') {
            Some((year, _)) => year,
            None => code.get(code.len().saturating_sub(4)..).ok_or_else(invalid)?,
        };

        if year_digits.len() != 4 || !year_digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }

        let year = year_digits.parse::<i32>().map_err(|_| invalid())?;
        Ok(Self {
            code: code.to_string(),
            year,
        })
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    /// Calendar year that final-exam dates fall in.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Decodes the quarter suffix, if the code has one we recognize.
    pub fn quarter(&self) -> Option<Quarter> {
        self.code
            .split_once('-')
            .and_then(|(_, suffix)| Quarter::from_code(suffix))
    }
}

impl FromStr for Term {
    type Err = InvalidTerm;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Term::new(s)
    }
}

impl TryFrom<String> for Term {
    type Error = InvalidTerm;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Term::new(&value)
    }
}

impl From<Term> for String {
    fn from(term: Term) -> Self {
        term.code
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code)
    }
}

/// One row of the release table: the term becomes current on `date`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermCutoff {
    pub term: Term,
    pub date: NaiveDate,
}

/// Picks the term whose listings are current on `today`.
///
/// The table must be ordered most-recent-first; the first entry whose cutoff
/// is on or before `today` wins. Returns `None` when no cutoff has passed,
/// which callers should report as a configuration gap.
pub fn resolve_term(today: NaiveDate, cutoffs: &[TermCutoff]) -> Option<&Term> {
    cutoffs
        .iter()
        .find(|cutoff| cutoff.date <= today)
        .map(|cutoff| &cutoff.term)
}

/// Returns true if every cutoff is strictly earlier than the one before it.
pub fn is_most_recent_first(cutoffs: &[TermCutoff]) -> bool {
    cutoffs.windows(2).all(|pair| pair[0].date > pair[1].date)
}
