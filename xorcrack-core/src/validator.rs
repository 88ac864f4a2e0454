// File:    validator.rs
// Author:  apezoo
// Date:    2026-10-19
//
// Description: Accepts or rejects candidate plaintexts by printability, UTF-8 validity and flag pattern.
//
// License:
// This project is licensed under the terms of the GNU AGPLv3 license.
// See the LICENSE.md file in the project root for full license information.

//! Candidate plaintext validation.
//!
//! Checks run cheapest first: the printable-byte ratio, then UTF-8 decoding,
//! then the flag pattern search.

use crate::pattern::FlagPattern;

/// Default minimum share of printable ASCII bytes in an accepted plaintext.
pub const DEFAULT_MIN_PRINTABLE_RATIO: f64 = 0.95;

/// Why a candidate plaintext was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Too few bytes in the printable ASCII range.
    NotPrintable,
    /// The bytes are not valid UTF-8.
    NotUtf8,
    /// The text holds no flag matching the pattern.
    NoFlag,
}

/// The result of validating one candidate plaintext.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The plaintext contains this flag.
    Accepted(String),
    /// The plaintext failed one of the checks.
    Rejected(Rejection),
}

/// Returns whether `b` is printable ASCII (`0x20..=0x7e`).
#[must_use]
pub const fn is_printable(b: u8) -> bool {
    matches!(b, 0x20..=0x7e)
}

/// Counts printable ASCII bytes.
#[must_use]
pub fn printable_count(bytes: &[u8]) -> usize {
    bytes.iter().filter(|&&b| is_printable(b)).count()
}

/// Share of printable ASCII bytes; an empty slice scores zero.
#[must_use]
pub fn printable_ratio(bytes: &[u8]) -> f64 {
    if bytes.is_empty() {
        return 0.0;
    }
    as_f64(printable_count(bytes)) / as_f64(bytes.len())
}

/// Byte counts stay far below 2^52, where the conversion becomes inexact.
#[allow(clippy::cast_precision_loss, reason = "byte counts fit in the mantissa")]
const fn as_f64(n: usize) -> f64 {
    n as f64
}

/// Score used to rank several accepted candidates: printable bytes first,
/// then bytes that could belong to an identifier.
#[must_use]
pub fn text_score(bytes: &[u8]) -> (usize, usize) {
    let word = bytes
        .iter()
        .filter(|&&b| b.is_ascii_alphanumeric() || b == b'_')
        .count();
    (printable_count(bytes), word)
}

/// Decides whether a decoded candidate is the plaintext we are looking for.
#[derive(Debug, Clone)]
pub struct Validator {
    pattern: FlagPattern,
    min_printable_ratio: f64,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(FlagPattern::default(), DEFAULT_MIN_PRINTABLE_RATIO)
    }
}

impl Validator {
    /// Creates a validator for `pattern` with the given printability threshold.
    #[must_use]
    pub const fn new(pattern: FlagPattern, min_printable_ratio: f64) -> Self {
        Self {
            pattern,
            min_printable_ratio,
        }
    }

    /// The flag pattern this validator matches.
    #[must_use]
    pub const fn pattern(&self) -> &FlagPattern {
        &self.pattern
    }

    /// Returns whether enough of `plaintext` is printable ASCII.
    #[must_use]
    pub fn is_mostly_printable(&self, plaintext: &[u8]) -> bool {
        !plaintext.is_empty()
            && as_f64(printable_count(plaintext))
                >= self.min_printable_ratio * as_f64(plaintext.len())
    }

    /// Runs the printability, UTF-8 and pattern checks in that order.
    #[must_use]
    pub fn validate(&self, plaintext: &[u8]) -> Verdict {
        if !self.is_mostly_printable(plaintext) {
            return Verdict::Rejected(Rejection::NotPrintable);
        }
        let Ok(text) = std::str::from_utf8(plaintext) else {
            return Verdict::Rejected(Rejection::NotUtf8);
        };
        self.pattern.find(text).map_or(
            Verdict::Rejected(Rejection::NoFlag),
            |flag| Verdict::Accepted(flag.to_string()),
        )
    }
}
