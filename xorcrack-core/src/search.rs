// File:    search.rs
// Author:  apezoo
// Date:    2026-10-19
//
// Description: Drives the crib search over every (key length, offset) hypothesis and reports the result.
//
// License:
// This project is licensed under the terms of the GNU AGPLv3 license.
// See the LICENSE.md file in the project root for full license information.

//! Search orchestration.
//!
//! Hypotheses are visited in canonical order: ascending key length, then
//! ascending crib offset. The first accepted hypothesis in that order wins,
//! for the sequential and the parallel search alike. When nothing is
//! accepted the search returns ranked diagnostics instead of failing.

use log::{debug, info, trace};
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use crate::bytes::cycle_xor_into;
use crate::completer::{Completion, KeyCompleter};
use crate::config::SearchConfig;
use crate::crib::{Derivation, derive_key, overlay_key};
use crate::validator::{Validator, is_printable, printable_count};

/// One (key length, crib offset) pair to test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Hypothesis {
    /// Assumed period of the repeating key.
    pub key_len: usize,
    /// Assumed start of the crib in the ciphertext.
    pub offset: usize,
}

/// A recovered key and what it decrypts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recovered {
    /// Length of the recovered key.
    pub key_len: usize,
    /// Crib offset under which the key was derived.
    pub offset: usize,
    /// The key bytes.
    pub key: Vec<u8>,
    /// The flag found in the plaintext.
    pub flag: String,
    /// The full plaintext.
    pub plaintext: Vec<u8>,
}

impl Recovered {
    /// The key as text, if every byte is printable ASCII.
    #[must_use]
    pub fn key_text(&self) -> Option<String> {
        self.key
            .iter()
            .all(|&b| is_printable(b))
            .then(|| self.key.iter().map(|&b| char::from(b)).collect())
    }

    /// The plaintext as text; accepted plaintexts are always valid UTF-8.
    #[must_use]
    pub fn plaintext_text(&self) -> String {
        String::from_utf8_lossy(&self.plaintext).into_owned()
    }
}

/// A hypothesis rendered with unknown key bytes set to zero, for manual review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Key length used for the derivation.
    pub key_len: usize,
    /// Crib offset used for the derivation.
    pub offset: usize,
    /// The derived key with unknown slots zero-filled.
    pub key: Vec<u8>,
    /// Start of the decoded plaintext, non-printable bytes shown as `.`.
    pub preview: String,
    /// Number of printable bytes in the full decoded plaintext.
    pub score: usize,
}

/// Result of a crib search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// A hypothesis produced an accepted plaintext.
    Recovered(Recovered),
    /// The whole space was searched without success; best guesses first.
    NoMatch(Vec<Diagnostic>),
    /// The caller raised the cancellation flag.
    Cancelled,
}

/// What a single hypothesis reduces to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Evaluation {
    /// The crib cannot sit there under this key length.
    Skip,
    /// Too expensive to complete, or no completion validated.
    Reject,
    /// A completion validated.
    Accept(Recovered),
    /// The caller stopped the completion before it finished.
    Abandoned,
}

/// Enumerates hypotheses in canonical order.
///
/// Key lengths run over `min_key_len..=max_key_len`, offsets over every
/// position where the crib fits. Nothing is produced when the crib is longer
/// than the ciphertext. An empty crib pins nothing, so it is only placed at
/// offset 0.
pub fn hypotheses(
    cipher_len: usize,
    crib_len: usize,
    min_key_len: usize,
    max_key_len: usize,
) -> impl Iterator<Item = Hypothesis> {
    let last_offset = if crib_len == 0 {
        Some(0)
    } else {
        cipher_len.checked_sub(crib_len)
    };
    (min_key_len.max(1)..=max_key_len).flat_map(move |key_len| {
        last_offset
            .into_iter()
            .flat_map(|last| 0..=last)
            .map(move |offset| Hypothesis { key_len, offset })
    })
}

/// Searches for a repeating key under which `crib` appears in the plaintext.
///
/// Runs on the calling thread and stops at the first accepted hypothesis.
#[must_use]
pub fn search(cipher: &[u8], crib: &[u8], config: &SearchConfig) -> SearchOutcome {
    search_with_cancel(cipher, crib, config, &AtomicBool::new(false))
}

/// Like [`search`], checking `cancel` between hypotheses and during key
/// completion.
#[must_use]
pub fn search_with_cancel(
    cipher: &[u8],
    crib: &[u8],
    config: &SearchConfig,
    cancel: &AtomicBool,
) -> SearchOutcome {
    let search = CribSearch::new(cipher, crib, config);
    info!(
        "searching key lengths {}..={} over {} ciphertext bytes",
        config.min_key_len, config.max_key_len, cipher.len()
    );
    for hypothesis in hypotheses(cipher.len(), crib.len(), config.min_key_len, config.max_key_len) {
        if cancel.load(Ordering::Relaxed) {
            info!("search cancelled before {hypothesis:?}");
            return SearchOutcome::Cancelled;
        }
        match search.evaluate(hypothesis, || cancel.load(Ordering::Relaxed)) {
            Evaluation::Accept(recovered) => {
                info!(
                    "recovered key of length {} at offset {}",
                    recovered.key_len, recovered.offset
                );
                return SearchOutcome::Recovered(recovered);
            }
            Evaluation::Abandoned => {
                info!("search cancelled during {hypothesis:?}");
                return SearchOutcome::Cancelled;
            }
            Evaluation::Skip | Evaluation::Reject => {}
        }
    }
    search.no_match()
}

/// Parallel version of [`search`] on the rayon thread pool.
///
/// Reports the same hypothesis as [`search`]: once a worker accepts a
/// hypothesis, every later hypothesis in canonical order is skipped or
/// abandoned mid-completion, and the accepted hypothesis with the smallest
/// index is returned.
#[must_use]
pub fn search_parallel(cipher: &[u8], crib: &[u8], config: &SearchConfig) -> SearchOutcome {
    let search = CribSearch::new(cipher, crib, config);
    let space: Vec<Hypothesis> =
        hypotheses(cipher.len(), crib.len(), config.min_key_len, config.max_key_len).collect();
    info!(
        "searching {} hypotheses on {} threads",
        space.len(),
        rayon::current_num_threads()
    );

    let winner = AtomicUsize::new(usize::MAX);
    let accepted = space
        .par_iter()
        .enumerate()
        .filter_map(|(index, &hypothesis)| {
            if index > winner.load(Ordering::Acquire) {
                return None;
            }
            match search.evaluate(hypothesis, || winner.load(Ordering::Acquire) < index) {
                Evaluation::Accept(recovered) => {
                    winner.fetch_min(index, Ordering::AcqRel);
                    Some((index, recovered))
                }
                Evaluation::Skip | Evaluation::Reject | Evaluation::Abandoned => None,
            }
        })
        .min_by_key(|(index, _)| *index);

    match accepted {
        Some((_, recovered)) => {
            info!(
                "recovered key of length {} at offset {}",
                recovered.key_len, recovered.offset
            );
            SearchOutcome::Recovered(recovered)
        }
        None => search.no_match(),
    }
}

/// Ranks zero-filled derivations at the configured diagnostic key lengths.
///
/// Sorted by descending score; ties keep canonical order. At most
/// `config.diagnostic_count` entries are returned. If every placement
/// conflicts, the keys are rebuilt with later crib bytes overwriting earlier
/// ones, so the list is only empty when the crib does not fit the ciphertext.
#[must_use]
pub fn diagnostics(cipher: &[u8], crib: &[u8], config: &SearchConfig) -> Vec<Diagnostic> {
    let (cipher_len, crib_len) = (cipher.len(), crib.len());
    let placements = || {
        config
            .diagnostic_key_lengths
            .iter()
            .flat_map(move |&len| hypotheses(cipher_len, crib_len, len, len))
    };

    let mut found: Vec<Diagnostic> = placements()
        .filter_map(|hypothesis| {
            match derive_key(cipher, crib, hypothesis.offset, hypothesis.key_len) {
                Derivation::Partial(partial) => {
                    Some(diagnostic(cipher, hypothesis, partial.zero_filled(), config))
                }
                Derivation::Conflict(_) => None,
            }
        })
        .collect();
    if found.is_empty() {
        debug!("every diagnostic placement conflicts; overlaying the crib instead");
        found = placements()
            .filter_map(|hypothesis| {
                overlay_key(cipher, crib, hypothesis.offset, hypothesis.key_len)
                    .map(|key| diagnostic(cipher, hypothesis, key, config))
            })
            .collect();
    }

    found.sort_by(|a, b| b.score.cmp(&a.score));
    found.truncate(config.diagnostic_count);
    found
}

fn diagnostic(
    cipher: &[u8],
    hypothesis: Hypothesis,
    key: Vec<u8>,
    config: &SearchConfig,
) -> Diagnostic {
    let mut plaintext = Vec::with_capacity(cipher.len());
    cycle_xor_into(cipher, &key, &mut plaintext);
    Diagnostic {
        key_len: hypothesis.key_len,
        offset: hypothesis.offset,
        key,
        preview: preview(&plaintext, config.preview_len),
        score: printable_count(&plaintext),
    }
}

fn preview(plaintext: &[u8], len: usize) -> String {
    plaintext
        .iter()
        .take(len)
        .map(|&b| if is_printable(b) { char::from(b) } else { '.' })
        .collect()
}

/// Shared, read-only state for evaluating hypotheses.
struct CribSearch<'a> {
    cipher: &'a [u8],
    crib: &'a [u8],
    config: &'a SearchConfig,
    validator: Validator,
}

impl<'a> CribSearch<'a> {
    fn new(cipher: &'a [u8], crib: &'a [u8], config: &'a SearchConfig) -> Self {
        Self {
            cipher,
            crib,
            config,
            validator: config.validator(),
        }
    }

    fn evaluate(&self, hypothesis: Hypothesis, abandon: impl Fn() -> bool) -> Evaluation {
        let Hypothesis { key_len, offset } = hypothesis;
        let partial = match derive_key(self.cipher, self.crib, offset, key_len) {
            Derivation::Partial(partial) => partial,
            Derivation::Conflict(conflict) => {
                trace!("{hypothesis:?} conflicts: {conflict:?}");
                return Evaluation::Skip;
            }
        };

        let completer =
            KeyCompleter::new(&self.validator, self.config.max_unknown, self.config.policy);
        match completer.complete_until(self.cipher, &partial, abandon) {
            Completion::Accepted(candidate) => {
                debug!("{hypothesis:?} accepted with flag {}", candidate.flag);
                Evaluation::Accept(Recovered {
                    key_len,
                    offset,
                    key: candidate.key,
                    flag: candidate.flag,
                    plaintext: candidate.plaintext,
                })
            }
            Completion::BudgetExceeded { unknown, budget } => {
                trace!("{hypothesis:?} leaves {unknown} unknown slots, budget is {budget}");
                Evaluation::Reject
            }
            Completion::Exhausted => Evaluation::Reject,
            Completion::Abandoned => Evaluation::Abandoned,
        }
    }

    fn no_match(&self) -> SearchOutcome {
        info!("no hypothesis accepted; building diagnostics");
        SearchOutcome::NoMatch(diagnostics(self.cipher, self.crib, self.config))
    }
}

/// Evaluates a single hypothesis with the given configuration.
#[must_use]
pub fn evaluate(
    cipher: &[u8],
    crib: &[u8],
    config: &SearchConfig,
    hypothesis: Hypothesis,
) -> Evaluation {
    CribSearch::new(cipher, crib, config).evaluate(hypothesis, || false)
}
