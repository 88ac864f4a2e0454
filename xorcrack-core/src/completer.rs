// File:    completer.rs
// Author:  apezoo
// Date:    2026-10-19
//
// Description: Bounded brute-force completion of the unknown slots of a partial key.
//
// License:
// This project is licensed under the terms of the GNU AGPLv3 license.
// See the LICENSE.md file in the project root for full license information.

//! Key completion.
//!
//! Every unknown slot multiplies the work by 256, so completion is refused
//! outright once a partial key has more unknown slots than the budget allows.

use serde::{Deserialize, Serialize};

use crate::bytes::cycle_xor_into;
use crate::crib::PartialKey;
use crate::validator::{Validator, Verdict, text_score};

/// Default number of unknown key slots that may be brute-forced.
pub const DEFAULT_MAX_UNKNOWN: usize = 3;

/// What to do when several completions of the same partial key validate.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CompletionPolicy {
    /// Stop at the first accepted completion in enumeration order.
    #[default]
    First,
    /// Try every completion and keep the accepted one with the best text score.
    Ranked,
}

/// A fully resolved key whose plaintext passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// The complete key.
    pub key: Vec<u8>,
    /// The flag found in the plaintext.
    pub flag: String,
    /// The full decoded plaintext.
    pub plaintext: Vec<u8>,
}

/// Outcome of completing one partial key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// A completion validated.
    Accepted(Candidate),
    /// Every completion was tried and none validated.
    Exhausted,
    /// Too many unknown slots; nothing was tried.
    BudgetExceeded {
        /// Unknown slots in the partial key.
        unknown: usize,
        /// The configured limit.
        budget: usize,
    },
    /// The caller asked to stop before every completion was tried.
    Abandoned,
}

/// Enumerates assignments of the unknown slots and validates each decoded plaintext.
#[derive(Debug, Clone, Copy)]
pub struct KeyCompleter<'v> {
    validator: &'v Validator,
    max_unknown: usize,
    policy: CompletionPolicy,
}

impl<'v> KeyCompleter<'v> {
    /// Creates a completer that brute-forces at most `max_unknown` slots.
    #[must_use]
    pub const fn new(
        validator: &'v Validator,
        max_unknown: usize,
        policy: CompletionPolicy,
    ) -> Self {
        Self {
            validator,
            max_unknown,
            policy,
        }
    }

    /// Completes `partial` against `cipher`.
    ///
    /// Assignments are enumerated with every unknown slot counting up from
    /// `0x00`; the lowest-indexed unknown slot changes slowest.
    #[must_use]
    pub fn complete(&self, cipher: &[u8], partial: &PartialKey) -> Completion {
        self.complete_until(cipher, partial, || false)
    }

    /// Like [`complete`](Self::complete), polling `abandon` every 256
    /// assignments and giving up with [`Completion::Abandoned`] once it
    /// returns `true`.
    #[must_use]
    pub fn complete_until(
        &self,
        cipher: &[u8],
        partial: &PartialKey,
        abandon: impl Fn() -> bool,
    ) -> Completion {
        let unknown = partial.unknown_slots();
        if unknown.len() > self.max_unknown {
            return Completion::BudgetExceeded {
                unknown: unknown.len(),
                budget: self.max_unknown,
            };
        }

        let mut key = partial.zero_filled();
        let mut plaintext = Vec::with_capacity(cipher.len());
        let mut best: Option<(Candidate, (usize, usize))> = None;
        let mut tried: u64 = 0;

        loop {
            if tried % 256 == 255 && abandon() {
                return Completion::Abandoned;
            }
            tried += 1;
            cycle_xor_into(cipher, &key, &mut plaintext);
            if let Verdict::Accepted(flag) = self.validator.validate(&plaintext) {
                let candidate = Candidate {
                    key: key.clone(),
                    flag,
                    plaintext: plaintext.clone(),
                };
                match self.policy {
                    CompletionPolicy::First => return Completion::Accepted(candidate),
                    CompletionPolicy::Ranked => {
                        let score = text_score(&candidate.plaintext);
                        if best.as_ref().is_none_or(|(_, top)| score > *top) {
                            best = Some((candidate, score));
                        }
                    }
                }
            }
            if !advance(&mut key, &unknown) {
                break;
            }
        }

        best.map_or(Completion::Exhausted, |(candidate, _)| {
            Completion::Accepted(candidate)
        })
    }
}

/// Steps the unknown slots to the next assignment, odometer style.
/// Returns `false` once every assignment has been visited.
fn advance(key: &mut [u8], unknown: &[usize]) -> bool {
    for &slot in unknown.iter().rev() {
        let (next, wrapped) = key[slot].overflowing_add(1);
        key[slot] = next;
        if !wrapped {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bytes::repeating_key_xor;
    use crate::crib::{Derivation, derive_key};
    use crate::pattern::{BodyClass, FlagPattern};

    fn partial(cipher: &[u8], crib: &[u8], key_len: usize) -> PartialKey {
        match derive_key(cipher, crib, 0, key_len) {
            Derivation::Partial(partial) => partial,
            Derivation::Conflict(conflict) => panic!("unexpected conflict: {conflict:?}"),
        }
    }

    #[test]
    fn advance_visits_every_assignment_in_order() {
        let mut key = vec![9, 0, 9, 0];
        let unknown = [1, 3];
        let mut seen = vec![(key[1], key[3])];
        while advance(&mut key, &unknown) {
            seen.push((key[1], key[3]));
        }
        assert_eq!(seen.len(), 256 * 256);
        assert_eq!(seen[1], (0, 1));
        assert_eq!(seen[256], (1, 0));
        assert_eq!(key, vec![9, 0, 9, 0]);
    }

    #[test]
    fn completes_missing_key_byte() {
        let key = b"KEY!";
        let cipher = repeating_key_xor(b"crypto{brute}", key).unwrap();
        let validator = Validator::default();
        let completer = KeyCompleter::new(&validator, 1, CompletionPolicy::First);
        let Completion::Accepted(found) = completer.complete(&cipher, &partial(&cipher, b"cry", 4))
        else {
            panic!("expected a completion");
        };
        assert_eq!(&found.key[..3], b"KEY");
        assert!(found.flag.starts_with("crypto{"));
        assert_eq!(
            repeating_key_xor(&cipher, &found.key).unwrap(),
            found.plaintext
        );
    }

    #[test]
    fn enforces_budget_without_trying() {
        let cipher = repeating_key_xor(b"crypto{budget}", b"abcdef").unwrap();
        let validator = Validator::default();
        let completer = KeyCompleter::new(&validator, 2, CompletionPolicy::First);
        assert_eq!(
            completer.complete(&cipher, &partial(&cipher, b"cry", 6)),
            Completion::BudgetExceeded {
                unknown: 3,
                budget: 2
            }
        );
    }

    #[test]
    fn fully_known_key_is_checked_once() {
        let cipher = repeating_key_xor(b"no flag in here", b"k").unwrap();
        let validator = Validator::default();
        let completer = KeyCompleter::new(&validator, 0, CompletionPolicy::First);
        assert_eq!(
            completer.complete(&cipher, &partial(&cipher, b"no", 1)),
            Completion::Exhausted
        );
    }

    #[test]
    fn ranked_policy_prefers_cleaner_plaintext() {
        // Slot 7 is unknown; many values keep the flag intact, few keep
        // every body byte alphanumeric.
        let plaintext = b"crypto{aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa}";
        let key = b"\x00\x00\x00\x00\x00\x00\x00\x20";
        let cipher = repeating_key_xor(plaintext, key).unwrap();
        let validator = Validator::default();
        let ranked = KeyCompleter::new(&validator, 1, CompletionPolicy::Ranked);
        let Completion::Accepted(found) = ranked.complete(&cipher, &partial(&cipher, b"crypto{", 8))
        else {
            panic!("expected a completion");
        };
        let (printable, word) = text_score(&found.plaintext);
        assert_eq!(printable, plaintext.len());
        assert_eq!(word, plaintext.len() - 2);
    }

    #[test]
    fn abandons_when_asked() {
        let cipher = repeating_key_xor(b"crypto{never_found}", b"abcdefghij").unwrap();
        let validator = Validator::new(FlagPattern::new("absent", BodyClass::Word), 0.95);
        let completer = KeyCompleter::new(&validator, 3, CompletionPolicy::First);
        assert_eq!(
            completer.complete_until(&cipher, &partial(&cipher, b"crypto{", 10), || true),
            Completion::Abandoned
        );
    }
}
