// File:    single_byte.rs
// Author:  apezoo
// Date:    2026-10-19
//
// Description: Exhaustive recovery of a one-byte XOR key, with a printability fallback.
//
// License:
// This project is licensed under the terms of the GNU AGPLv3 license.
// See the LICENSE.md file in the project root for full license information.

//! Single-byte XOR.
//!
//! A one-byte key has only 256 values, so every key is tried directly and no
//! crib is needed.

use log::{debug, warn};

use crate::bytes::xor_with_byte;
use crate::validator::{Validator, Verdict, printable_ratio};

/// A key whose plaintext contains a flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SingleByteHit {
    /// The key byte.
    pub key: u8,
    /// The flag found in the plaintext.
    pub flag: String,
    /// The decoded plaintext.
    pub plaintext: Vec<u8>,
}

/// Result of trying all 256 single-byte keys.
#[derive(Debug, Clone, PartialEq)]
pub enum SingleByteOutcome {
    /// Exactly one key yields a flag.
    Unique(SingleByteHit),
    /// Several keys yield a flag; listed by ascending key.
    Ambiguous(Vec<SingleByteHit>),
    /// No key yields a flag. This is the most printable decoding and is not
    /// authoritative.
    BestEffort {
        /// The key byte.
        key: u8,
        /// The decoded plaintext.
        plaintext: Vec<u8>,
        /// Share of printable ASCII bytes in `plaintext`.
        printable_ratio: f64,
    },
}

/// Tries every single-byte key against `cipher`.
///
/// A key counts as a hit when the validator accepts its plaintext. Without
/// any hit, the key with the highest printable ratio is reported; ties go to
/// the lowest key.
#[must_use]
pub fn crack_single_byte(cipher: &[u8], validator: &Validator) -> SingleByteOutcome {
    let mut hits = Vec::new();
    let mut best: Option<(u8, f64)> = None;

    for key in 0..=u8::MAX {
        let plaintext = xor_with_byte(cipher, key);
        if let Verdict::Accepted(flag) = validator.validate(&plaintext) {
            hits.push(SingleByteHit {
                key,
                flag,
                plaintext,
            });
            continue;
        }
        let ratio = printable_ratio(&plaintext);
        if best.is_none_or(|(_, top)| ratio > top) {
            best = Some((key, ratio));
        }
    }

    match hits.len() {
        0 => {
            let (key, ratio) = best.unwrap_or((0, 0.0));
            debug!(
                "no single-byte key produced a flag; best effort key {key:#04x} ({ratio:.2} printable)"
            );
            SingleByteOutcome::BestEffort {
                key,
                plaintext: xor_with_byte(cipher, key),
                printable_ratio: ratio,
            }
        }
        1 => {
            let hit = hits.remove(0);
            debug!("single-byte key {:#04x} produced {}", hit.key, hit.flag);
            SingleByteOutcome::Unique(hit)
        }
        n => {
            warn!("{n} single-byte keys produced a flag");
            SingleByteOutcome::Ambiguous(hits)
        }
    }
}
