// File:    crib.rs
// Author:  apezoo
// Date:    2026-10-19
//
// Description: Derives a partial repeating key from one (key length, crib offset) hypothesis.
//
// License:
// This project is licensed under the terms of the GNU AGPLv3 license.
// See the LICENSE.md file in the project root for full license information.

//! Crib matching.
//!
//! Placing a known plaintext fragment at `offset` pins the key byte at every
//! position it covers: `key[(offset + i) % key_len] = cipher[offset + i] ^ crib[i]`.
//! When the crib is longer than the key, several crib bytes land on the same
//! slot and must agree.

/// A key of fixed length whose slots are either derived or still unknown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartialKey {
    slots: Vec<Option<u8>>,
}

impl PartialKey {
    /// Creates a key of `len` unknown slots.
    #[must_use]
    pub fn unknown(len: usize) -> Self {
        Self {
            slots: vec![None; len],
        }
    }

    /// The key length.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the key has no slots at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// The value of slot `index`, if it has been derived.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<u8> {
        self.slots.get(index).copied().flatten()
    }

    /// All slots in key order.
    #[must_use]
    pub fn slots(&self) -> &[Option<u8>] {
        &self.slots
    }

    /// Indices of the slots that are still unknown, ascending.
    #[must_use]
    pub fn unknown_slots(&self) -> Vec<usize> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.is_none().then_some(i))
            .collect()
    }

    /// Number of unknown slots.
    #[must_use]
    pub fn unknown_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_none()).count()
    }

    /// Returns the key with every unknown slot set to zero.
    #[must_use]
    pub fn zero_filled(&self) -> Vec<u8> {
        self.slots.iter().map(|slot| slot.unwrap_or(0)).collect()
    }

    /// Returns the full key if every slot is known.
    #[must_use]
    pub fn to_complete(&self) -> Option<Vec<u8>> {
        self.slots.iter().copied().collect()
    }
}

/// Why a hypothesis was discarded before completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conflict {
    /// A key length of zero was requested.
    ZeroKeyLength,
    /// The crib does not fit in the ciphertext at this offset.
    OutOfBounds {
        /// Requested crib offset.
        offset: usize,
        /// Crib length.
        crib_len: usize,
        /// Ciphertext length.
        cipher_len: usize,
    },
    /// Two crib bytes require different values for the same key slot.
    Contradiction {
        /// The key slot in dispute.
        slot: usize,
        /// The value already derived for the slot.
        existing: u8,
        /// The value the later crib byte requires.
        derived: u8,
    },
}

/// Outcome of aligning a crib under one hypothesis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Derivation {
    /// The hypothesis is self-consistent; unknown slots may remain.
    Partial(PartialKey),
    /// The hypothesis cannot hold.
    Conflict(Conflict),
}

/// Derives key bytes assuming the crib starts at `offset` and the key repeats
/// every `key_len` bytes.
///
/// Returns on the first contradiction; no partial key is produced for a
/// conflicting hypothesis.
#[must_use]
pub fn derive_key(cipher: &[u8], crib: &[u8], offset: usize, key_len: usize) -> Derivation {
    if key_len == 0 {
        return Derivation::Conflict(Conflict::ZeroKeyLength);
    }
    let Some(window) = offset
        .checked_add(crib.len())
        .and_then(|end| cipher.get(offset..end))
    else {
        return Derivation::Conflict(Conflict::OutOfBounds {
            offset,
            crib_len: crib.len(),
            cipher_len: cipher.len(),
        });
    };

    let mut key = PartialKey::unknown(key_len);
    for (i, (&c, &p)) in window.iter().zip(crib).enumerate() {
        let derived = c ^ p;
        let slot = (offset + i) % key_len;
        match key.slots[slot] {
            None => key.slots[slot] = Some(derived),
            Some(existing) if existing != derived => {
                return Derivation::Conflict(Conflict::Contradiction {
                    slot,
                    existing,
                    derived,
                });
            }
            Some(_) => {}
        }
    }
    Derivation::Partial(key)
}

/// Derives a zero-filled key from one crib placement, letting later crib
/// bytes overwrite earlier ones instead of reporting a contradiction.
///
/// Only meant for ranking guesses once every consistent placement is gone.
/// Returns `None` for a zero key length or a crib that does not fit at `offset`.
#[must_use]
pub fn overlay_key(cipher: &[u8], crib: &[u8], offset: usize, key_len: usize) -> Option<Vec<u8>> {
    if key_len == 0 {
        return None;
    }
    let window = cipher.get(offset..offset.checked_add(crib.len())?)?;
    let mut key = vec![0u8; key_len];
    for (i, (&c, &p)) in window.iter().zip(crib).enumerate() {
        key[(offset + i) % key_len] = c ^ p;
    }
    Some(key)
}
