// File:    keygen.rs
// Author:  apezoo
// Date:    2026-10-19
//
// Description: Generates random repeating keys for building test ciphertexts.
//
// License:
// This project is licensed under the terms of the GNU AGPLv3 license.
// See the LICENSE.md file in the project root for full license information.

use rand::{TryRngCore, rngs::OsRng};

use crate::error::XorError;

/// Generates a key of `len` random bytes from the operating system RNG.
///
/// # Errors
///
/// Returns [`XorError::EmptyKey`] if `len` is zero, or [`XorError::Rng`] if
/// the operating system RNG fails.
pub fn generate_key(len: usize) -> Result<Vec<u8>, XorError> {
    if len == 0 {
        return Err(XorError::EmptyKey);
    }
    let mut rng = OsRng;
    let mut key = vec![0u8; len];
    rng.try_fill_bytes(&mut key)
        .map_err(|e| XorError::Rng(e.to_string()))?;
    Ok(key)
}
