// File:    bytes.rs
// Author:  apezoo
// Date:    2026-10-19
//
// Description: Primitive XOR operations and big-endian integer/byte conversions.
//
// License:
// This project is licensed under the terms of the GNU AGPLv3 license.
// See the LICENSE.md file in the project root for full license information.

//! This module contains the byte-level primitives the key search is built on.

use crate::error::XorError;

/// Performs a byte-wise XOR between two slices of equal length.
///
/// # Errors
///
/// Returns [`XorError::LengthMismatch`] if the slices are not of equal length.
pub fn xor(a: &[u8], b: &[u8]) -> Result<Vec<u8>, XorError> {
    if a.len() != b.len() {
        return Err(XorError::LengthMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    Ok(a.iter().zip(b.iter()).map(|(x, y)| x ^ y).collect())
}

/// XORs every operand together, left to right.
///
/// Useful for chained key recovery where several values were combined with
/// XOR and all but one of them are known. An empty list yields an empty vector.
///
/// # Errors
///
/// Returns [`XorError::LengthMismatch`] for the first operand whose length
/// differs from the first one.
pub fn xor_all(inputs: &[&[u8]]) -> Result<Vec<u8>, XorError> {
    let Some((first, rest)) = inputs.split_first() else {
        return Ok(Vec::new());
    };
    rest.iter()
        .try_fold(first.to_vec(), |acc, operand| xor(&acc, operand))
}

/// XORs every byte of `data` with a single key byte.
#[must_use]
pub fn xor_with_byte(data: &[u8], key: u8) -> Vec<u8> {
    data.iter().map(|b| b ^ key).collect()
}

/// Encrypts or decrypts `data` with a key repeated cyclically over its length.
///
/// The operation is its own inverse: applying it twice with the same key
/// returns the original bytes.
///
/// # Errors
///
/// Returns [`XorError::EmptyKey`] if `key` is empty.
pub fn repeating_key_xor(data: &[u8], key: &[u8]) -> Result<Vec<u8>, XorError> {
    if key.is_empty() {
        return Err(XorError::EmptyKey);
    }
    let mut out = Vec::with_capacity(data.len());
    cycle_xor_into(data, key, &mut out);
    Ok(out)
}

/// Repeating-key XOR into a reusable buffer. `key` must be non-empty; the
/// search only calls this with keys of at least one byte.
pub(crate) fn cycle_xor_into(data: &[u8], key: &[u8], out: &mut Vec<u8>) {
    out.clear();
    out.extend(data.iter().zip(key.iter().cycle()).map(|(d, k)| d ^ k));
}

/// Converts an integer into its minimal big-endian byte representation.
///
/// Zero is encoded as a single `0x00` byte so the result is never empty.
#[must_use]
pub fn int_to_bytes(n: u128) -> Vec<u8> {
    let bytes = n.to_be_bytes();
    let first = bytes
        .iter()
        .position(|&b| b != 0)
        .unwrap_or(bytes.len() - 1);
    bytes[first..].to_vec()
}

/// Interprets a big-endian byte slice as an integer.
///
/// Leading zero bytes are ignored. Returns `None` if more than 16
/// significant bytes remain.
#[must_use]
pub fn bytes_to_int(bytes: &[u8]) -> Option<u128> {
    let start = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
    let significant = &bytes[start..];
    if significant.len() > 16 {
        return None;
    }
    Some(
        significant
            .iter()
            .fold(0u128, |acc, &b| (acc << 8) | u128::from(b)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xor_rejects_unequal_lengths() {
        assert_eq!(
            xor(b"abc", b"ab"),
            Err(XorError::LengthMismatch { left: 3, right: 2 })
        );
    }

    #[test]
    fn xor_label_with_thirteen() {
        let key = vec![13u8; 5];
        assert_eq!(xor(b"label", &key).unwrap(), b"aloha");
    }

    #[test]
    fn xor_all_recovers_last_operand() {
        let k1 = [0x11, 0x22, 0x33];
        let k2 = [0x0f, 0xf0, 0xaa];
        let flag = *b"hey";
        let combined = xor_all(&[&k1, &k2, &flag]).unwrap();
        assert_eq!(xor_all(&[&combined, &k1, &k2]).unwrap(), flag);
        assert!(xor_all(&[]).unwrap().is_empty());
        assert!(xor_all(&[&k1, b"toolong"]).is_err());
    }

    #[test]
    fn repeating_key_is_an_involution() {
        let data = b"Burning 'em, if you ain't quick and nimble";
        let once = repeating_key_xor(data, b"ICE").unwrap();
        assert_ne!(&once[..], &data[..]);
        assert_eq!(repeating_key_xor(&once, b"ICE").unwrap(), data);
        assert_eq!(repeating_key_xor(data, b""), Err(XorError::EmptyKey));
    }

    #[test]
    fn int_to_bytes_is_minimal() {
        assert_eq!(int_to_bytes(0), vec![0]);
        assert_eq!(int_to_bytes(0xff), vec![0xff]);
        assert_eq!(int_to_bytes(0x0100), vec![0x01, 0x00]);
        assert_eq!(int_to_bytes(u128::MAX), vec![0xff; 16]);
    }

    #[test]
    fn bytes_to_int_inverts_int_to_bytes() {
        for n in [0u128, 1, 255, 256, 0x6372_7970_746f, u128::MAX] {
            assert_eq!(bytes_to_int(&int_to_bytes(n)), Some(n));
        }
        assert_eq!(bytes_to_int(&[0, 0, 1]), Some(1));
        assert_eq!(bytes_to_int(&[1; 17]), None);
    }
}
