// File:    lib.rs
// Author:  apezoo
// Date:    2026-10-19
//
// Description: The main library crate for xorcrack-core, recovering repeating XOR keys from a known crib.
//
// License:
// This project is licensed under the terms of the GNU AGPLv3 license.
// See the LICENSE.md file in the project root for full license information.

//! # XOR Crack Core Library
//!
//! Known-plaintext recovery of repeating-key XOR keys. Given a ciphertext and
//! a crib (a fragment of the plaintext), the search tries every key length and
//! crib position, derives the key bytes the crib pins down, brute-forces the
//! few that remain, and accepts the key whose plaintext holds a flag.
//!
//! ```
//! use xorcrack_core::{bytes, config::SearchConfig, search::{search, SearchOutcome}};
//!
//! let cipher = bytes::repeating_key_xor(b"intro crypto{cr1b_dr4gg1ng} outro", b"KEY").unwrap();
//! match search(&cipher, b"crypto{", &SearchConfig::default()) {
//!     SearchOutcome::Recovered(found) => assert_eq!(found.key, b"KEY"),
//!     other => panic!("no key recovered: {other:?}"),
//! }
//! ```

/// Primitive XOR operations and integer/byte conversions.
pub mod bytes;
/// Brute-force completion of partially derived keys.
pub mod completer;
/// Search configuration and its JSON persistence.
pub mod config;
/// Key derivation from one crib placement.
pub mod crib;
/// Error types.
pub mod error;
/// Random key generation.
pub mod keygen;
/// The `prefix{body}` flag pattern.
pub mod pattern;
/// The hypothesis search and its diagnostics.
pub mod search;
/// Exhaustive single-byte key recovery.
pub mod single_byte;
/// Candidate plaintext validation.
pub mod validator;

pub use error::{ConfigError, XorError};
