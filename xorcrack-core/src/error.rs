// File:    error.rs
// Author:  apezoo
// Date:    2026-10-19
//
// Description: Error types for byte operations, key generation and configuration handling.
//
// License:
// This project is licensed under the terms of the GNU AGPLv3 license.
// See the LICENSE.md file in the project root for full license information.

//! Error types returned by the fallible parts of the library.
//!
//! Expected search outcomes (a conflicting hypothesis, an exhausted completion
//! budget, a rejected candidate) are not errors and live in their own enums.

use thiserror::Error;

/// Errors raised by the low-level byte operations and key generation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum XorError {
    /// The two XOR operands have different lengths.
    #[error("XOR operands differ in length: left is {left} bytes, right is {right} bytes")]
    LengthMismatch {
        /// Length of the left operand.
        left: usize,
        /// Length of the right operand.
        right: usize,
    },

    /// A repeating-key operation was given an empty key.
    #[error("key must not be empty")]
    EmptyKey,

    /// The operating system RNG failed to produce key material.
    #[error("random key generation failed: {0}")]
    Rng(String),
}

/// Errors raised while loading, saving or validating a search configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read or written.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file is not valid JSON for a `SearchConfig`.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// The configuration parsed but holds values the search cannot use.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}
