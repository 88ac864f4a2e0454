// File:    report.rs
// Author:  apezoo
// Date:    2026-10-19
//
// Description: Human-readable and JSON rendering of search results for the CLI.
//
// License:
// This project is licensed under the terms of the GNU AGPLv3 license.
// See the LICENSE.md file in the project root for full license information.

use serde::Serialize;
use sha2::{Digest, Sha256};
use xorcrack_core::search::{Diagnostic, SearchOutcome};
use xorcrack_core::single_byte::SingleByteOutcome;

/// Result of the `crack` command, tagged with a fingerprint of its input.
#[derive(Serialize)]
pub(crate) struct CrackReport {
    ciphertext_sha256: String,
    #[serde(flatten)]
    result: CrackResult,
}

#[derive(Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
enum CrackResult {
    Recovered {
        key_length: usize,
        offset: usize,
        key_hex: String,
        key_text: Option<String>,
        flag: String,
        plaintext: String,
    },
    NoMatch {
        diagnostics: Vec<DiagnosticReport>,
    },
    Cancelled,
}

#[derive(Serialize)]
struct DiagnosticReport {
    key_length: usize,
    offset: usize,
    key_hex: String,
    preview: String,
    score: usize,
}

impl From<&Diagnostic> for DiagnosticReport {
    fn from(d: &Diagnostic) -> Self {
        Self {
            key_length: d.key_len,
            offset: d.offset,
            key_hex: hex::encode(&d.key),
            preview: d.preview.clone(),
            score: d.score,
        }
    }
}

impl CrackReport {
    pub(crate) fn new(cipher: &[u8], outcome: &SearchOutcome) -> Self {
        let result = match outcome {
            SearchOutcome::Recovered(found) => CrackResult::Recovered {
                key_length: found.key_len,
                offset: found.offset,
                key_hex: hex::encode(&found.key),
                key_text: found.key_text(),
                flag: found.flag.clone(),
                plaintext: found.plaintext_text(),
            },
            SearchOutcome::NoMatch(diagnostics) => CrackResult::NoMatch {
                diagnostics: diagnostics.iter().map(DiagnosticReport::from).collect(),
            },
            SearchOutcome::Cancelled => CrackResult::Cancelled,
        };
        Self {
            ciphertext_sha256: fingerprint(cipher),
            result,
        }
    }

    pub(crate) fn print(&self) {
        match &self.result {
            CrackResult::Recovered {
                key_length,
                offset,
                key_hex,
                key_text,
                flag,
                plaintext,
            } => {
                println!("Key length: {key_length}");
                println!("Crib offset: {offset}");
                match key_text {
                    Some(text) => println!("Key: {key_hex} ({text:?})"),
                    None => println!("Key: {key_hex}"),
                }
                println!("Flag: {flag}");
                println!("Plaintext: {plaintext}");
            }
            CrackResult::NoMatch { diagnostics } => {
                println!("No key produced a matching flag.");
                if diagnostics.is_empty() {
                    println!("No diagnostic candidates could be derived.");
                    return;
                }
                println!("Best zero-filled candidates:");
                println!(
                    "{:<6} {:<8} {:<8} {:<20} {}",
                    "Len", "Offset", "Score", "Key (hex)", "Preview"
                );
                println!("{:-<80}", "");
                for d in diagnostics {
                    println!(
                        "{:<6} {:<8} {:<8} {:<20} {}",
                        d.key_length, d.offset, d.score, d.key_hex, d.preview
                    );
                }
            }
            CrackResult::Cancelled => println!("Search cancelled."),
        }
    }

    pub(crate) const fn recovered(&self) -> bool {
        matches!(self.result, CrackResult::Recovered { .. })
    }
}

/// Result of the `single-byte` command.
#[derive(Serialize)]
pub(crate) struct SingleByteReport {
    ciphertext_sha256: String,
    #[serde(flatten)]
    result: SingleByteResult,
}

#[derive(Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
enum SingleByteResult {
    Unique {
        key: u8,
        flag: String,
        plaintext: String,
    },
    Ambiguous {
        candidates: Vec<SingleByteCandidate>,
    },
    BestEffort {
        key: u8,
        plaintext: String,
        printable_ratio: f64,
    },
}

#[derive(Serialize)]
struct SingleByteCandidate {
    key: u8,
    flag: String,
}

impl SingleByteReport {
    pub(crate) fn new(cipher: &[u8], outcome: &SingleByteOutcome) -> Self {
        let result = match outcome {
            SingleByteOutcome::Unique(hit) => SingleByteResult::Unique {
                key: hit.key,
                flag: hit.flag.clone(),
                plaintext: String::from_utf8_lossy(&hit.plaintext).into_owned(),
            },
            SingleByteOutcome::Ambiguous(hits) => SingleByteResult::Ambiguous {
                candidates: hits
                    .iter()
                    .map(|hit| SingleByteCandidate {
                        key: hit.key,
                        flag: hit.flag.clone(),
                    })
                    .collect(),
            },
            SingleByteOutcome::BestEffort {
                key,
                plaintext,
                printable_ratio,
            } => SingleByteResult::BestEffort {
                key: *key,
                plaintext: String::from_utf8_lossy(plaintext).into_owned(),
                printable_ratio: *printable_ratio,
            },
        };
        Self {
            ciphertext_sha256: fingerprint(cipher),
            result,
        }
    }

    pub(crate) fn print(&self) {
        match &self.result {
            SingleByteResult::Unique {
                key,
                flag,
                plaintext,
            } => {
                println!("Key: {key:#04x}");
                println!("Flag: {flag}");
                println!("Plaintext: {plaintext}");
            }
            SingleByteResult::Ambiguous { candidates } => {
                println!("{} keys produced a flag:", candidates.len());
                for c in candidates {
                    println!("  {:#04x}  {}", c.key, c.flag);
                }
            }
            SingleByteResult::BestEffort {
                key,
                plaintext,
                printable_ratio,
            } => {
                println!("No key produced a flag; most printable decoding shown.");
                println!("Key: {key:#04x} ({:.1}% printable)", printable_ratio * 100.0);
                println!("Plaintext: {plaintext}");
            }
        }
    }
}

/// Hex-encoded SHA-256 of the ciphertext, used to tie a report to its input.
pub(crate) fn fingerprint(cipher: &[u8]) -> String {
    hex::encode(Sha256::digest(cipher))
}
