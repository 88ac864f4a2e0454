#![deny(missing_docs)]
//! A command-line interface for recovering repeating-key XOR keys.

use clap::{Parser, Subcommand, ValueEnum};
use log::{error, info};
use std::path::PathBuf;
use xorcrack_core::bytes::{repeating_key_xor, xor_all};
use xorcrack_core::completer::CompletionPolicy;
use xorcrack_core::config::{self, SearchConfig};
use xorcrack_core::keygen::generate_key;
use xorcrack_core::pattern::{BodyClass, FlagPattern};
use xorcrack_core::search::{search, search_parallel};
use xorcrack_core::single_byte::crack_single_byte;
use xorcrack_core::validator::{DEFAULT_MIN_PRINTABLE_RATIO, Validator, is_printable};

mod report;

use report::{CrackReport, SingleByteReport};

/// Exit status when the search finished without recovering a key.
const EXIT_NO_MATCH: i32 = 2;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(
    after_help = "EXAMPLES:\n  \n# Recover a repeating key from a crib\nxorcrack crack --hex 0e0b213f... --crib 'crypto{'\n\n# Try every single-byte key\nxorcrack single-byte --hex 73626960...\n\n# Build a test ciphertext with a random 6-byte key\nxorcrack encrypt --plaintext 'crypto{test}' --random-key-len 6\n\n# XOR several equal-length hex values together\nxorcrack xor a6c8b6733c9b22de 37dcb292030faa90"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recover a repeating XOR key using a known plaintext fragment
    Crack {
        /// The ciphertext as a hex string
        #[arg(long, value_name = "HEX")]
        hex: String,

        /// Known plaintext expected somewhere in the message
        #[arg(long)]
        crib: String,

        /// Path to a JSON search configuration; flags below override it
        #[arg(long, value_name = "CONFIG_FILE")]
        config: Option<PathBuf>,

        /// Largest key length to try
        #[arg(long)]
        max_key_len: Option<usize>,

        /// Most unknown key bytes to brute-force per hypothesis
        #[arg(long)]
        max_unknown: Option<usize>,

        #[command(flatten)]
        pattern: PatternArgs,

        /// How to choose among several valid completions of one hypothesis
        #[arg(long, value_enum)]
        policy: Option<PolicyArg>,

        /// Number of diagnostic candidates to show when nothing matches
        #[arg(long)]
        diagnostics: Option<usize>,

        /// Evaluate hypotheses on all cores
        #[arg(long)]
        parallel: bool,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Try all 256 single-byte keys
    SingleByte {
        /// The ciphertext as a hex string
        #[arg(long, value_name = "HEX")]
        hex: String,

        #[command(flatten)]
        pattern: PatternArgs,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Encrypt text with a repeating XOR key and print the ciphertext as hex
    Encrypt {
        /// The plaintext to encrypt
        #[arg(long)]
        plaintext: String,

        /// The key as text
        #[arg(long, conflicts_with = "random_key_len", required_unless_present = "random_key_len")]
        key: Option<String>,

        /// Generate a random key of this many bytes instead
        #[arg(long, value_name = "BYTES")]
        random_key_len: Option<usize>,
    },
    /// XOR equal-length hex values together
    Xor {
        /// Hex operands, all of the same length
        #[arg(required = true, value_name = "HEX")]
        operands: Vec<String>,
    },
    /// Manage search configuration files
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Write the default configuration to a file
    Init {
        /// Where to write the configuration
        path: PathBuf,
    },
}

#[derive(clap::Args)]
struct PatternArgs {
    /// Flag prefix before the opening brace
    #[arg(long)]
    prefix: Option<String>,

    /// Characters allowed inside the braces
    #[arg(long, value_enum)]
    body: Option<BodyArg>,
}

#[derive(Clone, Copy, ValueEnum)]
enum BodyArg {
    /// Anything except a closing brace
    Loose,
    /// Letters, digits and underscore
    Word,
}

impl From<BodyArg> for BodyClass {
    fn from(arg: BodyArg) -> Self {
        match arg {
            BodyArg::Loose => Self::Loose,
            BodyArg::Word => Self::Word,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum PolicyArg {
    /// Stop at the first valid completion
    First,
    /// Keep the valid completion with the cleanest plaintext
    Ranked,
}

impl From<PolicyArg> for CompletionPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::First => Self::First,
            PolicyArg::Ranked => Self::Ranked,
        }
    }
}

impl PatternArgs {
    fn apply(&self, pattern: &mut FlagPattern) {
        if let Some(prefix) = &self.prefix {
            pattern.prefix.clone_from(prefix);
        }
        if let Some(body) = self.body {
            pattern.body = body.into();
        }
    }
}

fn decode_hex(input: &str) -> Vec<u8> {
    hex::decode(input.trim()).unwrap_or_else(|e| {
        error!("Invalid hex input '{input}': {e}");
        std::process::exit(1);
    })
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            error!("Failed to serialize result: {e}");
            std::process::exit(1);
        }
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Crack {
            hex,
            crib,
            config: config_path,
            max_key_len,
            max_unknown,
            pattern,
            policy,
            diagnostics,
            parallel,
            json,
        } => {
            let mut search_config = config_path.map_or_else(SearchConfig::default, |path| {
                config::load_config(&path).unwrap_or_else(|e| {
                    error!("Failed to load configuration '{}': {e}", path.display());
                    std::process::exit(1);
                })
            });
            if let Some(n) = max_key_len {
                search_config.max_key_len = n;
            }
            if let Some(n) = max_unknown {
                search_config.max_unknown = n;
            }
            if let Some(policy) = policy {
                search_config.policy = policy.into();
            }
            if let Some(n) = diagnostics {
                search_config.diagnostic_count = n;
            }
            pattern.apply(&mut search_config.pattern);
            if let Err(e) = search_config.validate() {
                error!("{e}");
                std::process::exit(1);
            }

            let cipher = decode_hex(&hex);
            info!(
                "Cracking {} ciphertext bytes with crib {crib:?} and pattern {}",
                cipher.len(),
                search_config.pattern
            );
            let outcome = if parallel {
                search_parallel(&cipher, crib.as_bytes(), &search_config)
            } else {
                search(&cipher, crib.as_bytes(), &search_config)
            };

            let report = CrackReport::new(&cipher, &outcome);
            if json {
                print_json(&report);
            } else {
                report.print();
            }
            if !report.recovered() {
                std::process::exit(EXIT_NO_MATCH);
            }
        }
        Commands::SingleByte { hex, pattern, json } => {
            let mut flag_pattern = FlagPattern::default();
            pattern.apply(&mut flag_pattern);
            let validator = Validator::new(flag_pattern, DEFAULT_MIN_PRINTABLE_RATIO);

            let cipher = decode_hex(&hex);
            let outcome = crack_single_byte(&cipher, &validator);
            let report = SingleByteReport::new(&cipher, &outcome);
            if json {
                print_json(&report);
            } else {
                report.print();
            }
        }
        Commands::Encrypt {
            plaintext,
            key,
            random_key_len,
        } => {
            let key = match (key, random_key_len) {
                (Some(key), _) => key.into_bytes(),
                (None, Some(len)) => {
                    let key = generate_key(len).unwrap_or_else(|e| {
                        error!("Failed to generate key: {e}");
                        std::process::exit(1);
                    });
                    println!("Key: {}", hex::encode(&key));
                    key
                }
                (None, None) => {
                    error!("Either --key or --random-key-len is required.");
                    std::process::exit(1);
                }
            };
            match repeating_key_xor(plaintext.as_bytes(), &key) {
                Ok(cipher) => println!("{}", hex::encode(cipher)),
                Err(e) => {
                    error!("Encryption failed: {e}");
                    std::process::exit(1);
                }
            }
        }
        Commands::Xor { operands } => {
            let decoded: Vec<Vec<u8>> = operands.iter().map(|op| decode_hex(op)).collect();
            let slices: Vec<&[u8]> = decoded.iter().map(Vec::as_slice).collect();
            match xor_all(&slices) {
                Ok(result) => {
                    println!("{}", hex::encode(&result));
                    if result.iter().all(|&b| is_printable(b)) {
                        println!("{}", String::from_utf8_lossy(&result));
                    }
                }
                Err(e) => {
                    error!("{e}");
                    std::process::exit(1);
                }
            }
        }
        Commands::Config { command } => match command {
            ConfigCommands::Init { path } => {
                info!("Writing default configuration to '{}'", path.display());
                if let Err(e) = config::save_config(&path, &SearchConfig::default()) {
                    error!("Failed to write configuration: {e}");
                    std::process::exit(1);
                }
                println!("Wrote default configuration to {}", path.display());
            }
        },
    }
}
