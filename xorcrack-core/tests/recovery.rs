#![allow(missing_docs)]
use xorcrack_core::bytes::repeating_key_xor;
use xorcrack_core::config::SearchConfig;
use xorcrack_core::crib::{Derivation, derive_key};
use xorcrack_core::pattern::{BodyClass, FlagPattern};
use xorcrack_core::search::{SearchOutcome, search, search_parallel};
use xorcrack_core::single_byte::{SingleByteOutcome, crack_single_byte};
use xorcrack_core::validator::Validator;

const SINGLE_BYTE_HEX: &str = "73626960647f6b206821204f21254f7d694f7624662065622127234f726927756d";
const REPEATING_KEY_HEX: &str =
    "0e0b213f26041e480b26217f27342e175d0e070a3c5b103e2526217f27342e175d0e077e263451150104";

fn cipher(hex_str: &str) -> Vec<u8> {
    hex::decode(hex_str).expect("valid test vector")
}

#[test]
fn test_single_byte_key_is_unique() {
    for body in [BodyClass::Loose, BodyClass::Word] {
        let validator = Validator::new(FlagPattern::new("crypto", body), 0.95);
        let SingleByteOutcome::Unique(hit) = crack_single_byte(&cipher(SINGLE_BYTE_HEX), &validator)
        else {
            panic!("expected exactly one key for {body:?}");
        };
        assert_eq!(hit.key, 0x10);
        assert_eq!(hit.flag, "crypto{0x10_15_my_f4v0ur173_by7e}");
    }
}

#[test]
fn test_end_to_end_recovery_with_short_crib() {
    let cipher = cipher(REPEATING_KEY_HEX);
    let config = SearchConfig::default();
    let SearchOutcome::Recovered(found) = search(&cipher, b"crypto{", &config) else {
        panic!("expected a recovered key");
    };

    assert_eq!(found.key_len, 8);
    assert_eq!(found.offset, 0);
    assert!(std::str::from_utf8(&found.plaintext).is_ok());
    assert_eq!(config.pattern.find(&found.flag), Some(found.flag.as_str()));
    assert_eq!(repeating_key_xor(&cipher, &found.key).unwrap(), found.plaintext);

    // Every key byte the crib covers must be what the crib alignment derives.
    let Derivation::Partial(partial) = derive_key(&cipher, b"crypto{", found.offset, found.key_len)
    else {
        panic!("recovered hypothesis must not conflict");
    };
    for (slot, derived) in partial.slots().iter().enumerate() {
        if let Some(byte) = derived {
            assert_eq!(found.key[slot], *byte);
        }
    }
    assert_eq!(&found.key[..7], b"myXORke");
}

#[test]
fn test_longer_crib_pins_the_whole_key() {
    let SearchOutcome::Recovered(found) =
        search(&cipher(REPEATING_KEY_HEX), b"crypto{1", &SearchConfig::default())
    else {
        panic!("expected a recovered key");
    };
    assert_eq!(found.key, b"myXORkey");
    assert_eq!(found.key_text().as_deref(), Some("myXORkey"));
    assert_eq!(found.flag, "crypto{1f_y0u_Kn0w_En0uGH_y0u_Kn0w_1t_4ll}");
}

#[test]
fn test_parallel_search_matches_sequential() {
    let config = SearchConfig::default();
    let vectors = [
        (cipher(REPEATING_KEY_HEX), b"crypto{".to_vec()),
        (
            repeating_key_xor(b"header bytes, then crypto{p4r4ll3l_4gr33s}.", b"r4y0n").unwrap(),
            b"crypto{".to_vec(),
        ),
    ];
    for (cipher, crib) in vectors {
        assert_eq!(
            search_parallel(&cipher, &crib, &config),
            search(&cipher, &crib, &config)
        );
    }
}

#[test]
fn test_unmatchable_pattern_yields_sorted_diagnostics() {
    let config = SearchConfig {
        max_key_len: 9,
        max_unknown: 1,
        pattern: FlagPattern::new("never_present", BodyClass::Word),
        ..SearchConfig::default()
    };
    let cipher = cipher(REPEATING_KEY_HEX);
    let SearchOutcome::NoMatch(diagnostics) = search(&cipher, b"crypto{", &config) else {
        panic!("pattern cannot match");
    };

    assert!(!diagnostics.is_empty());
    assert!(diagnostics.len() <= config.diagnostic_count);
    assert!(diagnostics.windows(2).all(|w| w[0].score >= w[1].score));

    assert!(diagnostics.iter().all(|d| d.key_len == 8));
    let true_offset = diagnostics
        .iter()
        .find(|d| d.offset == 0)
        .expect("the true crib position ranks near the top");
    assert_eq!(true_offset.key, b"myXORke\x00");
    assert!(true_offset.preview.starts_with("crypto{"));
}
