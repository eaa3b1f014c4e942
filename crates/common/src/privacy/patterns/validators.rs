//! Checksum and structure validators
//!
//! A validator receives the matched text and returns a
//! [`ValidationOutcome`]: `Valid` lifts the score to 1.0, `Invalid` drops
//! the candidate, `Unknown` keeps the pattern score.

use std::net::IpAddr;

use sha2::{Digest, Sha256};

use super::types::ValidationOutcome;

/// Signature of a pattern-recognizer validator.
pub type Validator = fn(&str) -> ValidationOutcome;

fn outcome(valid: bool) -> ValidationOutcome {
    if valid {
        ValidationOutcome::Valid
    } else {
        ValidationOutcome::Invalid
    }
}

/// Luhn checksum over the digits of a card number (13 to 19 digits).
pub fn luhn(candidate: &str) -> ValidationOutcome {
    let digits: Vec<u32> = candidate.chars().filter_map(|c| c.to_digit(10)).collect();

    if digits.len() < 13 || digits.len() > 19 {
        return ValidationOutcome::Invalid;
    }

    let sum: u32 = digits
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &digit)| {
            if i % 2 == 1 {
                let doubled = digit * 2;
                if doubled > 9 {
                    doubled - 9
                } else {
                    doubled
                }
            } else {
                digit
            }
        })
        .sum();

    outcome(sum % 10 == 0)
}

/// IPv4 or IPv6 literal as accepted by the standard library.
pub fn ip_address(candidate: &str) -> ValidationOutcome {
    outcome(candidate.trim().parse::<IpAddr>().is_ok())
}

/// ISO 13616 mod-97 check.
pub fn iban(candidate: &str) -> ValidationOutcome {
    let compact: Vec<char> = candidate
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .map(|c| c.to_ascii_uppercase())
        .collect();

    if compact.len() < 15 || compact.len() > 34 {
        return ValidationOutcome::Invalid;
    }
    if !compact[..2].iter().all(char::is_ascii_uppercase)
        || !compact[2..4].iter().all(char::is_ascii_digit)
    {
        return ValidationOutcome::Invalid;
    }

    let mut remainder: u32 = 0;
    for c in compact[4..].iter().chain(&compact[..4]) {
        let value = match c.to_digit(36) {
            Some(v) => v,
            None => return ValidationOutcome::Invalid,
        };
        remainder = if value < 10 {
            (remainder * 10 + value) % 97
        } else {
            (remainder * 100 + value) % 97
        };
    }

    outcome(remainder == 1)
}

/// Local part, single `@`, dotted domain with an alphabetic TLD of at
/// least two characters.
pub fn email(candidate: &str) -> ValidationOutcome {
    let Some((local, domain)) = candidate.split_once('@') else {
        return ValidationOutcome::Invalid;
    };

    if local.is_empty() || domain.contains('@') || local.starts_with('.') || local.ends_with('.') {
        return ValidationOutcome::Invalid;
    }
    if domain.contains("..") || candidate.contains("..") {
        return ValidationOutcome::Invalid;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 || labels.iter().any(|label| label.is_empty()) {
        return ValidationOutcome::Invalid;
    }

    let tld = labels[labels.len() - 1];
    outcome(tld.chars().count() >= 2 && tld.chars().all(char::is_alphabetic))
}

/// Phone numbers carry 10 to 15 digits (E.164 upper bound); anything else
/// is not a phone number. Within that range there is no checksum.
pub fn phone_digits(candidate: &str) -> ValidationOutcome {
    let digits = candidate.chars().filter(char::is_ascii_digit).count();
    if (10..=15).contains(&digits) {
        ValidationOutcome::Unknown
    } else {
        ValidationOutcome::Invalid
    }
}

/// Bitcoin address: base58check for legacy/P2SH forms, bech32/bech32m for
/// segwit forms.
pub fn bitcoin_address(candidate: &str) -> ValidationOutcome {
    let lowered = candidate.to_ascii_lowercase();
    if lowered.starts_with("bc1") {
        return outcome(bech32_checksum_ok(candidate));
    }
    outcome(base58check_ok(candidate))
}

const BASE58_ALPHABET: &[u8] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

fn base58_decode(input: &str) -> Option<Vec<u8>> {
    // Little-endian base-256 accumulator.
    let mut bytes: Vec<u8> = Vec::new();
    for c in input.bytes() {
        let mut carry = BASE58_ALPHABET.iter().position(|&a| a == c)? as u32;
        for byte in &mut bytes {
            carry += u32::from(*byte) * 58;
            *byte = (carry & 0xff) as u8;
            carry >>= 8;
        }
        while carry > 0 {
            bytes.push((carry & 0xff) as u8);
            carry >>= 8;
        }
    }

    let leading_zeros = input.bytes().take_while(|&c| c == b'1').count();
    let mut decoded = vec![0u8; leading_zeros];
    decoded.extend(bytes.iter().rev());
    Some(decoded)
}

fn base58check_ok(candidate: &str) -> bool {
    let Some(decoded) = base58_decode(candidate) else {
        return false;
    };
    if decoded.len() != 25 {
        return false;
    }

    let (payload, checksum) = decoded.split_at(21);
    let digest = Sha256::digest(Sha256::digest(payload));
    digest[..4] == *checksum
}

const BECH32_CHARSET: &[u8] = b"qpzry9x8gf2tvdw0s3jn54khce6mua7l";
const BECH32_CONST: u32 = 1;
const BECH32M_CONST: u32 = 0x2bc8_30a3;

fn bech32_polymod(values: &[u8]) -> u32 {
    const GENERATORS: [u32; 5] = [0x3b6a_57b2, 0x2650_8e6d, 0x1ea1_19fa, 0x3d42_33dd, 0x2a14_62b3];
    let mut chk: u32 = 1;
    for &value in values {
        let top = chk >> 25;
        chk = ((chk & 0x01ff_ffff) << 5) ^ u32::from(value);
        for (i, generator) in GENERATORS.iter().enumerate() {
            if (top >> i) & 1 == 1 {
                chk ^= generator;
            }
        }
    }
    chk
}

fn bech32_checksum_ok(candidate: &str) -> bool {
    // Mixed case is invalid.
    if candidate.chars().any(|c| c.is_ascii_lowercase())
        && candidate.chars().any(|c| c.is_ascii_uppercase())
    {
        return false;
    }

    let lowered = candidate.to_ascii_lowercase();
    let Some(separator) = lowered.rfind('1') else {
        return false;
    };
    let (hrp, data) = (&lowered[..separator], &lowered[separator + 1..]);
    if hrp.is_empty() || data.len() < 6 {
        return false;
    }

    let mut values: Vec<u8> = hrp.bytes().map(|b| b >> 5).collect();
    values.push(0);
    values.extend(hrp.bytes().map(|b| b & 31));
    for c in data.bytes() {
        match BECH32_CHARSET.iter().position(|&x| x == c) {
            Some(position) => values.push(position as u8),
            None => return false,
        }
    }

    matches!(bech32_polymod(&values), BECH32_CONST | BECH32M_CONST)
}
