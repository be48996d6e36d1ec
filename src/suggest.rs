//! Password suggestion
//!
//! Generates random passwords for the add-record flow.

use rand::rngs::OsRng;
use rand::Rng;

/// Characters a suggested password draws on. Ambiguous glyphs
/// (0/O, 1/l/I) are excluded.
const SUGGEST_ALPHABET: &[u8] = b"abcdefghijkmnopqrstuvwxyzABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Default suggested-password length.
pub const DEFAULT_SUGGESTED_LENGTH: usize = 12;

/// Generate a random password of `length` characters from the OS CSPRNG.
pub fn suggest_password(length: usize) -> String {
    let mut rng = OsRng;
    (0..length)
        .map(|_| {
            let idx = rng.gen_range(0..SUGGEST_ALPHABET.len());
            SUGGEST_ALPHABET[idx] as char
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suggested_length() {
        assert_eq!(suggest_password(DEFAULT_SUGGESTED_LENGTH).len(), 12);
        assert_eq!(suggest_password(20).len(), 20);
        assert_eq!(suggest_password(0).len(), 0);
    }

    #[test]
    fn test_suggested_alphabet() {
        let pass = suggest_password(200);
        assert!(pass.bytes().all(|b| SUGGEST_ALPHABET.contains(&b)));
    }

    #[test]
    fn test_suggestions_differ() {
        let a = suggest_password(DEFAULT_SUGGESTED_LENGTH);
        let b = suggest_password(DEFAULT_SUGGESTED_LENGTH);
        assert_ne!(a, b);
    }
}
