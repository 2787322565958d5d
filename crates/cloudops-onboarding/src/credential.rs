//! Temporary credential generation.

use rand::rngs::OsRng;
use rand::Rng;
use secrecy::SecretString;

/// Symbols a generated credential may contain.
pub const SYMBOLS: &[u8] = b"!@#$%^&*";

/// Length of generated credentials.
pub const CREDENTIAL_LENGTH: usize = 16;

const LETTERS_AND_DIGITS: &[u8] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Generates a temporary credential.
///
/// Characters are drawn uniformly from letters, digits and [`SYMBOLS`];
/// candidates missing a character class are discarded and redrawn.
#[must_use]
pub fn generate_credential() -> SecretString {
    let alphabet: Vec<u8> = LETTERS_AND_DIGITS
        .iter()
        .chain(SYMBOLS.iter())
        .copied()
        .collect();

    loop {
        let candidate: String = (0..CREDENTIAL_LENGTH)
            .map(|_| char::from(alphabet[OsRng.gen_range(0..alphabet.len())]))
            .collect();
        if meets_complexity(&candidate) {
            return SecretString::new(candidate);
        }
    }
}

/// Returns true if `candidate` is long enough and has every character class.
#[must_use]
pub fn meets_complexity(candidate: &str) -> bool {
    candidate.chars().count() >= CREDENTIAL_LENGTH
        && candidate.chars().any(|c| c.is_ascii_lowercase())
        && candidate.chars().any(|c| c.is_ascii_uppercase())
        && candidate.chars().any(|c| c.is_ascii_digit())
        && candidate.bytes().any(|b| SYMBOLS.contains(&b))
}
