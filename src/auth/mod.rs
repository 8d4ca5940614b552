//! # Credentials
//!
//! Generates the username and password for a fresh Book Store account.
//! Every random draw comes from the operating system's CSPRNG.

use rand::Rng;
use rand::rngs::OsRng;
use rand::seq::SliceRandom;

use crate::error::FlowError;

pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const DEFAULT_PASSWORD_LENGTH: usize = 12;
pub const DEFAULT_USERNAME_BASE: &str = "testuser";
pub const DEFAULT_SUFFIX_LENGTH: u32 = 5;

const UPPERCASE: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const LOWERCASE: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const DIGITS: &[u8] = b"0123456789";
/// Subset the remote API accepts consistently.
pub const SPECIAL_CHARACTERS: &[u8] = b"!@#$%&*";

/// Username/password pair for one account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn generate() -> Result<Self, FlowError> {
        Ok(Self {
            username: generate_username(DEFAULT_USERNAME_BASE, DEFAULT_SUFFIX_LENGTH),
            password: generate_password(DEFAULT_PASSWORD_LENGTH)?,
        })
    }
}

/// Build a password with at least one uppercase letter, lowercase letter,
/// digit and special character, shuffled so none of them sits at a fixed
/// position.
pub fn generate_password(length: usize) -> Result<String, FlowError> {
    if length < MIN_PASSWORD_LENGTH {
        return Err(FlowError::InvalidLength {
            length,
            min: MIN_PASSWORD_LENGTH,
        });
    }

    let alphabet: Vec<u8> = [UPPERCASE, LOWERCASE, DIGITS, SPECIAL_CHARACTERS].concat();
    let mut rng = OsRng;

    let mut chars = vec![
        pick(&mut rng, UPPERCASE),
        pick(&mut rng, LOWERCASE),
        pick(&mut rng, DIGITS),
        pick(&mut rng, SPECIAL_CHARACTERS),
    ];
    while chars.len() < length {
        chars.push(pick(&mut rng, &alphabet));
    }
    chars.shuffle(&mut rng);

    Ok(chars.into_iter().collect())
}

/// `base` followed by a random number in `[0, 10^suffix_length)`, zero-padded
/// to `suffix_length` digits. Uniqueness is only probabilistic.
pub fn generate_username(base: &str, suffix_length: u32) -> String {
    let upper = 10u64.saturating_pow(suffix_length);
    let suffix = OsRng.gen_range(0..upper);
    format!("{base}{suffix:0width$}", width = suffix_length as usize)
}

fn pick<R: Rng>(rng: &mut R, set: &[u8]) -> char {
    set[rng.gen_range(0..set.len())] as char
}

#[cfg(test)]
mod tests {
    use super::*;

    fn has_each_class(password: &str) -> bool {
        let bytes = password.as_bytes();
        bytes.iter().any(|b| UPPERCASE.contains(b))
            && bytes.iter().any(|b| LOWERCASE.contains(b))
            && bytes.iter().any(|b| DIGITS.contains(b))
            && bytes.iter().any(|b| SPECIAL_CHARACTERS.contains(b))
    }

    #[test]
    fn rejects_short_length() {
        let err = generate_password(7).unwrap_err();
        assert!(matches!(err, FlowError::InvalidLength { length: 7, min: 8 }));
    }

    #[test]
    fn passwords_have_requested_length_and_every_class() {
        for length in [8, 12, 32] {
            for _ in 0..50 {
                let password = generate_password(length).unwrap();
                assert_eq!(password.len(), length);
                assert!(has_each_class(&password), "missing class in {password}");
            }
        }
    }

    #[test]
    fn passwords_only_use_the_alphabet() {
        let alphabet: Vec<u8> = [UPPERCASE, LOWERCASE, DIGITS, SPECIAL_CHARACTERS].concat();
        let password = generate_password(64).unwrap();
        assert!(password.bytes().all(|b| alphabet.contains(&b)));
    }

    #[test]
    fn mandatory_classes_are_not_pinned_to_the_front() {
        // Unshuffled output would always start upper, lower, digit, special.
        let pinned = (0..200)
            .map(|_| generate_password(8).unwrap())
            .filter(|p| {
                let b = p.as_bytes();
                UPPERCASE.contains(&b[0])
                    && LOWERCASE.contains(&b[1])
                    && DIGITS.contains(&b[2])
                    && SPECIAL_CHARACTERS.contains(&b[3])
            })
            .count();
        assert!(pinned < 200);

        let first_is_upper = (0..200)
            .filter(|_| UPPERCASE.contains(&generate_password(8).unwrap().as_bytes()[0]))
            .count();
        assert!(first_is_upper < 200);
    }

    #[test]
    fn usernames_are_base_plus_fixed_width_digits() {
        for _ in 0..100 {
            let name = generate_username("testuser", 5);
            let suffix = name.strip_prefix("testuser").unwrap();
            assert_eq!(suffix.len(), 5);
            assert!(suffix.bytes().all(|b| b.is_ascii_digit()));
            assert!(suffix.parse::<u64>().unwrap() < 100_000);
        }
    }

    #[test]
    fn single_digit_suffix() {
        let name = generate_username("u", 1);
        assert_eq!(name.len(), 2);
        assert!(name.as_bytes()[1].is_ascii_digit());
    }

    #[test]
    fn generated_credentials_use_defaults() {
        let creds = Credentials::generate().unwrap();
        assert!(creds.username.starts_with(DEFAULT_USERNAME_BASE));
        assert_eq!(creds.username.len(), DEFAULT_USERNAME_BASE.len() + 5);
        assert_eq!(creds.password.len(), DEFAULT_PASSWORD_LENGTH);
    }
}
