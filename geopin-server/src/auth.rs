//! Password hashing and API token generation
//!
//! Passwords are stored as PHC strings produced by PBKDF2-HMAC-SHA256
//! (`$pbkdf2-sha256$i=600000,l=32$<salt>$<hash>`). Tokens are 20 random
//! bytes, hex encoded (40 chars).
//!
//! Hashing is CPU-heavy; async callers run it on the blocking pool.

use password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use pbkdf2::{Algorithm, Params, Pbkdf2};
use rand::RngCore;

/// PBKDF2 iteration count for new hashes
pub const PBKDF2_ROUNDS: u32 = 600_000;

const HASH_LEN: usize = 32;
const TOKEN_LEN: usize = 20;

/// Hash a password with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, password_hash::Error> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    let params = Params {
        rounds: PBKDF2_ROUNDS,
        output_length: HASH_LEN,
    };

    let hash = Pbkdf2.hash_password_customized(
        password.as_bytes(),
        Some(Algorithm::Pbkdf2Sha256.ident()),
        None,
        params,
        &salt,
    )?;
    Ok(hash.to_string())
}

/// Check `password` against a stored PHC string. Malformed hashes never verify.
pub fn verify_password(password: &str, stored: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored) else {
        return false;
    };
    Pbkdf2.verify_password(password.as_bytes(), &parsed).is_ok()
}

/// Generate a new random API token key.
pub fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_LEN];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_roundtrip() {
        let stored = hash_password("correct horse").unwrap();
        assert!(stored.starts_with("$pbkdf2-sha256$"));
        assert!(stored.contains(&format!("i={PBKDF2_ROUNDS}")));
        assert!(verify_password("correct horse", &stored));
        assert!(!verify_password("wrong horse", &stored));
    }

    #[test]
    fn salts_differ() {
        assert_ne!(
            hash_password("same").unwrap(),
            hash_password("same").unwrap()
        );
    }

    #[test]
    fn malformed_hash_rejected() {
        assert!(!verify_password("x", ""));
        assert!(!verify_password("x", "hash"));
        assert!(!verify_password("x", "sha256$00$00"));
        assert!(!verify_password("x", "$pbkdf2-sha256$i=1000,l=32$!!$!!"));
    }

    #[test]
    fn verifies_low_cost_hashes_too() {
        // Stored hashes carry their own parameters
        let salt = SaltString::generate(&mut rand::thread_rng());
        let cheap = Pbkdf2
            .hash_password_customized(
                b"secret",
                Some(Algorithm::Pbkdf2Sha256.ident()),
                None,
                Params {
                    rounds: 1_000,
                    output_length: HASH_LEN,
                },
                &salt,
            )
            .unwrap()
            .to_string();
        assert!(verify_password("secret", &cheap));
        assert!(!verify_password("Secret", &cheap));
    }

    #[test]
    fn token_shape() {
        let token = generate_token();
        assert_eq!(token.len(), 40);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(token, generate_token());
    }
}
