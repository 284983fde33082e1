//! Token generation and hashing.
//!
//! Only the SHA-256 hash of a token is stored; the plaintext is shown
//! once at issue time.

use rand::{Rng, distributions::Alphanumeric};
use sha2::{Digest, Sha256};

const TOKEN_LENGTH: usize = 48;

pub(crate) fn generate() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

pub(crate) fn hash(token: &str) -> String {
    format!("{:x}", Sha256::digest(token.as_bytes()))
}
