//! Password digests and session tokens.
//!
//! Passwords are stored as `hex(salt)$hex(sha256(salt || password))` with a
//! 16-byte random salt. Digests written before salting was introduced are a
//! bare `hex(sha256(password))` and still verify.

use sha2::{Digest, Sha256};

const SALT_LEN: usize = 16;
const TOKEN_LEN: usize = 24;

/// Produce a fresh salted digest of `password`.
pub fn hash_password(password: &str) -> String {
    let salt: [u8; SALT_LEN] = rand::random();
    format!("{}${}", hex::encode(salt), salted_digest(&salt, password))
}

/// `true` if `password` matches the stored digest.
pub fn verify_password(password: &str, stored: &str) -> bool {
    match stored.split_once('$') {
        Some((salt_hex, digest_hex)) => match hex::decode(salt_hex) {
            Ok(salt) => salted_digest(&salt, password) == digest_hex,
            Err(_) => false,
        },
        None => hex::encode(Sha256::digest(password.as_bytes())) == stored,
    }
}

/// A new bearer token: 24 random bytes, hex-encoded.
pub fn new_session_token() -> String {
    let bytes: [u8; TOKEN_LEN] = rand::random();
    hex::encode(bytes)
}

fn salted_digest(salt: &[u8], password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}
