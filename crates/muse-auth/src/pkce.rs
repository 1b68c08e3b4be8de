//! PKCE verifier and challenge generation.

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Alphabet for verifier and state strings.
const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Length of the PKCE code verifier.
const VERIFIER_LEN: usize = 64;

/// Length of the anti-CSRF state parameter.
const STATE_LEN: usize = 16;

/// PKCE verifier plus the anti-CSRF state for one login attempt.
///
/// Persisted when the attempt starts and deleted once its callback has
/// been processed, whatever the outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PkceContext {
    pub code_verifier: String,
    pub state: String,
}

impl PkceContext {
    /// Generate a fresh context for a new login attempt.
    pub fn generate() -> Self {
        Self {
            code_verifier: random_string(VERIFIER_LEN),
            state: random_string(STATE_LEN),
        }
    }

    /// The S256 challenge derived from this context's verifier.
    pub fn challenge(&self) -> String {
        code_challenge(&self.code_verifier)
    }
}

/// Draw `length` characters uniformly from the 62-symbol alphanumeric
/// alphabet.
pub fn random_string(length: usize) -> String {
    let mut rng = rand::rng();
    (0..length)
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
        .collect()
}

/// SHA-256 the verifier's UTF-8 bytes and encode the digest as base64url
/// with padding stripped.
pub fn code_challenge(verifier: &str) -> String {
    let digest = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(digest)
}
