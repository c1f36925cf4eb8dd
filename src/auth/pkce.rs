//! PKCE (RFC 7636) verifier and S256 challenge.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use sha2::{Digest, Sha256};

use crate::host::RandomSource;

/// Number of random 32-bit words drawn per generated string.
pub const RANDOM_WORDS: usize = 28;

pub const CHALLENGE_METHOD: &str = "S256";

/// Verifier kept locally and the challenge sent with the authorize redirect.
#[derive(Clone, PartialEq, Eq)]
pub struct Pkce {
    pub verifier: String,
    pub challenge: String,
}

impl Pkce {
    pub fn generate<R: RandomSource + ?Sized>(rng: &mut R) -> Self {
        let verifier = random_string(rng);
        let challenge = challenge_from_verifier(&verifier);
        Pkce { verifier, challenge }
    }
}

impl std::fmt::Debug for Pkce {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pkce")
            .field("verifier", &"***")
            .field("challenge", &self.challenge)
            .finish()
    }
}

/// Lowercase hex string with two digits (the low byte) per random word,
/// so 56 characters long. Used for both the verifier and the `state`.
pub fn random_string<R: RandomSource + ?Sized>(rng: &mut R) -> String {
    let mut words = [0u32; RANDOM_WORDS];
    rng.fill_u32(&mut words);
    words.iter().map(|word| format!("{:02x}", word & 0xff)).collect()
}

/// base64url(SHA-256(verifier)) without padding.
pub fn challenge_from_verifier(verifier: &str) -> String {
    let digest = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(digest)
}
