//! Admin credential verification.

use sha2::{Digest, Sha256};

/// Seam between the admin gate and the secret check.
pub trait CredentialVerifier: Send + Sync {
    fn verify(&self, candidate: &str) -> bool;
}

/// Static shared-secret verifier.
///
/// Holds only the SHA-256 digest of the configured secret; candidates are
/// hashed and compared digest to digest.
pub struct StaticSecretVerifier {
    secret_hash: Option<String>,
}

impl StaticSecretVerifier {
    pub fn new(secret: &str) -> Self {
        Self {
            secret_hash: Some(hash_secret(secret)),
        }
    }

    /// Verifier that rejects every candidate, used when no secret is
    /// configured.
    pub fn disabled() -> Self {
        Self { secret_hash: None }
    }
}

impl CredentialVerifier for StaticSecretVerifier {
    fn verify(&self, candidate: &str) -> bool {
        match &self.secret_hash {
            Some(hash) => *hash == hash_secret(candidate),
            None => false,
        }
    }
}

fn hash_secret(value: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    let digest = hasher.finalize();
    hex::encode(digest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_configured_secret() {
        let verifier = StaticSecretVerifier::new("open-sesame");
        assert!(verifier.verify("open-sesame"));
    }

    #[test]
    fn test_rejects_wrong_secret() {
        let verifier = StaticSecretVerifier::new("open-sesame");
        assert!(!verifier.verify("open sesame"));
        assert!(!verifier.verify(""));
    }

    #[test]
    fn test_disabled_rejects_everything() {
        let verifier = StaticSecretVerifier::disabled();
        assert!(!verifier.verify("open-sesame"));
        assert!(!verifier.verify(""));
    }
}
