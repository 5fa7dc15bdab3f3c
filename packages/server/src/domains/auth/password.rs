use sha2::{Digest, Sha256};

/// The configured admin password, held only as its SHA-256 digest.
#[derive(Clone)]
pub struct AdminPassword {
    digest: [u8; 32],
}

impl AdminPassword {
    pub fn new(plain: &str) -> Self {
        Self {
            digest: sha256(plain),
        }
    }

    /// Build from a hex digest, e.g. one produced by `sha256sum`.
    pub fn from_hex_digest(hex_digest: &str) -> Option<Self> {
        let bytes = hex::decode(hex_digest.trim()).ok()?;
        let digest: [u8; 32] = bytes.try_into().ok()?;
        Some(Self { digest })
    }

    /// Compare digests without short-circuiting on the first mismatch.
    pub fn verify(&self, candidate: &str) -> bool {
        let candidate = sha256(candidate);
        self.digest
            .iter()
            .zip(candidate.iter())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
    }
}

impl std::fmt::Debug for AdminPassword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AdminPassword(<redacted>)")
    }
}

fn sha256(s: &str) -> [u8; 32] {
    Sha256::digest(s.as_bytes()).into()
}
