//! Admin credential verification for config writes.

use log::warn;

/// Verifies the admin session credential presented with a write.
pub trait AdminVerifier: Send + Sync {
    /// Return true when the credential grants admin access.
    fn verify(&self, credential: Option<&str>) -> bool;
}

/// Verifier comparing the credential against a shared session token.
///
/// Without a configured token every credential is rejected.
#[derive(Debug, Clone, Default)]
pub struct SharedTokenVerifier {
    token: Option<String>,
}

impl SharedTokenVerifier {
    pub fn new(token: Option<String>) -> Self {
        if token.is_none() {
            warn!("no admin token configured; config writes will be rejected");
        }
        Self { token }
    }
}

impl AdminVerifier for SharedTokenVerifier {
    fn verify(&self, credential: Option<&str>) -> bool {
        match (self.token.as_deref(), credential) {
            (Some(expected), Some(provided)) => constant_time_eq(expected, provided),
            _ => false,
        }
    }
}

fn constant_time_eq(expected: &str, provided: &str) -> bool {
    let (expected, provided) = (expected.as_bytes(), provided.as_bytes());
    if expected.len() != provided.len() {
        return false;
    }
    expected
        .iter()
        .zip(provided)
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}
