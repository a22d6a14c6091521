use pagecraft_core::AdminVerifier;

/// Verifier with a fixed answer, or a fixed accepted credential.
#[derive(Debug, Clone)]
pub enum FixedVerifier {
    AllowAll,
    DenyAll,
    Token(String),
}

impl FixedVerifier {
    pub fn token(token: impl Into<String>) -> Self {
        Self::Token(token.into())
    }
}

impl AdminVerifier for FixedVerifier {
    fn verify(&self, credential: Option<&str>) -> bool {
        match self {
            Self::AllowAll => true,
            Self::DenyAll => false,
            Self::Token(token) => credential == Some(token.as_str()),
        }
    }
}
