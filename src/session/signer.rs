//! Session cookie signing.
//!
//! Cookie values take the form `<id>.<hex sha256("<secret>:<id>")>`.

use sha2::{Digest, Sha256};

#[derive(Debug, Clone)]
pub struct CookieSigner {
    secret: String,
}

impl CookieSigner {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    pub fn sign(&self, id: &str) -> String {
        format!("{}.{}", id, self.digest(id))
    }

    /// Returns the session id if the signature matches.
    pub fn verify(&self, value: &str) -> Option<String> {
        let (id, signature) = value.rsplit_once('.')?;
        if id.is_empty() {
            return None;
        }
        constant_time_eq(signature.as_bytes(), self.digest(id).as_bytes()).then(|| id.to_string())
    }

    fn digest(&self, id: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.secret.as_bytes());
        hasher.update(b":");
        hasher.update(id.as_bytes());
        hex::encode(hasher.finalize())
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
