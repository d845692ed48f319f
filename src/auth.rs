// 🔐 Session Gate
//
// A plain equality check against one configured username/password pair.
// No hashing, lockout, expiry or rate limiting.

use tracing::warn;

/// Credentials submitted with an interaction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Decides whether a submitted username/password pair may proceed.
///
/// Swap the implementation to plug in a real credential store.
pub trait CredentialVerifier {
    fn verify(&self, username: &str, password: &str) -> bool;
}

/// The single fixed pair the dashboard ships with.
#[derive(Debug, Clone)]
pub struct StaticCredentials {
    username: String,
    password: String,
}

impl StaticCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl Default for StaticCredentials {
    fn default() -> Self {
        Self::new("admin", "password")
    }
}

impl CredentialVerifier for StaticCredentials {
    fn verify(&self, username: &str, password: &str) -> bool {
        username == self.username && password == self.password
    }
}

/// True iff both fields exactly match what `verifier` accepts.
pub fn authenticate<V>(verifier: &V, credentials: &Credentials) -> bool
where
    V: CredentialVerifier + ?Sized,
{
    let ok = verifier.verify(&credentials.username, &credentials.password);
    if !ok {
        warn!(username = %credentials.username, "authentication failed");
    }
    ok
}
