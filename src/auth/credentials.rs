//! Allowed username/password pairs.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One allowed username/password pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Credential {
    pub username: String,
    pub password: String,
}

impl Credential {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// The `user:pass` form carried inside a basic-auth header.
    pub fn auth(&self) -> String {
        format!("{}:{}", self.username, self.password)
    }
}

/// Immutable set of credentials checked by the auth gate.
#[derive(Debug, Clone, Default)]
pub struct CredentialSet {
    allowed: HashSet<Credential>,
}

impl CredentialSet {
    pub fn new(credentials: impl IntoIterator<Item = Credential>) -> Self {
        Self {
            allowed: credentials.into_iter().collect(),
        }
    }

    pub fn contains(&self, username: &str, password: &str) -> bool {
        self.allowed.contains(&Credential::new(username, password))
    }

    pub fn len(&self) -> usize {
        self.allowed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.allowed.is_empty()
    }
}

impl FromIterator<Credential> for CredentialSet {
    fn from_iter<I: IntoIterator<Item = Credential>>(iter: I) -> Self {
        Self::new(iter)
    }
}
