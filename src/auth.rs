use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::UserId;

/// An authenticated user. Carries no credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub name: String,
}

pub trait Authenticator {
    /// Exact, case-sensitive match on both email and password.
    fn authenticate(&self, email: &str, password: &str) -> Option<User>;
}

struct Account {
    user: User,
    password: String,
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Fixed credential list.
#[derive(Debug, Default)]
pub struct UserDirectory {
    accounts: Vec<Account>,
}

impl UserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// The demo accounts shipped with the quote forms.
    pub fn canonical() -> Self {
        UserDirectory::new()
            .with_user(1, "usuario@ejemplo.com", "password123", "Usuario Demo")
            .with_user(2, "admin@seguros.com", "admin123", "Administrador Seguros")
            .with_user(3, "test@test.com", "test123", "Usuario Test")
            .with_user(4, "roger@telefax.com.ar", "rogerCapo", "Master User Roger Crack!")
    }

    pub fn with_user(mut self, id: u32, email: &str, password: &str, name: &str) -> Self {
        self.accounts.push(Account {
            user: User { id: UserId(id), email: email.to_string(), name: name.to_string() },
            password: password.to_string(),
        });
        self
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

impl Authenticator for UserDirectory {
    fn authenticate(&self, email: &str, password: &str) -> Option<User> {
        let found = self
            .accounts
            .iter()
            .find(|a| a.user.email == email && a.password == password)
            .map(|a| a.user.clone());
        match &found {
            Some(user) => tracing::debug!(user = %user.email, "authenticated"),
            None => tracing::debug!(email, "authentication failed"),
        }
        found
    }
}
