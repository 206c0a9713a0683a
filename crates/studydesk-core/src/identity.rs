//! User identity and the authentication collaborator

use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use crate::error::{DataError, Result};

/// Stable identity supplied by the authentication provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserIdentity {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl UserIdentity {
    pub fn new(id: impl Into<String>, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
        }
    }
}

/// The authentication collaborator.
///
/// Identity transitions drive the data context: a new identity attaches
/// and loads every mirror cache, `None` clears them.
pub trait AuthProvider: Send + Sync {
    fn current_user(&self) -> Option<UserIdentity>;

    fn sign_out(&self) -> Result<()>;
}

/// In-process session holder.
#[derive(Debug, Default)]
pub struct SessionAuth {
    user: RwLock<Option<UserIdentity>>,
}

impl SessionAuth {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn signed_in(user: UserIdentity) -> Self {
        Self {
            user: RwLock::new(Some(user)),
        }
    }

    pub fn sign_in(&self, user: UserIdentity) -> Result<()> {
        if user.id.trim().is_empty() {
            return Err(DataError::Auth("identity without id".to_string()));
        }
        *self.user.write()? = Some(user);
        Ok(())
    }
}

impl AuthProvider for SessionAuth {
    fn current_user(&self) -> Option<UserIdentity> {
        self.user.read().ok().and_then(|u| u.clone())
    }

    fn sign_out(&self) -> Result<()> {
        *self.user.write()? = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_in_and_out() {
        let auth = SessionAuth::new();
        assert!(auth.current_user().is_none());
        auth.sign_in(UserIdentity::new("u1", "Ana", "ana@example.com"))
            .unwrap();
        assert_eq!(auth.current_user().unwrap().id, "u1");
        auth.sign_out().unwrap();
        assert!(auth.current_user().is_none());
    }

    #[test]
    fn blank_identity_rejected() {
        let auth = SessionAuth::new();
        let err = auth.sign_in(UserIdentity::new(" ", "x", "x@example.com"));
        assert!(matches!(err, Err(DataError::Auth(_))));
    }
}
