use sha2::{Digest, Sha256};

use crate::domain::UserId;

/// A registered user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub(crate) id: UserId,
    pub(crate) username: String,
    pub(crate) password_digest: String,
    pub(crate) name: String,
    pub(crate) email: String,
    pub(crate) allows_anonymous: bool,
}

impl User {
    /// The user's identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// The unique login name.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// The display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The contact email.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Whether others may ask this user questions anonymously.
    #[must_use]
    pub const fn allows_anonymous(&self) -> bool {
        self.allows_anonymous
    }

    /// The part of the user the question store needs.
    #[must_use]
    pub const fn identity(&self) -> UserIdentity {
        UserIdentity {
            id: self.id,
            allows_anonymous: self.allows_anonymous,
        }
    }

    /// Checks a plaintext password against the stored digest.
    #[must_use]
    pub fn verify_password(&self, password: &str) -> bool {
        password_digest(&self.username, password) == self.password_digest
    }
}

/// The details supplied when signing up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    /// Unique login name.
    pub username: String,
    /// Plaintext password. Only its digest is stored.
    pub password: String,
    /// Display name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Whether others may ask this user questions anonymously.
    pub allows_anonymous: bool,
}

/// The minimal view of a user that questions are addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserIdentity {
    /// The user's identifier.
    pub id: UserId,
    /// Whether anonymous questions may be addressed to this user.
    pub allows_anonymous: bool,
}

/// Resolves user identifiers.
///
/// The question store uses this to validate recipients without owning any
/// user data.
pub trait UserLookup {
    /// Returns the identity of the user with the given id, if there is one.
    fn lookup_user(&self, id: UserId) -> Option<UserIdentity>;
}

/// SHA256 of the username and password, as a hex string.
pub(crate) fn password_digest(username: &str, password: &str) -> String {
    let hash = Sha256::new()
        .chain_update(username.as_bytes())
        .chain_update([0u8])
        .chain_update(password.as_bytes())
        .finalize();
    format!("{hash:x}")
}
