use std::ops::{Deref, DerefMut};

use serde::{Deserialize, Serialize};

use crate::model::common::AdminId;

/// Core admin user data.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminCore {
    pub username: String,
    pub password_hash: String,
}

impl AdminCore {
    /// Check whether the given password is correct.
    /// A malformed stored hash never matches.
    pub fn verify_password<T: AsRef<[u8]>>(&self, password: T) -> bool {
        argon2::verify_encoded(&self.password_hash, password.as_ref()).unwrap_or(false)
    }
}

/// An admin without an ID.
pub type NewAdmin = AdminCore;

/// An admin user from the database, with its unique ID.
#[derive(Debug, Serialize, Deserialize)]
pub struct Admin {
    #[serde(rename = "_id")]
    pub id: AdminId,
    #[serde(flatten)]
    pub admin: AdminCore,
}

impl Deref for Admin {
    type Target = AdminCore;

    fn deref(&self) -> &Self::Target {
        &self.admin
    }
}

impl DerefMut for Admin {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.admin
    }
}

#[cfg(test)]
mod tests {
    use crate::model::api::admin::AdminCredentials;

    use super::*;

    #[test]
    fn verify_hashed_password() {
        let credentials = AdminCredentials::example();
        let admin = NewAdmin::try_from(credentials.clone()).unwrap();
        assert_ne!(admin.password_hash, credentials.password);
        assert!(admin.verify_password(&credentials.password));
        assert!(!admin.verify_password("not the password"));
    }

    #[test]
    fn malformed_hash_never_verifies() {
        let admin = NewAdmin {
            username: "someone".to_string(),
            password_hash: "plaintext".to_string(),
        };
        assert!(!admin.verify_password("plaintext"));
    }
}
