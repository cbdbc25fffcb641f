//! Local credential authentication

use std::sync::Arc;

use crate::auth::password::PasswordEncoder;
use crate::auth::user::Principal;
use crate::error::{AllServeError, Result};
use crate::storage::UserDirectory;

/// Verifies a login/password pair against the user directory and produces a
/// unified principal. Pure with respect to shared state: the only storage
/// access is the read-only lookup.
pub struct CredentialAuthenticator {
    directory: Arc<dyn UserDirectory>,
    encoder: Arc<dyn PasswordEncoder>,
}

impl CredentialAuthenticator {
    pub fn new(directory: Arc<dyn UserDirectory>, encoder: Arc<dyn PasswordEncoder>) -> Self {
        Self { directory, encoder }
    }

    /// Authenticate a login/password pair.
    ///
    /// Unknown login and wrong password fail with the identical error value,
    /// so responses carry no user-enumeration signal.
    pub async fn authenticate(&self, login: &str, plain_password: &str) -> Result<Principal> {
        let user = match self.directory.find_by_login(login).await? {
            Some(user) => user,
            None => return Err(AllServeError::InvalidCredentials),
        };

        if !self.encoder.verify(plain_password, &user.password_hash)? {
            return Err(AllServeError::InvalidCredentials);
        }

        Ok(Principal::new(user))
    }
}
