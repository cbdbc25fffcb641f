//! Federated login: account linking by email with auto-provisioning
//!
//! A verified external assertion (email + display name) resolves to an
//! existing local user by email, or provisions one on first login. The two
//! paths converge on the same unified principal the credential flow produces.

use log::info;
use std::sync::Arc;

use crate::auth::password::{random_password_seed, PasswordEncoder};
use crate::auth::user::{Principal, Profile, User, UserStatus};
use crate::constants::DEFAULT_FEDERATED_ROLE;
use crate::error::{AllServeError, Result};
use crate::storage::{NewUser, UserDirectory};

pub struct FederatedLoginHandler {
    directory: Arc<dyn UserDirectory>,
    encoder: Arc<dyn PasswordEncoder>,
}

impl FederatedLoginHandler {
    pub fn new(directory: Arc<dyn UserDirectory>, encoder: Arc<dyn PasswordEncoder>) -> Self {
        Self { directory, encoder }
    }

    /// Resolve a verified external identity to a local principal.
    ///
    /// An existing user with the asserted email is linked as-is, with no
    /// mutation. Otherwise a new account is provisioned; if a concurrent
    /// first-login wins the insert race, the conflict is retried exactly once
    /// by re-reading the directory, then surfaced as transient.
    pub async fn handle(&self, email: &str, display_name: &str) -> Result<Principal> {
        if let Some(user) = self.directory.find_by_email(email).await? {
            return Ok(Principal::new(user));
        }

        match self.provision(email, display_name).await {
            Ok(user) => {
                info!("Auto-provisioned federated account for login '{}'", user.login);
                Ok(Principal::new(user))
            }
            Err(AllServeError::ProvisioningConflict(msg)) => {
                // The racing login already created the row; link to it.
                match self.directory.find_by_email(email).await? {
                    Some(user) => Ok(Principal::new(user)),
                    None => Err(AllServeError::ProvisioningConflict(msg)),
                }
            }
            Err(e) => Err(e),
        }
    }

    async fn provision(&self, email: &str, display_name: &str) -> Result<User> {
        let login = login_from_email(email);

        // The stored credential is a digest of a random seed, never of the
        // email local part: auto-provisioned accounts sign in federated-only
        // until an administrator sets a real password.
        let password_hash = self.encoder.hash(&random_password_seed())?;

        self.directory
            .create_user(NewUser {
                name: display_name.to_string(),
                role: DEFAULT_FEDERATED_ROLE.to_string(),
                status: UserStatus::Active,
                profile: Profile::lowest_privilege(),
                login,
                password_hash,
                email: email.to_string(),
            })
            .await
    }
}

/// Login candidate for an auto-provisioned account: the email's local part.
fn login_from_email(email: &str) -> String {
    match email.find('@') {
        Some(at) => email[..at].to_string(),
        None => email.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_is_local_part() {
        assert_eq!(login_from_email("ana@example.com"), "ana");
        assert_eq!(login_from_email("a.b+c@example.com"), "a.b+c");
        assert_eq!(login_from_email("no-at-sign"), "no-at-sign");
    }
}
