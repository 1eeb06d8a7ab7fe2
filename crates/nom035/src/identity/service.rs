use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use super::domain::{LoginInput, LoginResponse, NewUser, RegisterInput, User, UserId, UserView};
use super::extract::AuthenticatedUser;
use super::password::{hash_password_blocking, verify_password_blocking, PasswordError};
use super::repository::{RepositoryError, UserRepository};
use super::token::{Authenticator, TokenError};

/// Registration, credential checks and token lifecycle.
pub struct IdentityService<U> {
    users: Arc<U>,
    authenticator: Arc<Authenticator>,
}

impl<U> IdentityService<U>
where
    U: UserRepository + 'static,
{
    pub fn new(users: Arc<U>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            users,
            authenticator,
        }
    }

    pub fn authenticator(&self) -> &Arc<Authenticator> {
        &self.authenticator
    }

    pub async fn register(&self, input: RegisterInput) -> Result<User, IdentityError> {
        let email = normalize_email(&input.email);
        if self.users.find_by_email(&email)?.is_some() {
            return Err(IdentityError::EmailInUse);
        }

        let password_hash = hash_password_blocking(input.password).await?;
        let department = input
            .department
            .map(|department| department.trim().to_string())
            .filter(|department| !department.is_empty());

        let user = self
            .users
            .insert(NewUser {
                name: input.name.trim().to_string(),
                email,
                password_hash,
                role: input.role,
                department,
            })
            .map_err(|err| match err {
                RepositoryError::Conflict => IdentityError::EmailInUse,
                other => IdentityError::Repository(other),
            })?;

        info!(user_id = user.id.0, role = user.role.label(), "user registered");
        Ok(user)
    }

    pub async fn login(&self, input: LoginInput) -> Result<LoginResponse, IdentityError> {
        let email = normalize_email(&input.email);
        let user = self
            .users
            .find_by_email(&email)?
            .ok_or(IdentityError::InvalidCredentials)?;

        if !verify_password_blocking(input.password, user.password_hash.clone()).await? {
            warn!(user_id = user.id.0, "login rejected: password mismatch");
            return Err(IdentityError::InvalidCredentials);
        }

        let issued = self.authenticator.codec().issue(&user, Utc::now())?;
        info!(user_id = user.id.0, expires_at = %issued.expires_at, "login succeeded");

        Ok(LoginResponse {
            token: issued.token,
            user: user.view(),
        })
    }

    pub fn logout(&self, caller: &AuthenticatedUser) {
        self.authenticator.revoke(&caller.token, &caller.claims);
        info!(user_id = caller.id().0, "user logged out");
    }

    pub fn profile(&self, id: UserId) -> Result<UserView, IdentityError> {
        self.users
            .fetch(id)?
            .map(|user| user.view())
            .ok_or(IdentityError::UserNotFound(id))
    }
}

fn normalize_email(raw: &str) -> String {
    raw.trim().to_ascii_lowercase()
}

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("Email already in use")]
    EmailInUse,
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("user {0} not found")]
    UserNotFound(UserId),
    #[error(transparent)]
    Password(#[from] PasswordError),
    #[error(transparent)]
    Token(#[from] TokenError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
