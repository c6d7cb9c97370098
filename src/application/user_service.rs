use crate::domain::error::DomainError;
use crate::domain::repository::UserRepository;
use crate::domain::user::User;
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info, instrument, trace, warn};
use uuid::Uuid;

pub const USER_NOT_FOUND: &str = "user not found";
pub const INVALID_PASSWORD: &str = "invalid password";
pub const EMAIL_ALREADY_REGISTERED: &str = "a user with this email is already registered";

pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
}

fn ensure_available(exists: bool, email: &str) -> Result<()> {
    if exists {
        warn!(email = email, "Email already registered");
        return Err(DomainError::business_rule(EMAIL_ALREADY_REGISTERED).into());
    }
    Ok(())
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        self.repository.find_by_email(email).await
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        self.repository.find_by_id(id).await
    }

    /// Looks the user up by email and compares the password verbatim.
    ///
    /// The two failure causes carry distinct messages.
    #[instrument(skip(self, password))]
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User> {
        trace!("Starting authentication");

        let user = self.repository.find_by_email(email).await?.ok_or_else(|| {
            warn!(email = email, "User not found during authentication");
            DomainError::authentication(USER_NOT_FOUND)
        })?;

        // FIXME: plaintext comparison; stored passwords should be hashed.
        if user.password != password {
            warn!(user_id = ?user.id, "Invalid password during authentication");
            return Err(DomainError::authentication(INVALID_PASSWORD).into());
        }

        info!(user_id = ?user.id, "Authentication successful");
        Ok(user)
    }

    #[instrument(skip(self))]
    pub async fn validate_email_available(&self, email: &str) -> Result<()> {
        let exists = self.repository.exists_by_email(email).await?;
        ensure_available(exists, email)
    }

    /// Validates the email and saves the user inside one transaction.
    /// Nothing is written when validation fails.
    #[instrument(skip(self, user), fields(email = %user.email))]
    pub async fn register(&self, user: User) -> Result<User> {
        trace!("Starting user registration");
        let mut tx = self.repository.begin().await?;

        let exists = tx.exists_by_email(&user.email).await?;
        ensure_available(exists, &user.email)?;

        debug!("Saving user to repository");
        let saved = tx.save(user).await?;
        tx.commit().await?;

        info!(user_id = ?saved.id, email = %saved.email, "User registered successfully");
        Ok(saved)
    }
}
