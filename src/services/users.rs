//! Account operations: registration, login and self-service profile changes.

use std::sync::Arc;

use crate::auth::{AuthError, PasswordHasher, RegisterRequest, TokenService};
use crate::error::AppError;
use crate::models::{normalize_email, NewUser, User, UserUpdate};
use crate::store::{TaskStore, UserStore, EMAIL_IN_USE};

pub struct UserService {
    users: Arc<dyn UserStore>,
    tasks: Arc<dyn TaskStore>,
    hasher: PasswordHasher,
    tokens: Arc<TokenService>,
    /// Verified against when the email is unknown, so both login failures cost one bcrypt run.
    dummy_hash: String,
}

impl UserService {
    pub fn new(
        users: Arc<dyn UserStore>,
        tasks: Arc<dyn TaskStore>,
        hasher: PasswordHasher,
        tokens: Arc<TokenService>,
    ) -> Result<Self, AppError> {
        let dummy_hash = hasher.hash("not-a-real-password")?;
        Ok(Self {
            users,
            tasks,
            hasher,
            tokens,
            dummy_hash,
        })
    }

    /// Creates an account. The request must already be validated.
    pub async fn register(&self, request: RegisterRequest) -> Result<User, AppError> {
        let email = normalize_email(&request.email);
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AppError::BadRequest(EMAIL_IN_USE.into()));
        }

        let password_hash = self.hasher.hash(&request.password)?;
        let user = self
            .users
            .create(NewUser {
                email,
                password_hash,
                name: request.name,
                last_name: request.last_name,
                avatar: request.avatar,
            })
            .await?;

        log::info!("registered user {}", user.id);
        Ok(user)
    }

    /// Checks credentials and mints a token.
    ///
    /// Unknown email and wrong password both yield `AuthError::InvalidCredentials`.
    pub async fn login(&self, email: &str, password: &str) -> Result<(User, String), AppError> {
        let email = normalize_email(email);
        let user = match self.users.find_by_email(&email).await? {
            Some(user) => user,
            None => {
                self.hasher.verify(password, &self.dummy_hash);
                log::debug!("login rejected: unknown account");
                return Err(AuthError::InvalidCredentials.into());
            }
        };

        if !self.hasher.verify(password, &user.password_hash) {
            log::debug!("login rejected for user {}", user.id);
            return Err(AuthError::InvalidCredentials.into());
        }

        let token = self.tokens.issue(user.id)?;
        log::info!("user {} logged in", user.id);
        Ok((user, token))
    }

    pub async fn list(&self) -> Result<Vec<User>, AppError> {
        self.users.find_all().await
    }

    pub async fn get(&self, id: i32) -> Result<User, AppError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".into()))
    }

    /// Applies `update` to the caller's own account.
    pub async fn update(&self, actor: i32, id: i32, update: UserUpdate) -> Result<User, AppError> {
        ensure_self(actor, id)?;
        let mut user = self.get(id).await?;

        if let Some(email) = update.email {
            user.email = normalize_email(&email);
        }
        if let Some(name) = update.name {
            user.name = Some(name);
        }
        if let Some(last_name) = update.last_name {
            user.last_name = Some(last_name);
        }
        if let Some(avatar) = update.avatar {
            user.avatar = Some(avatar);
        }
        if let Some(password) = update.password {
            user.password_hash = self.hasher.hash(&password)?;
        }

        self.users.update(&user).await
    }

    /// Deletes the caller's own account together with its tasks.
    ///
    /// Tokens already issued for the account stay valid until they expire.
    pub async fn delete(&self, actor: i32, id: i32) -> Result<(), AppError> {
        ensure_self(actor, id)?;
        let removed_tasks = self.tasks.delete_for_user(id).await?;
        if !self.users.delete(id).await? {
            return Err(AppError::NotFound("User not found".into()));
        }
        log::info!("deleted user {} and {} task(s)", id, removed_tasks);
        Ok(())
    }
}

fn ensure_self(actor: i32, id: i32) -> Result<(), AppError> {
    if actor != id {
        return Err(AppError::Forbidden(
            "You can only modify your own account".into(),
        ));
    }
    Ok(())
}
