use std::sync::Arc;

use thiserror::Error;

use crate::database::UserStore;
use crate::database::models::{NewUser, User};
use crate::error::{AppError, StoreError};
use crate::session::{SessionError, SessionManager, SessionTicket};
use crate::utils::{hash_password, verify_password};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("Passwords do not match")]
    PasswordMismatch,
    #[error("Username already exists")]
    UsernameTaken,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("password hashing failed: {0}")]
    Hashing(String),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Session(#[from] SessionError),
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        let message = err.to_string();
        match err {
            AuthError::MissingField(_) | AuthError::PasswordMismatch => AppError::Validation(message),
            AuthError::UsernameTaken => AppError::Conflict(message),
            AuthError::InvalidCredentials => AppError::Auth(message),
            AuthError::Store(e) | AuthError::Session(SessionError::Store(e)) => e.into(),
            AuthError::Hashing(_) | AuthError::Session(SessionError::Token(_)) => {
                tracing::error!("Authentication failure: {}", message);
                AppError::Dependency("Service temporarily unavailable".into())
            }
        }
    }
}

/// 注册请求的字段
#[derive(Debug, Clone)]
pub struct Registration {
    pub username: String,
    pub password: String,
    pub confirm_password: String,
    pub display_name: Option<String>,
}

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    sessions: SessionManager,
    bcrypt_cost: u32,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, sessions: SessionManager, bcrypt_cost: u32) -> Self {
        Self {
            users,
            sessions,
            bcrypt_cost,
        }
    }

    pub async fn register(&self, req: Registration) -> Result<User, AuthError> {
        let username = req.username.trim().to_string();
        if username.is_empty() {
            return Err(AuthError::MissingField("Username"));
        }
        if req.password.is_empty() {
            return Err(AuthError::MissingField("Password"));
        }
        if req.password != req.confirm_password {
            return Err(AuthError::PasswordMismatch);
        }

        // 预检查只是为了尽早返回，真正的唯一性由存储层保证
        if self.users.find_by_username(&username).await?.is_some() {
            return Err(AuthError::UsernameTaken);
        }

        let password_hash = self.hash(req.password).await?;
        let display_name = req
            .display_name
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty());

        match self
            .users
            .create(NewUser {
                username,
                password_hash,
                display_name,
            })
            .await
        {
            Ok(user) => {
                tracing::info!(user_id = %user.id, "User registered: {}", user.username);
                Ok(user)
            }
            Err(StoreError::DuplicateUsername) => Err(AuthError::UsernameTaken),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<(User, SessionTicket), AuthError> {
        let Some(user) = self.users.find_by_username(username.trim()).await? else {
            tracing::warn!("Login failed for unknown user");
            return Err(AuthError::InvalidCredentials);
        };

        if !self.verify(password.to_string(), user.password_hash.clone()).await? {
            tracing::warn!(user_id = %user.id, "Login failed: wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        let ticket = self.sessions.create(user.id, &user.username).await?;
        tracing::info!(user_id = %user.id, "User logged in: {}", user.username);
        Ok((user, ticket))
    }

    pub async fn logout(&self, session_id: &str) -> Result<(), AuthError> {
        self.sessions.destroy(session_id).await?;
        tracing::info!("Session destroyed");
        Ok(())
    }

    // bcrypt 计算耗时较长，放到阻塞线程池中执行
    async fn hash(&self, password: String) -> Result<String, AuthError> {
        let cost = self.bcrypt_cost;
        tokio::task::spawn_blocking(move || hash_password(&password, cost))
            .await
            .map_err(|e| AuthError::Hashing(e.to_string()))?
            .map_err(|e| AuthError::Hashing(e.to_string()))
    }

    async fn verify(&self, password: String, hash: String) -> Result<bool, AuthError> {
        tokio::task::spawn_blocking(move || verify_password(&password, &hash))
            .await
            .map_err(|e| AuthError::Hashing(e.to_string()))?
            .map_err(|e| AuthError::Hashing(e.to_string()))
    }
}
