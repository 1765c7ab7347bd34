//! Server-side sessions.
//!
//! A session record lives in a [`SessionStore`] keyed by an opaque id. The
//! browser only ever sees that id wrapped in a signed token inside the
//! `sid` cookie, so a forged or tampered cookie never reaches the store.

mod store;

use std::sync::Arc;
use std::time::Duration;

use axum_extra::extract::cookie::{Cookie, SameSite};
use chrono::Utc;
use uuid::Uuid;

use crate::cache::CachedSession;
use crate::config::Config;
use crate::error::StoreError;
use crate::utils::{generate_session_token, verify_session_token};

pub use store::{MemorySessionStore, RedisSessionStore, SessionStore};

pub const SESSION_COOKIE: &str = "sid";

/// 已认证会话的数据
#[derive(Debug, Clone, PartialEq)]
pub struct SessionData {
    pub session_id: String,
    pub user_id: Uuid,
    pub username: String,
    pub expires_at: i64,
}

/// 登录成功后签发的会话凭据
#[derive(Debug, Clone)]
pub struct SessionTicket {
    pub session_id: String,
    pub cookie_token: String,
    pub expires_at: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("failed to sign session token: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
}

#[derive(Clone)]
pub struct SessionManager {
    store: Arc<dyn SessionStore>,
    secret: Arc<str>,
    ttl: Duration,
}

impl SessionManager {
    pub fn new(store: Arc<dyn SessionStore>, config: &Config) -> Self {
        Self {
            store,
            secret: Arc::from(config.session_secret.as_str()),
            ttl: config.session_ttl(),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub async fn create(&self, user_id: Uuid, username: &str) -> Result<SessionTicket, SessionError> {
        let now = Utc::now().timestamp();
        let expires_at = now.saturating_add(self.ttl_secs());
        let session = CachedSession {
            session_id: Uuid::new_v4().to_string(),
            user_id,
            username: username.to_string(),
            created_at: now,
            expires_at,
        };

        let cookie_token = generate_session_token(&session.session_id, expires_at, &self.secret)?;
        self.store.save(&session, self.ttl.as_secs()).await?;
        tracing::debug!(user_id = %user_id, "Session created");

        Ok(SessionTicket {
            session_id: session.session_id,
            cookie_token,
            expires_at,
        })
    }

    /// Looks up a live session. Unknown or expired ids yield `None`.
    pub async fn get(&self, session_id: &str) -> Result<Option<SessionData>, StoreError> {
        let Some(session) = self.store.load(session_id).await? else {
            return Ok(None);
        };

        if session.is_expired_at(Utc::now().timestamp()) {
            if let Err(e) = self.store.remove(session_id).await {
                tracing::warn!("Failed to drop expired session: {}", e);
            }
            return Ok(None);
        }

        Ok(Some(SessionData {
            session_id: session.session_id,
            user_id: session.user_id,
            username: session.username,
            expires_at: session.expires_at,
        }))
    }

    /// Verifies a cookie token and loads the session it names.
    pub async fn resolve(&self, cookie_token: &str) -> Result<Option<SessionData>, StoreError> {
        match verify_session_token(cookie_token, &self.secret) {
            Ok(claims) => self.get(&claims.sid).await,
            Err(e) => {
                tracing::debug!("Rejected session cookie: {}", e);
                Ok(None)
            }
        }
    }

    pub async fn destroy(&self, session_id: &str) -> Result<(), StoreError> {
        self.store.remove(session_id).await
    }

    /// The `sid` cookie carrying the signed session token.
    pub fn session_cookie(&self, ticket: &SessionTicket) -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE, ticket.cookie_token.clone()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .max_age(time::Duration::seconds(self.ttl_secs()))
            .build()
    }

    /// Cookie to hand to `CookieJar::remove`; path must match the issued one.
    pub fn removal_cookie(&self) -> Cookie<'static> {
        Cookie::build(SESSION_COOKIE).path("/").build()
    }

    fn ttl_secs(&self) -> i64 {
        i64::try_from(self.ttl.as_secs()).unwrap_or(i64::MAX)
    }
}
