use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use uuid::Uuid;

use crate::{
    AppState,
    error::AppError,
    session::{SESSION_COOKIE, SessionManager},
    views,
};

/// 通过会话校验后注入到请求扩展中的用户信息
#[derive(Debug, Clone)]
pub struct AuthenticatedContext {
    pub session_id: String,
    pub user_id: Uuid,
    pub username: String,
}

/// Resolves the session cookie. Reads the session and nothing else.
pub async fn require_session(
    sessions: &SessionManager,
    jar: &CookieJar,
) -> Result<AuthenticatedContext, AppError> {
    let Some(cookie) = jar.get(SESSION_COOKIE) else {
        return Err(AppError::Auth("Login required".into()));
    };

    match sessions.resolve(cookie.value()).await? {
        Some(session) => Ok(AuthenticatedContext {
            session_id: session.session_id,
            user_id: session.user_id,
            username: session.username,
        }),
        None => Err(AppError::Auth("Session expired or invalid".into())),
    }
}

/// 页面路由：未登录时重定向到登录页
pub async fn page_auth_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    match require_session(&state.sessions, &jar).await {
        Ok(context) => {
            request.extensions_mut().insert(context);
            next.run(request).await
        }
        Err(AppError::Dependency(message)) => {
            views::error_page(StatusCode::SERVICE_UNAVAILABLE, &message)
        }
        Err(_) => Redirect::to("/login").into_response(),
    }
}

/// 接口路由：未登录时返回 401 JSON
pub async fn api_auth_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let context = require_session(&state.sessions, &jar).await?;
    request.extensions_mut().insert(context);
    Ok(next.run(request).await)
}
