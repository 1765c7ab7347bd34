use axum::{
    extract::{Extension, Form, State, rejection::FormRejection},
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;

use super::model::{LoginForm, RegisterForm};
use crate::{
    AppState,
    error::{AppError, PageError, rerender_or_fail},
    middleware::{AuthenticatedContext, require_session},
    views,
};

pub async fn register_form() -> Html<String> {
    views::register_page(None, "")
}

#[axum::debug_handler]
pub async fn register(
    State(state): State<AppState>,
    form: Result<Form<RegisterForm>, FormRejection>,
) -> Response {
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            return rerender_or_fail(rejection.into(), |message| {
                views::register_page(Some(message), "")
            });
        }
    };
    let username = form.username.clone();

    match state.auth.register(form.into()).await {
        Ok(_) => Redirect::to("/login").into_response(),
        Err(e) => {
            tracing::warn!("Registration rejected: {}", e);
            rerender_or_fail(AppError::from(e), |message| {
                views::register_page(Some(message), &username)
            })
        }
    }
}

pub async fn login_form() -> Html<String> {
    views::login_page(None, "")
}

#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    form: Result<Form<LoginForm>, FormRejection>,
) -> Response {
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            return rerender_or_fail(rejection.into(), |message| views::login_page(Some(message), ""));
        }
    };
    let (_, ticket) = match state.auth.login(&form.username, &form.password).await {
        Ok(result) => result,
        Err(e) => {
            return rerender_or_fail(AppError::from(e), |message| {
                views::login_page(Some(message), &form.username)
            });
        }
    };

    // 重新登录时作废旧会话
    if let Ok(previous) = require_session(&state.sessions, &jar).await {
        if let Err(e) = state.auth.logout(&previous.session_id).await {
            tracing::warn!("Failed to drop previous session: {}", e);
        }
    }

    let jar = jar.add(state.sessions.session_cookie(&ticket));
    (jar, Redirect::to("/crud")).into_response()
}

#[axum::debug_handler]
pub async fn logout(
    State(state): State<AppState>,
    Extension(context): Extension<AuthenticatedContext>,
    jar: CookieJar,
) -> Result<Response, PageError> {
    state
        .auth
        .logout(&context.session_id)
        .await
        .map_err(AppError::from)?;

    let jar = jar.remove(state.sessions.removal_cookie());
    Ok((jar, Redirect::to("/login")).into_response())
}
