use axum::Json;
use axum::{
    extract::rejection::{FormRejection, JsonRejection},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::utils::error_codes;
use crate::views;

/// 存储层错误
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("username already exists")]
    DuplicateUsername,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Auth(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Dependency(String),
}

#[derive(Serialize)]
pub(crate) struct ErrorResponse {
    pub code: i32,
    pub error_message: String,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Auth(_) => StatusCode::UNAUTHORIZED,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Dependency(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    pub fn code(&self) -> i32 {
        match self {
            AppError::Validation(_) => error_codes::VALIDATION_ERROR,
            AppError::Conflict(_) => error_codes::USER_EXISTS,
            AppError::Auth(_) => error_codes::AUTH_FAILED,
            AppError::NotFound(_) => error_codes::NOT_FOUND,
            AppError::Dependency(_) => error_codes::INTERNAL_ERROR,
        }
    }

    pub fn item_not_found() -> Self {
        AppError::NotFound("Item not found".into())
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateUsername => AppError::Conflict("Username already exists".into()),
            other => {
                tracing::error!("Store failure: {}", other);
                AppError::Dependency("Service temporarily unavailable".into())
            }
        }
    }
}

// 请求体解析失败同样按校验错误返回
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<FormRejection> for AppError {
    fn from(rejection: FormRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(ErrorResponse {
            code: self.code(),
            error_message: self.to_string(),
        });

        (status, body).into_response()
    }
}

/// Page-route wrapper that renders an [`AppError`] as an HTML failure page.
#[derive(Debug)]
pub struct PageError(pub AppError);

impl From<AppError> for PageError {
    fn from(err: AppError) -> Self {
        PageError(err)
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        views::error_page(self.0.status(), &self.0.to_string())
    }
}

/// Form errors go back to the form; everything else becomes a failure page.
pub fn rerender_or_fail<F>(err: AppError, render: F) -> Response
where
    F: FnOnce(&str) -> Html<String>,
{
    if matches!(
        err,
        AppError::Validation(_) | AppError::Auth(_) | AppError::Conflict(_)
    ) {
        (err.status(), render(&err.to_string())).into_response()
    } else {
        PageError(err).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn taxonomy_maps_to_status_codes() {
        assert_eq!(AppError::Validation("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::Auth("x".into()).status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::Conflict("x".into()).status(), StatusCode::CONFLICT);
        assert_eq!(AppError::item_not_found().status(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::Dependency("x".into()).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn duplicate_username_becomes_conflict() {
        let err: AppError = StoreError::DuplicateUsername.into();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[test]
    fn infrastructure_failures_become_dependency_errors() {
        let err: AppError = StoreError::Database(sqlx::Error::PoolTimedOut).into();
        assert!(matches!(err, AppError::Dependency(_)));
    }

    #[test]
    fn form_errors_rerender_and_others_fail() {
        let rerendered = rerender_or_fail(AppError::Validation("bad".into()), |msg| {
            Html(format!("form: {msg}"))
        });
        assert_eq!(rerendered.status(), StatusCode::BAD_REQUEST);

        let failed = rerender_or_fail(AppError::item_not_found(), |msg| Html(msg.to_string()));
        assert_eq!(failed.status(), StatusCode::NOT_FOUND);
    }
}
