use axum::{
    extract::{Extension, Json, Path, State, rejection::JsonRejection},
    response::IntoResponse,
};

use super::model::ItemRequest;
use crate::{AppState, error::AppError, middleware::AuthenticatedContext, result::ApiMessage};

#[axum::debug_handler]
pub async fn list_items(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.items.list().await?))
}

#[axum::debug_handler]
pub async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.items.get(&id).await?))
}

#[axum::debug_handler]
pub async fn create_item(
    State(state): State<AppState>,
    Extension(context): Extension<AuthenticatedContext>,
    body: Result<Json<ItemRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(req) = body?;
    let item = state.items.create(req.into(), Some(context.user_id)).await?;
    Ok(Json(ApiMessage::with_item("Item created", item)))
}

#[axum::debug_handler]
pub async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<ItemRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(req) = body?;
    let item = state.items.update(&id, req.into()).await?;
    Ok(Json(ApiMessage::with_item("Item updated", item)))
}

#[axum::debug_handler]
pub async fn delete_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.items.delete(&id).await?;
    Ok(Json(ApiMessage::<()>::message("Item deleted")))
}
