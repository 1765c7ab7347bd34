use axum::{
    Router,
    routing::{get, post},
};

use crate::{
    AppState,
    middleware::{api_auth_middleware, page_auth_middleware},
};

pub mod api;
pub mod auth;
pub mod item;

/// 无需登录的页面
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/register", get(auth::register_form).post(auth::register))
        .route("/login", get(auth::login_form).post(auth::login))
}

/// 需要登录的页面，未登录重定向到 /login
pub fn page_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(item::index))
        .route("/logout", get(auth::logout))
        .route("/crud", get(item::list))
        .route("/create", get(item::create_form).post(item::create))
        .route("/update/{id}", get(item::update_form).post(item::update))
        .route("/delete/{id}", post(item::delete))
        .layer(axum::middleware::from_fn_with_state(
            state,
            page_auth_middleware,
        ))
}

/// JSON 接口，全部需要登录
pub fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/api/items", get(api::list_items).post(api::create_item))
        .route(
            "/api/items/{id}",
            get(api::get_item)
                .put(api::update_item)
                .delete(api::delete_item),
        )
        .layer(axum::middleware::from_fn_with_state(
            state,
            api_auth_middleware,
        ))
}
