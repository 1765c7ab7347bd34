use std::sync::Arc;

use axum::Router;
use tower::ServiceBuilder;
use tower_http::{services::ServeDir, trace::TraceLayer};

use config::Config;
use database::{ItemStore, UserStore};
use services::{AuthService, ItemService};
use session::{SessionManager, SessionStore};

pub mod cache;
pub mod config;
pub mod database;
pub mod error;
pub mod middleware;
pub mod result;
pub mod routes;
pub mod services;
pub mod session;
pub mod utils;
pub mod views;

/// 应用上下文，启动时构建一次，由每个 handler 共享
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub auth: AuthService,
    pub items: ItemService,
    pub sessions: SessionManager,
}

impl AppState {
    pub fn new(
        config: Config,
        users: Arc<dyn UserStore>,
        items: Arc<dyn ItemStore>,
        sessions: Arc<dyn SessionStore>,
    ) -> Self {
        let sessions = SessionManager::new(sessions, &config);
        Self {
            auth: AuthService::new(users, sessions.clone(), config.bcrypt_cost),
            items: ItemService::new(items),
            sessions,
            config: Arc::new(config),
        }
    }
}

/// Builds the full router: pages, JSON API, static files and logging layers.
pub fn app(state: AppState) -> Router {
    let router = Router::new()
        .merge(routes::public_routes())
        .merge(routes::page_routes(state.clone()))
        .merge(routes::api_routes(state.clone()))
        .fallback_service(ServeDir::new(&state.config.static_dir));

    let router = router.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(axum::middleware::from_fn(middleware::log_errors)),
    );

    // 开发模式下允许跨域
    #[cfg(debug_assertions)]
    let router = router.layer(tower_http::cors::CorsLayer::permissive());

    router.with_state(state)
}
