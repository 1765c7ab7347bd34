use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use anyhow::Context;
use backend::{
    AppState,
    cache::SessionCacheOperations,
    config::Config,
    database::{PgItemRepository, PgUserRepository},
    session::RedisSessionStore,
};
use sqlx::Executor;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // 初始化日志
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 依赖不可用时拒绝启动
    if let Err(e) = run().await {
        tracing::error!("Startup failed: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    // 加载配置
    let config = Config::from_env().context("Failed to load configuration")?;
    if config.uses_default_secret() {
        tracing::warn!("SESSION_SECRET not set, using the development default");
    }

    // 设置数据库连接池
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .after_connect(|conn, _meta| {
            Box::pin(async move {
                conn.execute("SET application_name = 'item_crud_backend';")
                    .await?;
                Ok(())
            })
        })
        .connect(&config.database_url)
        .await
        .context("Failed to connect to Postgres")?;
    tracing::info!("Postgres connected");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    // 设置 Redis 客户端，会话数据存放在 Redis 中
    let redis = Arc::new(
        redis::Client::open(config.redis_url.clone()).context("Invalid Redis URL")?,
    );
    SessionCacheOperations::ping(&redis)
        .await
        .context("Failed to reach Redis")?;
    tracing::info!("Redis connected");

    let addr = SocketAddr::new(
        config.server_host.parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid server_host, falling back to dual-stack default");
            IpAddr::V6(std::net::Ipv6Addr::UNSPECIFIED)
        }),
        config.server_port,
    );

    // 设置应用状态
    let state = AppState::new(
        config,
        Arc::new(PgUserRepository::new(pool.clone())),
        Arc::new(PgItemRepository::new(pool)),
        Arc::new(RedisSessionStore::new(redis)),
    );

    #[cfg(debug_assertions)]
    tracing::info!("Running in debug mode with CORS enabled");

    let app = backend::app(state);

    // 启动服务器
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Server listening on http://{}", addr);
    axum::serve(listener, app)
        .await
        .context("Server error")?;

    Ok(())
}
