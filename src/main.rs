use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use phone_address_api::config::{Config, StoreBackend};
use phone_address_api::handlers::AppState;
use phone_address_api::redis_store::RedisStore;
use phone_address_api::routes;
use phone_address_api::store::{KvStore, MemoryStore};

/// Main entry point for the application.
///
/// This function initializes the application, including:
/// - Logging and tracing.
/// - Configuration loading.
/// - Store backend connection (Redis or in-memory).
/// - HTTP routes and middleware (CORS, Rate Limiting).
///
/// It then starts the Axum server.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "phone_address_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!("Configuration loaded successfully");

    let store: Arc<dyn KvStore> = match config.store_backend {
        StoreBackend::Redis => {
            let store = RedisStore::connect(
                &config.redis_url,
                config.backend_timeout,
                config.breaker_failure_threshold,
            )
            .await
            .map_err(|e| anyhow::anyhow!("Failed to connect to Redis: {}", e))?;
            tracing::info!(
                "✓ Redis store connected (timeout {:?}, breaker threshold {})",
                config.backend_timeout,
                config.breaker_failure_threshold
            );
            Arc::new(store)
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; records are lost on restart");
            Arc::new(MemoryStore::new())
        }
    };

    let port = config.port;
    let app_state = Arc::new(AppState::new(store, config.clone()));

    // Configure rate limiter per IP
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_millisecond((1000 / config.rate_limit_per_second).max(1))
            .burst_size(config.rate_limit_burst)
            .key_extractor(SmartIpKeyExtractor)
            .finish()
            .ok_or_else(|| anyhow::anyhow!("Invalid rate limiter configuration"))?,
    );

    // Health checks bypass rate limiting
    let phone_routes = routes::phone_routes().layer(ServiceBuilder::new().layer(GovernorLayer {
        config: governor_conf,
    }));
    let app = routes::app(app_state, phone_routes);

    // Start server
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
