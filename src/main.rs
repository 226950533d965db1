use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use moviemate_api::{
    config::Config,
    db::{create_pool, Cache, MovieRepo, PartyRepo},
    routes::{create_router, AppState},
    services::{ReviewGenerator, TmdbProvider},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "moviemate_api=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    let cache = Cache::new(Duration::from_secs(config.cache_ttl_secs));

    let provider = Arc::new(TmdbProvider::new(&config, cache.clone())?);
    let reviews = Arc::new(ReviewGenerator::new(&config)?);

    let state = AppState {
        movies: MovieRepo::new(pool.clone()),
        party: PartyRepo::new(pool),
        provider,
        reviews,
        cache,
    };

    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "MovieMate API listening");
    axum::serve(listener, app).await?;

    Ok(())
}
