use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use route_server::cache::{CacheConfig, CachedRoadProvider};
use route_server::config::ServerConfig;
use route_server::hubs::{india_air_hubs, india_rail_hubs};
use route_server::kpi::ModeModels;
use route_server::places::Places;
use route_server::planner::{Planner, QueryDefaults};
use route_server::providers::{
    FixtureRoadProvider, OrsClient, OrsConfig, OsrmClient, OsrmConfig, ProviderChain,
    RoadProvider,
};
use route_server::web::{AppState, create_router};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("route_server=info,tower_http=info")),
        )
        .init();

    let config = ServerConfig::from_env().expect("Invalid configuration");

    let road = build_road_provider(&config);
    info!(provider = road.name(), "road provider ready");

    let planner = Planner::new(
        road,
        Arc::new(india_rail_hubs()),
        Arc::new(india_air_hubs()),
        ModeModels::default(),
    );
    let places = Places::builtin();
    info!(places = places.len(), "loaded place catalog");

    // Build app state
    let state = AppState::new(planner, QueryDefaults::default(), places);

    // Create router
    let app = create_router(state, &config.static_dir);

    // Bind and serve
    let addr = config.listen_addr;
    info!("Route Optimizer listening on http://{addr}");
    info!("  GET  /                 - Planning form");
    info!("  GET  /plan             - Plan from form, HTML results");
    info!("  GET  /api/places       - Named place catalog");
    info!("  POST /api/routes/plan  - Plan routes (JSON)");
    info!("  GET  /api/routes/last  - Last successful result");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listen address");
    axum::serve(listener, app).await.expect("Server error");
}

/// Fixture file if configured, otherwise ORS (when keyed) falling back to OSRM.
fn build_road_provider(config: &ServerConfig) -> Arc<dyn RoadProvider> {
    let provider: Arc<dyn RoadProvider> = match &config.fixture_file {
        Some(path) => Arc::new(
            FixtureRoadProvider::from_file(path).expect("Failed to load road fixture file"),
        ),
        None => Arc::new(http_chain(config)),
    };

    match config.cache_ttl {
        Some(ttl) => {
            let cache_config = CacheConfig {
                ttl,
                ..CacheConfig::default()
            };
            Arc::new(CachedRoadProvider::new(provider, &cache_config))
        }
        None => provider,
    }
}

fn http_chain(config: &ServerConfig) -> ProviderChain {
    let timeout_secs = config.provider_timeout.as_secs();
    let mut chain = ProviderChain::default();

    match &config.ors_api_key {
        Some(key) => {
            let ors_config = OrsConfig::new(key.as_str())
                .with_base_url(&config.ors_base_url)
                .with_timeout(timeout_secs);
            chain.push(Arc::new(
                OrsClient::new(ors_config).expect("Failed to create ORS client"),
            ));
        }
        None => warn!("ORS_API_KEY not set; using OSRM only"),
    }

    let osrm_config = OsrmConfig::default()
        .with_base_url(&config.osrm_base_url)
        .with_timeout(timeout_secs);
    chain.push(Arc::new(
        OsrmClient::new(osrm_config).expect("Failed to create OSRM client"),
    ));

    chain
}
