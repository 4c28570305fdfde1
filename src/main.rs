use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cricscore::broadcast::{start_sweep_task, BroadcastHub, SweepConfig};
use cricscore::directory::InMemoryTeamDirectory;
use cricscore::scoring::{handlers, BasicCommentary, ScoringService};
use cricscore::session::SessionRegistry;
use cricscore::shared::AppState;
use cricscore::storage::{InMemoryMatchStore, InMemoryStandingsStore, MatchStore, StandingsStore};
use cricscore::websockets::{live_socket_handler, match_socket_handler};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cricscore=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting cricket scoring server");

    // Wire dependencies behind their traits; swapping the in-memory stores
    // for a database-backed pair is a construction-site change only.
    let store: Arc<dyn MatchStore> = Arc::new(InMemoryMatchStore::new());
    let standings: Arc<dyn StandingsStore> = Arc::new(InMemoryStandingsStore::new());
    let directory = Arc::new(InMemoryTeamDirectory::new());
    let registry = Arc::new(SessionRegistry::new(store.clone()));
    let hub = BroadcastHub::new();

    let scoring = Arc::new(ScoringService::new(
        registry.clone(),
        hub.clone(),
        store,
        standings,
        directory.clone(),
        Arc::new(BasicCommentary),
    ));
    let app_state = AppState::new(scoring);

    // Periodic live-list republish for /ws/live viewers
    tokio::spawn(start_sweep_task(
        registry,
        hub,
        directory,
        SweepConfig::default(),
    ));

    let app = Router::new()
        .route("/", get(|| async { "cricscore" }))
        .route("/matches", post(handlers::create_match))
        .route("/matches/:match_id", get(handlers::get_match))
        .route("/matches/:match_id/toss", post(handlers::record_toss))
        .route("/matches/:match_id/start", post(handlers::start_scoring))
        .route("/matches/:match_id/ball", post(handlers::record_ball))
        .route(
            "/matches/:match_id/end-innings",
            post(handlers::end_innings),
        )
        .route("/matches/:match_id/abandon", post(handlers::abandon_match))
        .route("/standings", get(handlers::standings))
        .route("/ws/matches/:match_id", get(match_socket_handler))
        .route("/ws/live", get(live_socket_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
    info!("Server running on http://localhost:3000");
    axum::serve(listener, app).await.unwrap();
}
