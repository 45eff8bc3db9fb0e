use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::{Router, middleware as axum_middleware};
use catalog::{GenreLookup, HttpCatalog, NoCatalog};
use chrono::Utc;
use storage::Database;
use storage::services::hooks::{LogOnlyHooks, RevealHooks};
use storage::services::round_lifecycle;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod config;
mod error;
mod features;
mod middleware;
mod state;

use config::Config;
use middleware::auth::{ApiKeys, require_api_key};
use state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(
        features::leagues::handlers::list_leagues,
        features::leagues::handlers::get_league,
        features::leagues::handlers::create_league,
        features::leagues::handlers::add_member,
        features::leagues::handlers::create_season,
        features::rounds::handlers::create_round,
        features::rounds::handlers::list_rounds,
        features::rounds::handlers::get_round,
        features::rounds::handlers::create_submission,
        features::rounds::handlers::transition_round,
        features::rounds::handlers::cancel_round,
        features::rounds::handlers::round_results,
        features::rounds::handlers::submit_votes,
        features::leaderboards::handlers::get_leaderboard,
        features::leaderboards::handlers::rebuild_leaderboard,
        features::statistics::handlers::get_user_statistics,
    ),
    components(
        schemas(
            storage::dto::common::PaginationMeta,
            storage::dto::league::CreateLeagueRequest,
            storage::dto::league::AddMemberRequest,
            storage::dto::league::CreateSeasonRequest,
            storage::dto::league::LeagueResponse,
            storage::dto::league::MemberResponse,
            storage::dto::league::SeasonResponse,
            storage::dto::round::CreateRoundRequest,
            storage::dto::round::TransitionRequest,
            storage::dto::round::CancelRequest,
            storage::dto::round::CreateSubmissionRequest,
            storage::dto::round::RoundResponse,
            storage::dto::round::SubmissionResponse,
            storage::dto::round::TransitionResponse,
            storage::dto::round::RankedSubmissionResponse,
            storage::dto::round::RoundResultsResponse,
            storage::dto::vote::VoteEntryRequest,
            storage::dto::vote::VoteBatchRequest,
            storage::dto::leaderboard::LeaderboardEntryResponse,
            storage::dto::leaderboard::RebuildRequest,
            storage::dto::stats::UserStatisticsResponse,
            storage::models::RoundStatus,
            storage::models::VoteKind,
            storage::models::MemberRole,
            storage::models::VotingConfig,
            storage::models::VotingRules,
            storage::services::RevealWarning,
            storage::services::leaderboard::RebuildSummary,
        )
    ),
    tags(
        (name = "leagues", description = "League, membership and season endpoints"),
        (name = "rounds", description = "Round lifecycle, submission and voting endpoints"),
        (name = "leaderboards", description = "Season and all-time leaderboard endpoints"),
        (name = "statistics", description = "Per-user statistics endpoints"),
    ),
    modifiers(&SecurityAddon)
)]
struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("API Key")
                        .build(),
                ),
            )
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("Starting TrackLeague API");

    let config = Config::from_env().context("Failed to load API configuration")?;
    tracing::info!("Configuration loaded successfully");

    tracing::info!(
        "Connecting to database at: {}",
        config
            .database_url
            .split('@')
            .next_back()
            .unwrap_or("unknown")
    );
    let db = Database::new(&config.database_url)
        .await
        .context("Failed to initialize database")?;
    tracing::info!("Database connection established");

    tracing::info!("Running database migrations");
    db.run_migrations()
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Database migrations completed successfully");

    let catalog: Arc<dyn GenreLookup> = match &config.catalog_url {
        Some(url) => {
            tracing::info!("Using music catalog at {}", url);
            Arc::new(
                HttpCatalog::new(url.clone(), Duration::from_secs(5))
                    .context("Failed to build catalog client")?,
            )
        }
        None => {
            tracing::info!("No CATALOG_URL set, genre affinity lookups disabled");
            Arc::new(NoCatalog)
        }
    };

    let hooks: Arc<dyn RevealHooks> = Arc::new(LogOnlyHooks);

    let state = AppState {
        db: db.clone(),
        catalog: catalog.clone(),
        hooks: hooks.clone(),
    };

    let api_keys = ApiKeys::from_comma_separated(&config.api_keys);

    tokio::spawn(run_sweeper(
        db,
        hooks,
        catalog,
        config.sweep_interval_secs,
    ));

    let app = build_router(state, api_keys);

    let bind_address = format!("{}:{}", config.host, config.port);
    tracing::info!("Starting server at http://{}", bind_address);
    tracing::info!(
        "Swagger UI available at http://{}/swagger-ui/",
        bind_address
    );

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .context("Failed to bind listener")?;
    axum::serve(listener, app)
        .await
        .context("Server error")?;

    Ok(())
}

fn build_router(state: AppState, api_keys: ApiKeys) -> Router {
    let auth = axum_middleware::from_fn_with_state(api_keys, require_api_key);

    let leagues = features::leagues::routes::public_routes().merge(
        features::leagues::routes::protected_routes().route_layer(auth.clone()),
    );

    let league_rounds = features::rounds::routes::league_public_routes().merge(
        features::rounds::routes::league_protected_routes().route_layer(auth.clone()),
    );

    let rounds = features::rounds::routes::public_routes().merge(
        features::rounds::routes::protected_routes().route_layer(auth.clone()),
    );

    let leaderboards = features::leaderboards::routes::public_routes().merge(
        features::leaderboards::routes::protected_routes().route_layer(auth),
    );

    let statistics = features::statistics::routes::public_routes();

    Router::new()
        .nest("/api/leagues", leagues)
        .nest("/api/leagues/:league_id/rounds", league_rounds)
        .nest("/api/leagues/:league_id/leaderboard", leaderboards)
        .nest("/api/leagues/:league_id/users", statistics)
        .nest("/api/rounds", rounds)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Background loop that forces overdue rounds through their deadline
/// transitions. Each pass is idempotent, a crashed pass is retried on the
/// next tick.
async fn run_sweeper(
    db: Database,
    hooks: Arc<dyn RevealHooks>,
    catalog: Arc<dyn GenreLookup>,
    interval_secs: u64,
) {
    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));

    loop {
        interval.tick().await;

        match round_lifecycle::sweep(db.pool(), hooks.as_ref(), catalog.as_ref(), Utc::now()).await
        {
            Ok(summary) => {
                if summary.voting_opened > 0 || summary.revealed > 0 {
                    tracing::info!(
                        voting_opened = summary.voting_opened,
                        revealed = summary.revealed,
                        warnings = summary.warnings.len(),
                        "Deadline sweep applied transitions"
                    );
                }
            }
            Err(e) => {
                tracing::error!("Deadline sweep failed: {}", e);
            }
        }
    }
}
