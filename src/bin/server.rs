//! `eion-server`: boots the HTTP surface against real `PostgreSQL`, Neo4j,
//! embedding, and extraction backends (`spec.md` §6).

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::PgConnection;
use mockable::DefaultClock;

use eion::audit::adapters::PostgresInteractionLogRepository;
use eion::config::{AppConfig, EmbeddingProvider};
use eion::directory::adapters::PostgresDirectory;
use eion::embedding::adapters::{HttpEmbedder, MockEmbedder};
use eion::embedding::ports::Embedder;
use eion::extraction::adapters::SubprocessExtractor;
use eion::graph::adapters::{Neo4jConfig, Neo4jGraphStore};
use eion::graph::ports::GraphStore;
use eion::history::adapters::PostgresHistoryRepository;
use eion::http::state::AppState;
use eion::ingest::services::IngestPipelineService;
use eion::search::SearchService;
use eion::session::adapters::PostgresSessionRepository;
use eion::session::services::SessionLifecycleService;

/// Command-line arguments for the `eion-server` binary.
#[derive(Debug, Parser)]
#[command(name = "eion-server", about = "Shared-memory and knowledge-graph service for multi-agent AI systems")]
struct Args {
    /// Path to a TOML configuration file. Missing sections fall back to
    /// `EION_`-prefixed environment variables.
    #[arg(long, default_value = "eion.toml")]
    config: PathBuf,
}

/// Grace period for in-flight requests to finish once shutdown starts
/// (`spec.md` §5).
const SHUTDOWN_GRACE: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = AppConfig::load(&args.config)?;
    eion::logging::init(&config.logger)?;

    let pg_manager = ConnectionManager::<PgConnection>::new(config.postgres.connection_url());
    let pg_pool = Pool::builder().max_size(config.postgres.max_open_connections).build(pg_manager)?;

    let directory = Arc::new(PostgresDirectory::new(pg_pool.clone()));
    let sessions = Arc::new(PostgresSessionRepository::new(pg_pool.clone()));
    let history = Arc::new(PostgresHistoryRepository::new(pg_pool.clone()));
    let audit = Arc::new(PostgresInteractionLogRepository::new(pg_pool));

    let neo4j_config = Neo4jConfig {
        uri: config.graph.uri.clone(),
        username: config.graph.username.clone(),
        password: config.graph.password.clone(),
        database: config.graph.database.clone(),
    };
    let graph = Arc::new(Neo4jGraphStore::connect(&neo4j_config).await?);
    graph.ensure_schema().await?;

    let embedder: Arc<dyn Embedder> = match config.embedding.provider {
        EmbeddingProvider::Local | EmbeddingProvider::Openai => {
            let endpoint = config
                .embedding
                .endpoint
                .clone()
                .ok_or("embedding.endpoint is required for the local and openai providers")?;
            Arc::new(HttpEmbedder::new(endpoint, config.embedding.model.clone(), config.embedding.dimension))
        }
        EmbeddingProvider::Mock => Arc::new(MockEmbedder::new(config.embedding.dimension)),
    };

    let extractor = Arc::new(SubprocessExtractor::new(
        config.extractor.program.clone(),
        config.extractor.args.clone(),
        Duration::from_secs(config.extractor.timeout_secs),
    ));

    let clock = Arc::new(DefaultClock);

    let directory_dyn: Arc<dyn eion::directory::ports::UserRepository> = directory.clone();
    let sessions_dyn: Arc<dyn eion::session::ports::SessionRepository> = sessions.clone();
    let history_dyn: Arc<dyn eion::history::ports::HistoryRepository> = history.clone();
    let graph_dyn: Arc<dyn GraphStore> = graph.clone();
    let embedder_dyn: Arc<dyn Embedder> = embedder.clone();
    let extractor_dyn: Arc<dyn eion::extraction::ports::Extractor> = extractor.clone();
    let agents_dyn: Arc<dyn eion::directory::ports::AgentRepository> = directory.clone();
    let audit_dyn: Arc<dyn eion::audit::ports::InteractionLogRepository> = audit.clone();

    let ingest = Arc::new(IngestPipelineService::new(
        sessions_dyn.clone(),
        history_dyn.clone(),
        graph_dyn.clone(),
        embedder_dyn.clone(),
        extractor_dyn,
        agents_dyn.clone(),
        audit_dyn.clone(),
        clock.clone(),
    ));
    let search = Arc::new(SearchService::new(graph_dyn.clone(), embedder_dyn));
    let session_lifecycle = Arc::new(SessionLifecycleService::new(sessions_dyn.clone(), clock));

    let state = AppState {
        ingest,
        search,
        session_lifecycle,
        sessions: sessions_dyn,
        history: history_dyn,
        graph: graph_dyn,
        users: directory_dyn,
        agents: agents_dyn,
        agent_groups: directory.clone(),
        session_types: directory,
        audit: audit_dyn,
        auth: config.auth,
    };

    let router = eion::http::build_router(state);
    let addr = format!("{}:{}", config.http.host, config.http.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "eion-server listening");

    let serving = axum::serve(listener, router).with_graceful_shutdown(wait_for_signal());
    tokio::select! {
        result = serving => result?,
        () = force_exit_after_signal() => {
            tracing::warn!(grace_period_secs = SHUTDOWN_GRACE.as_secs(), "grace period elapsed with requests still in flight, forcing exit");
        }
    }
    Ok(())
}

/// Fires [`SHUTDOWN_GRACE`] after the next shutdown signal, bounding how
/// long `with_graceful_shutdown`'s drain is allowed to run (`spec.md` §5).
async fn force_exit_after_signal() {
    wait_for_signal().await;
    tokio::time::sleep(SHUTDOWN_GRACE).await;
}

/// Resolves on `SIGINT`/`SIGTERM`, logging the start of the drain window
/// `with_graceful_shutdown` then waits out (`spec.md` §5).
async fn wait_for_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        let mut signal = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler");
        signal.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }

    tracing::info!(grace_period_secs = SHUTDOWN_GRACE.as_secs(), "shutdown signal received, draining in-flight requests");
}
