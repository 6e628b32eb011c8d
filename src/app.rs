//! Startup wiring: storage backends, tool registration, and the stdio loop.

use crate::config::{ConfigError, PlannerConfig, StorageConfig};
use crate::database::{PgPool, connect_pool};
use crate::planning::adapters::memory::InMemoryPlanningRepository;
use crate::planning::adapters::postgres::PostgresPlanningRepository;
use crate::planning::ports::PlanningRepository;
use crate::planning::services::planning_tools;
use crate::server::{McpServer, TransportError, serve_stdio};
use crate::sql::adapters::postgres::PostgresSqlExecutor;
use crate::sql::ports::SqlExecutor;
use crate::sql::services::sql_tools;
use crate::tool::domain::ToolRegistrationError;
use crate::tool::services::ToolRegistry;
use diesel::r2d2::PoolError;
use mockable::DefaultClock;
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinError;
use tracing::info;

/// Faults that abort startup or end the server.
#[derive(Debug, Error)]
pub enum StartupError {
    /// Configuration could not be resolved.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The database pool could not be created.
    #[error("failed to connect to the database: {0}")]
    Pool(#[from] PoolError),

    /// A tool declaration was rejected.
    #[error(transparent)]
    Registration(#[from] ToolRegistrationError),

    /// The stdio transport failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Background pool construction did not complete.
    #[error("pool construction task failed: {0}")]
    Blocking(#[from] JoinError),
}

/// Storage capabilities handed to the tools.
#[derive(Clone)]
pub struct Backends {
    /// Planning record store.
    pub planning: Arc<dyn PlanningRepository>,
    /// Statement executor; `None` hides the SQL tools.
    pub sql: Option<Arc<dyn SqlExecutor>>,
}

impl Backends {
    /// Process-local planning store without SQL tools.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            planning: Arc::new(InMemoryPlanningRepository::new()),
            sql: None,
        }
    }

    /// `PostgreSQL`-backed planning store and SQL tools sharing one pool.
    #[must_use]
    pub fn postgres(pool: &PgPool) -> Self {
        Self {
            planning: Arc::new(PostgresPlanningRepository::new(pool.clone())),
            sql: Some(Arc::new(PostgresSqlExecutor::new(pool.clone()))),
        }
    }
}

/// Registers the planning tools and, when an executor is present, the SQL
/// tools.
///
/// # Errors
///
/// Returns [`ToolRegistrationError`] if any declaration is rejected.
pub fn build_registry(backends: &Backends) -> Result<ToolRegistry, ToolRegistrationError> {
    let mut builder = ToolRegistry::builder();
    builder.register(planning_tools(&backends.planning)?)?;
    if let Some(executor) = &backends.sql {
        builder.register(sql_tools(executor)?)?;
    }
    Ok(builder.build())
}

/// Opens the configured storage.
///
/// # Errors
///
/// Returns [`StartupError`] when configuration is invalid or the database is
/// unreachable.
pub async fn connect_backends(storage: StorageConfig) -> Result<Backends, StartupError> {
    match storage {
        StorageConfig::InMemory => {
            info!("no database configured, using in-memory planning store");
            Ok(Backends::in_memory())
        }
        StorageConfig::Postgres { url, pool_size } => {
            let pool =
                tokio::task::spawn_blocking(move || connect_pool(&url, pool_size)).await??;
            info!(pool_size, "connected to PostgreSQL");
            Ok(Backends::postgres(&pool))
        }
    }
}

/// Runs the server over stdio until the input closes.
///
/// # Errors
///
/// Returns [`StartupError`] when startup fails or the transport breaks.
pub async fn run(config: &PlannerConfig) -> Result<(), StartupError> {
    let backends = connect_backends(config.storage()?).await?;
    let registry = build_registry(&backends)?;
    info!(
        tools = registry.len(),
        sql_tools = backends.sql.is_some(),
        "mcp planner listening on stdio"
    );
    let server = Arc::new(McpServer::new(registry, Arc::new(DefaultClock)));
    serve_stdio(server).await?;
    Ok(())
}
