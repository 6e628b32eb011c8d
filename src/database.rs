//! Shared `PostgreSQL` connection pool.

use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool, PoolError};

/// `PostgreSQL` connection pool used by every database adapter.
pub type PgPool = Pool<ConnectionManager<PgConnection>>;

/// Builds a pool and opens its initial connections.
///
/// This blocks while connecting; call it from `spawn_blocking` inside async
/// code.
///
/// # Errors
///
/// Returns [`PoolError`] when the database cannot be reached.
pub fn connect_pool(database_url: &str, max_size: u32) -> Result<PgPool, PoolError> {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    Pool::builder().max_size(max_size).build(manager)
}
