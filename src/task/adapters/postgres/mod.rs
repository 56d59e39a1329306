//! `PostgreSQL` adapters for activity import persistence.
//!
//! The SQL that creates these tables lives in `migrations/`.

mod catalog;
mod directory;
mod models;
mod repository;
mod schema;

pub use catalog::{PostgresStageCatalog, PostgresTagCatalog};
pub use directory::PostgresReferenceDirectory;
pub use repository::PostgresTaskRepository;

use crate::task::ports::{CatalogError, TaskRepositoryError};
use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};

/// `PostgreSQL` connection pool type used by task adapters.
pub type TaskPgPool = Pool<ConnectionManager<PgConnection>>;

/// Port error types able to carry a persistence failure.
trait PersistenceFailure: Sized {
    fn persistence_failure(err: impl std::error::Error + Send + Sync + 'static) -> Self;
}

impl PersistenceFailure for TaskRepositoryError {
    fn persistence_failure(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::persistence(err)
    }
}

impl PersistenceFailure for CatalogError {
    fn persistence_failure(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::persistence(err)
    }
}

/// Runs a Diesel closure on the blocking pool with a pooled connection.
async fn run_blocking<F, T, E>(pool: &TaskPgPool, f: F) -> Result<T, E>
where
    F: FnOnce(&mut PgConnection) -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: PersistenceFailure + Send + 'static,
{
    let pool = pool.clone();
    tokio::task::spawn_blocking(move || {
        let mut connection = pool.get().map_err(E::persistence_failure)?;
        f(&mut connection)
    })
    .await
    .map_err(E::persistence_failure)?
}

/// Escapes `LIKE` wildcards so user input matches literally.
fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}
