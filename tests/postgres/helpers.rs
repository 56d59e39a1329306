//! Shared helpers for `PostgreSQL` adapter tests.

use activity_import::task::{
    adapters::postgres::TaskPgPool,
    domain::{CompanyId, ProjectId, StageId, UserId},
};
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sql_types::{BigInt, Nullable, Text};
use pg_embedded_setup_unpriv::TestCluster;
use tokio::runtime::Runtime;

/// Boxed error returned by setup helpers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// SQL creating the importer schema.
const CREATE_SCHEMA_SQL: &str =
    include_str!("../../migrations/2026-10-01-000000_create_activity_import/up.sql");

/// Template database name for the pre-migrated schema.
const TEMPLATE_DB: &str = "activity_import_test_template";

/// Creates a tokio runtime for async adapter calls.
pub fn test_runtime() -> Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("failed to create test runtime")
}

/// Ensures the template database exists with the schema applied.
pub fn ensure_template(cluster: &TestCluster) -> Result<(), BoxError> {
    cluster
        .ensure_template_exists(TEMPLATE_DB, |db_name| {
            let url = cluster.connection().database_url(db_name);
            let mut conn = PgConnection::establish(&url).map_err(|e| eyre::eyre!("{e}"))?;
            conn.batch_execute(CREATE_SCHEMA_SQL)
                .map_err(|e| eyre::eyre!("schema setup failed: {e}"))?;
            Ok(())
        })
        .map_err(|e| Box::new(e) as BoxError)?;
    Ok(())
}

/// Creates a database from the template and returns a pool over it.
///
/// The pool allows a few connections so concurrent get-or-create calls
/// really race on the database.
pub fn setup_pool(cluster: &TestCluster, db_name: &str) -> Result<TaskPgPool, BoxError> {
    cluster
        .create_database_from_template(db_name, TEMPLATE_DB)
        .map_err(|e| Box::new(e) as BoxError)?;
    let url = cluster.connection().database_url(db_name);
    let manager = ConnectionManager::<PgConnection>::new(url);
    Pool::builder()
        .max_size(4)
        .build(manager)
        .map_err(|e| Box::new(e) as BoxError)
}

/// Drops the test database when the test ends, even on panic.
///
/// Declare it before anything holding the pool so connections close first.
pub struct CleanupGuard<'a> {
    cluster: &'a TestCluster,
    db_name: String,
}

impl<'a> CleanupGuard<'a> {
    /// Guards `db_name` on `cluster`.
    pub const fn new(cluster: &'a TestCluster, db_name: String) -> Self {
        Self { cluster, db_name }
    }
}

impl Drop for CleanupGuard<'_> {
    fn drop(&mut self) {
        if let Err(e) = self.cluster.drop_database(self.db_name.as_str()) {
            eprintln!(
                "Warning: failed to drop test database {}: {e}",
                self.db_name
            );
        }
    }
}

/// Returns a unique database name for one test.
pub fn database_name(prefix: &str) -> String {
    format!("{prefix}_{}", uuid::Uuid::new_v4())
}

#[derive(QueryableByName)]
struct CountRow {
    #[diesel(sql_type = BigInt)]
    count: i64,
}

/// Counts the rows of `table`.
pub fn count_rows(pool: &TaskPgPool, table: &str) -> i64 {
    let mut conn = pool.get().expect("pooled connection");
    diesel::sql_query(format!("SELECT COUNT(*) AS count FROM {table}"))
        .get_result::<CountRow>(&mut conn)
        .expect("count query")
        .count
}

/// Seeds a user row and returns its identifier.
pub fn insert_user(pool: &TaskPgPool, name: &str) -> UserId {
    let id = UserId::new();
    let mut conn = pool.get().expect("pooled connection");
    diesel::sql_query("INSERT INTO users (id, name) VALUES ($1, $2)")
        .bind::<diesel::sql_types::Uuid, _>(id.into_inner())
        .bind::<Text, _>(name)
        .execute(&mut conn)
        .expect("insert user");
    id
}

/// Seeds a partner company and returns its identifier.
pub fn insert_company(pool: &TaskPgPool, name: &str) -> CompanyId {
    let id = CompanyId::new();
    let mut conn = pool.get().expect("pooled connection");
    diesel::sql_query("INSERT INTO companies (id, name) VALUES ($1, $2)")
        .bind::<diesel::sql_types::Uuid, _>(id.into_inner())
        .bind::<Text, _>(name)
        .execute(&mut conn)
        .expect("insert company");
    id
}

/// Seeds a project with an optional default stage.
pub fn insert_project(
    pool: &TaskPgPool,
    code: &str,
    name: &str,
    default_stage: Option<StageId>,
) -> ProjectId {
    let id = ProjectId::new();
    let mut conn = pool.get().expect("pooled connection");
    diesel::sql_query(
        "INSERT INTO projects (id, code, name, default_stage_id) VALUES ($1, $2, $3, $4)",
    )
    .bind::<diesel::sql_types::Uuid, _>(id.into_inner())
    .bind::<Text, _>(code)
    .bind::<Text, _>(name)
    .bind::<Nullable<diesel::sql_types::Uuid>, _>(default_stage.map(StageId::into_inner))
    .execute(&mut conn)
    .expect("insert project");
    id
}
