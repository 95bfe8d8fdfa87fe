mod knowledge_repository;
mod models;

use crate::errors::Error;
use diesel::r2d2::{ConnectionManager, Pool, PooledConnection};
use diesel::sqlite::SqliteConnection;
use diesel::RunQueryDsl;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

pub use knowledge_repository::*;
pub use models::*;

const IN_MEMORY: &str = ":memory:";

const CREATE_KNOWLEDGE_ITEMS: &str = "CREATE TABLE IF NOT EXISTS knowledge_items (
    id TEXT PRIMARY KEY NOT NULL,
    domain TEXT NOT NULL,
    insight TEXT NOT NULL,
    embedding TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
)";

const CREATE_DOMAIN_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_knowledge_items_domain ON knowledge_items (domain)";

#[derive(Clone, Debug)]
pub struct Database {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
}

impl Database {
    /// Opens (or creates) the SQLite database at `db_path` and ensures the
    /// schema exists. `:memory:` gets a single-connection pool so every
    /// checkout sees the same database.
    pub fn new(db_path: &str) -> Result<Self, Error> {
        if db_path != IN_MEMORY {
            if let Some(parent) = Path::new(db_path).parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
        }

        let manager = ConnectionManager::<SqliteConnection>::new(db_path);
        let mut builder = Pool::builder();
        if db_path == IN_MEMORY {
            builder = builder.max_size(1);
        }
        let pool = builder.build(manager)?;

        let database = Database {
            pool: Arc::new(pool),
        };
        database.ensure_schema()?;
        info!("Opened knowledge database at {}", db_path);
        Ok(database)
    }

    pub fn get_conn(&self) -> Result<PooledConnection<ConnectionManager<SqliteConnection>>, Error> {
        Ok(self.pool.get()?)
    }

    fn ensure_schema(&self) -> Result<(), Error> {
        let mut conn = self.get_conn()?;
        diesel::sql_query(CREATE_KNOWLEDGE_ITEMS).execute(&mut *conn)?;
        diesel::sql_query(CREATE_DOMAIN_INDEX).execute(&mut *conn)?;
        Ok(())
    }
}
