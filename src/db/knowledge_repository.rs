use super::{Database, KnowledgeItemRow};
use crate::errors::Error;
use crate::search::{DomainFilter, Embedding, KnowledgeItem, KnowledgeStore, NewKnowledgeItem};
use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use uuid::Uuid;

/// Repository for managing knowledge item records in the SQLite database
pub struct KnowledgeRepository<'a> {
    /// Database connection
    pub conn: &'a mut SqliteConnection,
}

impl<'a> KnowledgeRepository<'a> {
    pub fn new(conn: &'a mut SqliteConnection) -> Self {
        KnowledgeRepository { conn }
    }

    /// Retrieves items that carry an embedding, filtered by domain, oldest first
    pub fn list_embedded(&mut self, filter: &DomainFilter) -> Result<Vec<KnowledgeItemRow>, Error> {
        use crate::schema::knowledge_items::dsl::*;

        let mut query = knowledge_items
            .filter(embedding.is_not_null())
            .select(KnowledgeItemRow::as_select())
            .into_boxed();
        query = match filter {
            DomainFilter::Any => query,
            DomainFilter::Only(d) => query.filter(domain.eq(d.as_str())),
            DomainFilter::Except(d) => query.filter(domain.ne(d.as_str())),
        };

        Ok(query
            .order(created_at.asc())
            .load::<KnowledgeItemRow>(self.conn)?)
    }

    /// Retrieves up to `limit` items without an embedding, oldest first
    pub fn list_missing_embedding(&mut self, limit: usize) -> Result<Vec<KnowledgeItemRow>, Error> {
        use crate::schema::knowledge_items::dsl::*;

        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        Ok(knowledge_items
            .filter(embedding.is_null())
            .order(created_at.asc())
            .limit(limit)
            .select(KnowledgeItemRow::as_select())
            .load::<KnowledgeItemRow>(self.conn)?)
    }

    /// Retrieves a single item by id
    pub fn get_item(&mut self, item_id: &str) -> Result<Option<KnowledgeItemRow>, Error> {
        use crate::schema::knowledge_items::dsl::*;

        Ok(knowledge_items
            .find(item_id)
            .select(KnowledgeItemRow::as_select())
            .first::<KnowledgeItemRow>(self.conn)
            .optional()?)
    }

    /// Writes the full embedding of an item
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` if no row has that id
    pub fn update_embedding(&mut self, item_id: &str, stored: &str) -> Result<(), Error> {
        use crate::schema::knowledge_items::dsl::*;
        let now = Utc::now().to_rfc3339();

        let updated = diesel::update(knowledge_items.find(item_id))
            .set((embedding.eq(Some(stored)), updated_at.eq(&now)))
            .execute(self.conn)?;
        if updated == 0 {
            return Err(Error::NotFound(item_id.to_string()));
        }
        Ok(())
    }

    /// Inserts a new item without an embedding
    pub fn insert_item(&mut self, new_domain: &str, new_insight: &str) -> Result<KnowledgeItemRow, Error> {
        use crate::schema::knowledge_items;
        let now = Utc::now().to_rfc3339();

        let row = KnowledgeItemRow {
            id: Uuid::new_v4().to_string(),
            domain: new_domain.to_string(),
            insight: new_insight.to_string(),
            embedding: None,
            created_at: now.clone(),
            updated_at: now,
        };

        diesel::insert_into(knowledge_items::table)
            .values(&row)
            .execute(self.conn)?;
        Ok(row)
    }
}

/// [`KnowledgeStore`] backed by the SQLite database
///
/// Pool checkouts and queries block, so each call runs on tokio's blocking
/// thread pool.
#[derive(Clone, Debug)]
pub struct SqliteKnowledgeStore {
    database: Database,
}

impl SqliteKnowledgeStore {
    pub fn new(database: Database) -> Self {
        Self { database }
    }

    async fn with_repository<T, F>(&self, f: F) -> Result<T, Error>
    where
        F: FnOnce(&mut KnowledgeRepository<'_>) -> Result<T, Error> + Send + 'static,
        T: Send + 'static,
    {
        let database = self.database.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = database.get_conn()?;
            f(&mut KnowledgeRepository::new(&mut conn))
        })
        .await?
    }
}

#[async_trait]
impl KnowledgeStore for SqliteKnowledgeStore {
    async fn list_embedded(&self, filter: DomainFilter) -> Result<Vec<KnowledgeItem>, Error> {
        let rows = self
            .with_repository(move |repo| repo.list_embedded(&filter))
            .await?;
        Ok(rows.into_iter().map(KnowledgeItem::from).collect())
    }

    async fn list_missing_embedding(&self, limit: usize) -> Result<Vec<KnowledgeItem>, Error> {
        let rows = self
            .with_repository(move |repo| repo.list_missing_embedding(limit))
            .await?;
        Ok(rows.into_iter().map(KnowledgeItem::from).collect())
    }

    async fn get(&self, id: &str) -> Result<Option<KnowledgeItem>, Error> {
        let id = id.to_string();
        let row = self.with_repository(move |repo| repo.get_item(&id)).await?;
        Ok(row.map(KnowledgeItem::from))
    }

    async fn update_embedding(&self, id: &str, embedding: &Embedding) -> Result<(), Error> {
        let id = id.to_string();
        let stored = embedding.to_stored();
        self.with_repository(move |repo| repo.update_embedding(&id, &stored))
            .await
    }

    async fn insert(&self, item: NewKnowledgeItem) -> Result<KnowledgeItem, Error> {
        let row = self
            .with_repository(move |repo| repo.insert_item(&item.domain, &item.insight))
            .await?;
        Ok(row.into())
    }
}
