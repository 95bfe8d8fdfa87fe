use super::{Embedding, EmbeddingError};
use crate::errors::Error;
use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

/// A free-text knowledge item, optionally vectorized.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KnowledgeItem {
    pub id: String,
    /// Domain tag used for filtering
    pub domain: String,
    /// Text body that gets embedded
    pub insight: String,
    /// Stored embedding text, `None` until backfilled
    #[serde(skip_serializing)]
    pub embedding: Option<String>,
    pub created_at: String,
}

impl KnowledgeItem {
    /// Loads the stored embedding. `None` means the item was never vectorized.
    pub fn load_embedding(&self) -> Option<Result<Embedding, EmbeddingError>> {
        self.embedding.as_deref().map(Embedding::parse)
    }
}

/// Fields supplied when adding a knowledge item
#[derive(Debug, Clone, Deserialize)]
pub struct NewKnowledgeItem {
    pub domain: String,
    pub insight: String,
}

/// Domain predicate applied when listing embedded items
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainFilter {
    Any,
    Only(String),
    Except(String),
}

impl DomainFilter {
    pub fn matches(&self, domain: &str) -> bool {
        match self {
            DomainFilter::Any => true,
            DomainFilter::Only(d) => d == domain,
            DomainFilter::Except(d) => d != domain,
        }
    }
}

/// Read/update access to the knowledge collection.
///
/// Listing methods return items in a stable order (creation order) so that
/// ranking ties resolve the same way on every call.
#[async_trait]
pub trait KnowledgeStore: Send + Sync {
    /// Items whose embedding column is non-null and whose domain passes `filter`
    async fn list_embedded(&self, filter: DomainFilter) -> Result<Vec<KnowledgeItem>, Error>;

    /// Up to `limit` items that have no embedding yet
    async fn list_missing_embedding(&self, limit: usize) -> Result<Vec<KnowledgeItem>, Error>;

    async fn get(&self, id: &str) -> Result<Option<KnowledgeItem>, Error>;

    /// Writes a complete embedding for the item. Fails with `NotFound` for unknown ids.
    async fn update_embedding(&self, id: &str, embedding: &Embedding) -> Result<(), Error>;

    async fn insert(&self, item: NewKnowledgeItem) -> Result<KnowledgeItem, Error>;
}

/// Knowledge store kept entirely in memory
#[derive(Debug, Default)]
pub struct InMemoryKnowledgeStore {
    items: RwLock<Vec<KnowledgeItem>>,
}

impl InMemoryKnowledgeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store with existing items, embeddings included as-is.
    pub fn with_items(items: Vec<KnowledgeItem>) -> Self {
        Self {
            items: RwLock::new(items),
        }
    }
}

#[async_trait]
impl KnowledgeStore for InMemoryKnowledgeStore {
    async fn list_embedded(&self, filter: DomainFilter) -> Result<Vec<KnowledgeItem>, Error> {
        let items = self.items.read().await;
        Ok(items
            .iter()
            .filter(|item| item.embedding.is_some() && filter.matches(&item.domain))
            .cloned()
            .collect())
    }

    async fn list_missing_embedding(&self, limit: usize) -> Result<Vec<KnowledgeItem>, Error> {
        let items = self.items.read().await;
        Ok(items
            .iter()
            .filter(|item| item.embedding.is_none())
            .take(limit)
            .cloned()
            .collect())
    }

    async fn get(&self, id: &str) -> Result<Option<KnowledgeItem>, Error> {
        let items = self.items.read().await;
        Ok(items.iter().find(|item| item.id == id).cloned())
    }

    async fn update_embedding(&self, id: &str, embedding: &Embedding) -> Result<(), Error> {
        let mut items = self.items.write().await;
        let item = items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or_else(|| Error::NotFound(id.to_string()))?;
        item.embedding = Some(embedding.to_stored());
        Ok(())
    }

    async fn insert(&self, item: NewKnowledgeItem) -> Result<KnowledgeItem, Error> {
        let item = KnowledgeItem {
            id: Uuid::new_v4().to_string(),
            domain: item.domain,
            insight: item.insight,
            embedding: None,
            created_at: Utc::now().to_rfc3339(),
        };
        self.items.write().await.push(item.clone());
        Ok(item)
    }
}
