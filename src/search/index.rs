use super::{cosine_similarity, DomainFilter, Embedding, KnowledgeItem, KnowledgeStore};
use crate::constants::{
    DEFAULT_BACKFILL_DELAY_MS, DEFAULT_MIN_SIMILARITY, DEFAULT_RELATED_MIN_SIMILARITY,
    DEFAULT_RELATED_TOP_K, DEFAULT_TOP_K,
};
use crate::errors::{ProviderError, SearchError};
use crate::llm::Embedder;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Options for [`SemanticIndex::semantic_search`]
#[derive(Debug, Clone, Deserialize)]
pub struct SearchOptions {
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    #[serde(default = "default_min_similarity")]
    pub min_similarity: f32,
}

fn default_top_k() -> usize {
    DEFAULT_TOP_K
}

fn default_min_similarity() -> f32 {
    DEFAULT_MIN_SIMILARITY
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            domain: None,
            top_k: DEFAULT_TOP_K,
            min_similarity: DEFAULT_MIN_SIMILARITY,
        }
    }
}

/// Options for [`SemanticIndex::find_related_knowledge`]
#[derive(Debug, Clone, Deserialize)]
pub struct RelatedOptions {
    #[serde(default)]
    pub exclude_same_domain: bool,
    #[serde(default = "default_related_top_k")]
    pub top_k: usize,
    #[serde(default = "default_related_min_similarity")]
    pub min_similarity: f32,
}

fn default_related_top_k() -> usize {
    DEFAULT_RELATED_TOP_K
}

fn default_related_min_similarity() -> f32 {
    DEFAULT_RELATED_MIN_SIMILARITY
}

impl Default for RelatedOptions {
    fn default() -> Self {
        Self {
            exclude_same_domain: false,
            top_k: DEFAULT_RELATED_TOP_K,
            min_similarity: DEFAULT_RELATED_MIN_SIMILARITY,
        }
    }
}

/// A knowledge item annotated with its similarity to the query
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    #[serde(flatten)]
    pub item: KnowledgeItem,
    pub similarity: f32,
}

/// Outcome of one backfill batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BackfillReport {
    pub processed: usize,
    pub failed: usize,
}

/// Ranks knowledge items against query vectors and fills in missing embeddings.
#[derive(Clone)]
pub struct SemanticIndex {
    store: Arc<dyn KnowledgeStore>,
    embedder: Arc<dyn Embedder>,
    /// Pause between two embedding calls during backfill
    backfill_delay: Duration,
}

impl SemanticIndex {
    pub fn new(store: Arc<dyn KnowledgeStore>, embedder: Arc<dyn Embedder>) -> Self {
        Self {
            store,
            embedder,
            backfill_delay: Duration::from_millis(DEFAULT_BACKFILL_DELAY_MS),
        }
    }

    pub fn with_backfill_delay(mut self, delay: Duration) -> Self {
        self.backfill_delay = delay;
        self
    }

    pub fn store(&self) -> &Arc<dyn KnowledgeStore> {
        &self.store
    }

    /// Embeds `query` once and ranks every embedded item (optionally within a
    /// domain) by cosine similarity.
    ///
    /// Items scoring below `min_similarity` are dropped, the rest are sorted
    /// best-first (ties keep store order) and cut to `top_k`. Items whose
    /// stored embedding cannot be loaded are skipped with a warning.
    pub async fn semantic_search(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> Result<Vec<SearchResult>, SearchError> {
        info!(
            "Searching knowledge: query={:?} domain={:?} top_k={} min_similarity={}",
            query, options.domain, options.top_k, options.min_similarity
        );

        let query_embedding = self.embed(query).await?;

        let filter = match &options.domain {
            Some(domain) => DomainFilter::Only(domain.clone()),
            None => DomainFilter::Any,
        };
        let candidates = self.store.list_embedded(filter).await?;

        let results = rank(
            &query_embedding,
            candidates,
            options.top_k,
            options.min_similarity,
        );
        debug!("Semantic search returned {} results", results.len());
        Ok(results)
    }

    /// Ranks every other embedded item by similarity to the item `item_id`.
    ///
    /// # Errors
    /// * `NotFound` - no item with that id
    /// * `MissingEmbedding` - the item has not been vectorized
    /// * `Parse` - the item's stored embedding is malformed
    pub async fn find_related_knowledge(
        &self,
        item_id: &str,
        options: &RelatedOptions,
    ) -> Result<Vec<SearchResult>, SearchError> {
        let source = self
            .store
            .get(item_id)
            .await?
            .ok_or_else(|| SearchError::NotFound(item_id.to_string()))?;

        let source_embedding = match source.load_embedding() {
            None => return Err(SearchError::MissingEmbedding(item_id.to_string())),
            Some(Err(e)) => {
                return Err(SearchError::Parse {
                    id: item_id.to_string(),
                    reason: e.to_string(),
                })
            }
            Some(Ok(embedding)) => embedding,
        };

        let filter = if options.exclude_same_domain {
            DomainFilter::Except(source.domain.clone())
        } else {
            DomainFilter::Any
        };
        let candidates = self
            .store
            .list_embedded(filter)
            .await?
            .into_iter()
            .filter(|item| item.id != source.id)
            .collect();

        Ok(rank(
            &source_embedding,
            candidates,
            options.top_k,
            options.min_similarity,
        ))
    }

    /// Embeds up to `batch_size` items that have no embedding yet.
    ///
    /// Failures (embedding or persistence) are counted per item and never stop
    /// the batch. Only listing the batch itself can fail the call. Items are
    /// processed one at a time with `backfill_delay` between calls.
    pub async fn backfill_embeddings(
        &self,
        batch_size: usize,
    ) -> Result<BackfillReport, SearchError> {
        let pending = self.store.list_missing_embedding(batch_size).await?;
        info!("Backfilling embeddings for {} items", pending.len());

        let mut report = BackfillReport::default();
        for (i, item) in pending.iter().take(batch_size).enumerate() {
            if i > 0 && !self.backfill_delay.is_zero() {
                tokio::time::sleep(self.backfill_delay).await;
            }

            match self.embed_and_store(item).await {
                Ok(()) => {
                    debug!("Embedded knowledge item {}", item.id);
                    report.processed += 1;
                }
                Err(e) => {
                    error!("Failed to embed knowledge item {}: {}", item.id, e);
                    report.failed += 1;
                }
            }
        }

        info!(
            "Backfill finished: processed={} failed={}",
            report.processed, report.failed
        );
        Ok(report)
    }

    async fn embed_and_store(&self, item: &KnowledgeItem) -> Result<(), SearchError> {
        let embedding = self.embed(&item.insight).await?;
        self.store.update_embedding(&item.id, &embedding).await?;
        Ok(())
    }

    async fn embed(&self, text: &str) -> Result<Embedding, SearchError> {
        let values = self.embedder.embed_text(text).await?;
        Embedding::new(values).map_err(|e| {
            SearchError::Provider(ProviderError::MalformedResponse(format!(
                "unusable embedding: {}",
                e
            )))
        })
    }
}

/// Scores `candidates` against `reference`, keeps those at or above
/// `min_similarity`, sorts best-first and truncates to `top_k`.
///
/// `sort_by` is stable, so equal scores keep candidate order.
pub fn rank(
    reference: &Embedding,
    candidates: Vec<KnowledgeItem>,
    top_k: usize,
    min_similarity: f32,
) -> Vec<SearchResult> {
    let mut scored: Vec<SearchResult> = candidates
        .into_iter()
        .filter_map(|item| {
            let embedding = match item.load_embedding()? {
                Ok(embedding) => embedding,
                Err(e) => {
                    warn!("Skipping knowledge item {}: {}", item.id, e);
                    return None;
                }
            };
            if embedding.dim() != reference.dim() {
                warn!(
                    "Skipping knowledge item {}: dimension {} does not match {}",
                    item.id,
                    embedding.dim(),
                    reference.dim()
                );
                return None;
            }
            let similarity = cosine_similarity(reference.values(), embedding.values());
            (similarity >= min_similarity).then_some(SearchResult { item, similarity })
        })
        .collect();

    scored.sort_by(|a, b| {
        b.similarity
            .partial_cmp(&a.similarity)
            .unwrap_or(Ordering::Equal)
    });
    scored.truncate(top_k);
    scored
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::{InMemoryKnowledgeStore, NewKnowledgeItem};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Embeds text by looking it up in a fixed table; unknown text fails.
    struct TableEmbedder {
        table: Vec<(&'static str, Vec<f32>)>,
        calls: Mutex<Vec<String>>,
    }

    impl TableEmbedder {
        fn new(table: Vec<(&'static str, Vec<f32>)>) -> Self {
            Self {
                table,
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Embedder for TableEmbedder {
        async fn embed_text(&self, text: &str) -> Result<Vec<f32>, ProviderError> {
            self.calls.lock().unwrap().push(text.to_string());
            self.table
                .iter()
                .find(|(key, _)| *key == text)
                .map(|(_, v)| v.clone())
                .ok_or_else(|| ProviderError::Upstream(format!("cannot embed '{}'", text)))
        }
    }

    fn item(id: &str, domain: &str, embedding: Option<&str>) -> KnowledgeItem {
        KnowledgeItem {
            id: id.into(),
            domain: domain.into(),
            insight: id.into(),
            embedding: embedding.map(String::from),
            created_at: String::new(),
        }
    }

    fn corpus() -> Vec<KnowledgeItem> {
        vec![
            item("exact", "rust", Some("[1.0, 0.0, 0.0]")),
            item("close", "rust", Some("[0.9, 0.1, 0.0]")),
            item("half", "go", Some("[1.0, 1.0, 0.0]")),
            item("far", "go", Some("[0.0, 0.0, 1.0]")),
            item("broken", "rust", Some("[1.0, oops]")),
            item("pending", "rust", None),
        ]
    }

    fn index_over(items: Vec<KnowledgeItem>, embedder: TableEmbedder) -> SemanticIndex {
        SemanticIndex::new(
            Arc::new(InMemoryKnowledgeStore::with_items(items)),
            Arc::new(embedder),
        )
        .with_backfill_delay(Duration::from_millis(1))
    }

    fn query_embedder() -> TableEmbedder {
        TableEmbedder::new(vec![("query", vec![1.0, 0.0, 0.0])])
    }

    fn ids(results: &[SearchResult]) -> Vec<&str> {
        results.iter().map(|r| r.item.id.as_str()).collect()
    }

    #[tokio::test]
    async fn search_filters_sorts_and_skips_malformed() {
        let index = index_over(corpus(), query_embedder());
        let results = index
            .semantic_search("query", &SearchOptions::default())
            .await
            .unwrap();

        assert_eq!(ids(&results), ["exact", "close", "half"]);
        assert!(results.iter().all(|r| r.similarity >= 0.5));
        assert!(results
            .windows(2)
            .all(|w| w[0].similarity >= w[1].similarity));
    }

    #[tokio::test]
    async fn search_respects_top_k_and_domain() {
        let index = index_over(corpus(), query_embedder());

        let options = SearchOptions {
            top_k: 2,
            ..SearchOptions::default()
        };
        let results = index.semantic_search("query", &options).await.unwrap();
        assert_eq!(ids(&results), ["exact", "close"]);

        let options = SearchOptions {
            domain: Some("go".into()),
            ..SearchOptions::default()
        };
        let results = index.semantic_search("query", &options).await.unwrap();
        assert_eq!(ids(&results), ["half"]);
    }

    #[tokio::test]
    async fn impossible_threshold_and_empty_corpus_give_empty_results() {
        let index = index_over(corpus(), query_embedder());
        let options = SearchOptions {
            min_similarity: 1.5,
            ..SearchOptions::default()
        };
        assert!(index.semantic_search("query", &options).await.unwrap().is_empty());

        let empty = index_over(Vec::new(), query_embedder());
        assert!(empty
            .semantic_search("query", &SearchOptions::default())
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn search_propagates_embedding_failure() {
        let index = index_over(corpus(), query_embedder());
        let err = index
            .semantic_search("unknown text", &SearchOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, SearchError::Provider(_)));
    }

    #[tokio::test]
    async fn ties_keep_store_order() {
        let items = vec![
            item("first", "x", Some("[1.0, 0.0]")),
            item("second", "x", Some("[2.0, 0.0]")),
            item("third", "x", Some("[3.0, 0.0]")),
        ];
        let reference = Embedding::new(vec![1.0, 0.0]).unwrap();
        let results = rank(&reference, items, 10, 0.0);
        assert_eq!(ids(&results), ["first", "second", "third"]);
    }

    #[tokio::test]
    async fn dimension_mismatch_is_skipped() {
        let items = vec![
            item("short", "x", Some("[1.0]")),
            item("ok", "x", Some("[1.0, 0.0]")),
        ];
        let reference = Embedding::new(vec![1.0, 0.0]).unwrap();
        assert_eq!(ids(&rank(&reference, items, 10, 0.0)), ["ok"]);
    }

    #[tokio::test]
    async fn related_excludes_source_item() {
        let index = index_over(corpus(), query_embedder());
        let options = RelatedOptions {
            min_similarity: 0.0,
            ..RelatedOptions::default()
        };
        let results = index.find_related_knowledge("exact", &options).await.unwrap();
        assert!(!ids(&results).contains(&"exact"));
        assert_eq!(results[0].item.id, "close");
    }

    #[tokio::test]
    async fn related_can_exclude_same_domain() {
        let index = index_over(corpus(), query_embedder());
        let options = RelatedOptions {
            exclude_same_domain: true,
            min_similarity: 0.0,
            ..RelatedOptions::default()
        };
        let results = index.find_related_knowledge("exact", &options).await.unwrap();
        assert!(results.iter().all(|r| r.item.domain == "go"));
        assert_eq!(ids(&results), ["half", "far"]);
    }

    #[tokio::test]
    async fn related_reports_precondition_failures() {
        let index = index_over(corpus(), query_embedder());
        let options = RelatedOptions::default();

        let err = index.find_related_knowledge("nope", &options).await.unwrap_err();
        assert!(matches!(err, SearchError::NotFound(id) if id == "nope"));

        let err = index
            .find_related_knowledge("pending", &options)
            .await
            .unwrap_err();
        assert!(matches!(err, SearchError::MissingEmbedding(id) if id == "pending"));

        let err = index
            .find_related_knowledge("broken", &options)
            .await
            .unwrap_err();
        assert!(matches!(err, SearchError::Parse { id, .. } if id == "broken"));
    }

    #[tokio::test]
    async fn backfill_counts_failures_and_continues() {
        let items = vec![
            item("a", "x", None),
            item("unembeddable", "x", None),
            item("c", "x", None),
        ];
        let embedder = TableEmbedder::new(vec![("a", vec![1.0, 0.0]), ("c", vec![0.0, 1.0])]);
        let index = index_over(items, embedder);

        let report = index.backfill_embeddings(10).await.unwrap();
        assert_eq!(report, BackfillReport { processed: 2, failed: 1 });

        let stored = index.store().get("c").await.unwrap().unwrap();
        assert_eq!(stored.load_embedding().unwrap().unwrap().values(), [0.0, 1.0]);

        // Only the item that still lacks an embedding is retried
        let report = index.backfill_embeddings(10).await.unwrap();
        assert_eq!(report, BackfillReport { processed: 0, failed: 1 });
    }

    #[tokio::test]
    async fn backfill_respects_batch_size_and_is_idempotent() {
        let embedder = TableEmbedder::new(vec![
            ("a", vec![1.0]),
            ("b", vec![1.0]),
            ("c", vec![1.0]),
        ]);
        let index = index_over(
            vec![item("a", "x", None), item("b", "x", None), item("c", "x", None)],
            embedder,
        );

        let report = index.backfill_embeddings(2).await.unwrap();
        assert!(report.processed + report.failed <= 2);
        assert_eq!(report.processed, 2);

        let report = index.backfill_embeddings(2).await.unwrap();
        assert_eq!(report.processed, 1);

        let report = index.backfill_embeddings(2).await.unwrap();
        assert_eq!(report, BackfillReport::default());
    }

    #[tokio::test]
    async fn inserted_items_are_backfilled_then_searchable() {
        let embedder = TableEmbedder::new(vec![
            ("ownership rules", vec![1.0, 0.0]),
            ("query", vec![1.0, 0.0]),
        ]);
        let index = index_over(Vec::new(), embedder);
        index
            .store()
            .insert(NewKnowledgeItem {
                domain: "rust".into(),
                insight: "ownership rules".into(),
            })
            .await
            .unwrap();

        assert!(index
            .semantic_search("query", &SearchOptions::default())
            .await
            .unwrap()
            .is_empty());

        index.backfill_embeddings(5).await.unwrap();
        let results = index
            .semantic_search("query", &SearchOptions::default())
            .await
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].item.insight, "ownership rules");
    }
}
