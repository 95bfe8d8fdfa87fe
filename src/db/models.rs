use crate::schema::knowledge_items;
use crate::search::KnowledgeItem;
use diesel::{Insertable, Queryable, Selectable};

/// Represents a knowledge item row in the database
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = knowledge_items)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct KnowledgeItemRow {
    pub id: String,
    pub domain: String,
    pub insight: String,
    /// JSON number array, NULL until backfilled
    pub embedding: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<KnowledgeItemRow> for KnowledgeItem {
    fn from(row: KnowledgeItemRow) -> Self {
        KnowledgeItem {
            id: row.id,
            domain: row.domain,
            insight: row.insight,
            embedding: row.embedding,
            created_at: row.created_at,
        }
    }
}
