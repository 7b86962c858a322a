//! Document repository implementation.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::debug;

use drawer_core::{
    Category, Document, DocumentRepository, NewDocument, Result, TransactionType,
};

/// PostgreSQL implementation of [`DocumentRepository`].
#[derive(Clone)]
pub struct PgDocumentRepository {
    pool: PgPool,
}

impl PgDocumentRepository {
    /// Create a new repository backed by the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const DOCUMENT_COLUMNS: &str = "id, file_url, merchant, amount, category, transaction_type, \
     date, due_date, summary, insight, raw_text, file_size, file_path, created_at";

/// Map a database row to a [`Document`].
///
/// Stored category/transaction-type values are always members of the
/// closed sets; reads fall back to the normalizer defaults rather than
/// panicking if a row predates the current vocabulary.
fn map_document(row: &PgRow) -> Document {
    let category: String = row.get("category");
    let transaction_type: String = row.get("transaction_type");
    Document {
        id: row.get("id"),
        file_url: row.get("file_url"),
        merchant: row.get("merchant"),
        amount: row.get("amount"),
        category: Category::parse(&category).unwrap_or(Category::Finance),
        transaction_type: TransactionType::parse(&transaction_type)
            .unwrap_or(TransactionType::Record),
        date: row.get("date"),
        due_date: row.get("due_date"),
        summary: row.get("summary"),
        insight: row.get("insight"),
        raw_text: row.get("raw_text"),
        file_size: row.get("file_size"),
        file_path: row.get("file_path"),
        created_at: row.get("created_at"),
    }
}

#[async_trait]
impl DocumentRepository for PgDocumentRepository {
    async fn list(&self) -> Result<Vec<Document>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM documents ORDER BY created_at DESC, id DESC",
            DOCUMENT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(map_document).collect())
    }

    async fn get(&self, id: i32) -> Result<Option<Document>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM documents WHERE id = $1",
            DOCUMENT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(map_document))
    }

    async fn insert(&self, doc: NewDocument) -> Result<Document> {
        let row = sqlx::query(&format!(
            "INSERT INTO documents \
             (file_url, merchant, amount, category, transaction_type, date, due_date, \
              summary, insight, raw_text, file_size, file_path) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) \
             RETURNING {}",
            DOCUMENT_COLUMNS
        ))
        .bind(&doc.file_url)
        .bind(&doc.merchant)
        .bind(doc.amount)
        .bind(doc.category.as_str())
        .bind(doc.transaction_type.as_str())
        .bind(doc.date)
        .bind(doc.due_date)
        .bind(&doc.summary)
        .bind(&doc.insight)
        .bind(&doc.raw_text)
        .bind(doc.file_size)
        .bind(&doc.file_path)
        .fetch_one(&self.pool)
        .await?;

        let created = map_document(&row);
        debug!(
            subsystem = "db",
            document_id = created.id,
            merchant = %created.merchant,
            "document inserted"
        );
        Ok(created)
    }

    async fn delete(&self, id: i32) -> Result<()> {
        sqlx::query("DELETE FROM documents WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn last_by_merchant(&self, merchant: &str) -> Result<Option<Document>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM documents WHERE merchant = $1 \
             ORDER BY created_at DESC, id DESC LIMIT 1",
            DOCUMENT_COLUMNS
        ))
        .bind(merchant)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(map_document))
    }
}
