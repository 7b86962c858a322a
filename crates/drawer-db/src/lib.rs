//! # drawer-db
//!
//! PostgreSQL database layer for Drawer.
//!
//! This crate provides:
//! - Connection pool management
//! - Repository implementations for documents, notes, and chat messages
//! - Embedded schema migrations
//! - First-run seeding with sample data
//!
//! ## Example
//!
//! ```rust,ignore
//! use drawer_db::Database;
//! use drawer_core::DocumentRepository;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("postgres://localhost/drawer").await?;
//!     db.migrate().await?;
//!
//!     let docs = db.documents.list().await?;
//!     println!("{} documents stored", docs.len());
//!     Ok(())
//! }
//! ```

pub mod chat;
pub mod documents;
pub mod notes;
pub mod pool;
pub mod seed;

// Re-export core types
pub use drawer_core::*;

// Re-export repository implementations
pub use chat::PgChatMessageRepository;
pub use documents::PgDocumentRepository;
pub use notes::PgNoteRepository;
pub use pool::{create_pool, create_pool_with_config, log_pool_metrics, PoolConfig};
pub use seed::seed_database;

/// Aggregate handle over all repositories sharing one connection pool.
#[derive(Clone)]
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::PgPool,
    /// Document repository for CRUD and history lookups.
    pub documents: PgDocumentRepository,
    /// Note repository for CRUD operations.
    pub notes: PgNoteRepository,
    /// Chat message repository (append-only log).
    pub chat: PgChatMessageRepository,
}

impl Database {
    /// Create a new Database instance from a connection pool.
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self {
            documents: PgDocumentRepository::new(pool.clone()),
            notes: PgNoteRepository::new(pool.clone()),
            chat: PgChatMessageRepository::new(pool.clone()),
            pool,
        }
    }

    /// Connect to PostgreSQL with default pool settings.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = create_pool(database_url).await?;
        Ok(Self::new(pool))
    }

    /// Run embedded schema migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Internal(format!("Migration failed: {}", e)))?;
        Ok(())
    }
}
