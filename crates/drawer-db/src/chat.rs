//! Chat message repository implementation.
//!
//! The chat log is append-only: messages are inserted and listed in
//! chronological order, and the only destructive operation is clearing
//! the whole conversation.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::debug;

use drawer_core::{ChatMessage, ChatMessageRepository, NewChatMessage, Result, Role};

/// PostgreSQL implementation of [`ChatMessageRepository`].
#[derive(Clone)]
pub struct PgChatMessageRepository {
    pool: PgPool,
}

impl PgChatMessageRepository {
    /// Create a new repository backed by the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const MESSAGE_COLUMNS: &str = "id, role, content, attachment_url, created_at";

fn map_message(row: &PgRow) -> ChatMessage {
    let role: String = row.get("role");
    ChatMessage {
        id: row.get("id"),
        role: Role::parse(&role).unwrap_or(Role::Assistant),
        content: row.get("content"),
        attachment_url: row.get("attachment_url"),
        created_at: row.get("created_at"),
    }
}

#[async_trait]
impl ChatMessageRepository for PgChatMessageRepository {
    async fn list(&self) -> Result<Vec<ChatMessage>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM chat_messages ORDER BY created_at ASC, id ASC",
            MESSAGE_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(map_message).collect())
    }

    async fn insert(&self, msg: NewChatMessage) -> Result<ChatMessage> {
        let row = sqlx::query(&format!(
            "INSERT INTO chat_messages (role, content, attachment_url) \
             VALUES ($1, $2, $3) RETURNING {}",
            MESSAGE_COLUMNS
        ))
        .bind(msg.role.as_str())
        .bind(&msg.content)
        .bind(&msg.attachment_url)
        .fetch_one(&self.pool)
        .await?;
        Ok(map_message(&row))
    }

    async fn clear(&self) -> Result<()> {
        let result = sqlx::query("DELETE FROM chat_messages")
            .execute(&self.pool)
            .await?;
        debug!(
            subsystem = "db",
            op = "clear",
            deleted = result.rows_affected(),
            "chat history cleared"
        );
        Ok(())
    }
}
