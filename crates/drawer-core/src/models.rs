//! Core data models for Drawer.
//!
//! These types are shared across all Drawer crates and represent the
//! domain entities: uploaded documents with extracted facts, notes and
//! reminders, the chat log, and the derived read-side projections.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// =============================================================================
// CLOSED VOCABULARIES
// =============================================================================

/// Document category. Closed set — extraction coerces anything else to
/// [`Category::Finance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Finance,
    Health,
    Personal,
    Home,
    #[serde(rename = "Identity/Legal")]
    IdentityLegal,
    #[serde(rename = "Career/School")]
    CareerSchool,
}

/// All categories, in display order.
pub const CATEGORIES: [Category; 6] = [
    Category::Finance,
    Category::Health,
    Category::Personal,
    Category::Home,
    Category::IdentityLegal,
    Category::CareerSchool,
];

impl Category {
    /// Canonical display name (also the stored database value).
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Finance => "Finance",
            Category::Health => "Health",
            Category::Personal => "Personal",
            Category::Home => "Home",
            Category::IdentityLegal => "Identity/Legal",
            Category::CareerSchool => "Career/School",
        }
    }

    /// Parse an exact category name. Returns `None` for anything outside
    /// the closed set; callers decide the fallback.
    pub fn parse(s: &str) -> Option<Self> {
        CATEGORIES.iter().copied().find(|c| c.as_str() == s)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transaction type. `Record` marks informational documents that are
/// excluded from financial totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Expense,
    Income,
    Record,
}

/// All transaction types.
pub const TRANSACTION_TYPES: [TransactionType; 3] = [
    TransactionType::Expense,
    TransactionType::Income,
    TransactionType::Record,
];

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Expense => "expense",
            TransactionType::Income => "income",
            TransactionType::Record => "record",
        }
    }

    /// Parse an exact transaction type. Returns `None` for anything
    /// outside the closed set.
    pub fn parse(s: &str) -> Option<Self> {
        TRANSACTION_TYPES.iter().copied().find(|t| t.as_str() == s)
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// DOCUMENT TYPES
// =============================================================================

/// A user-uploaded document with its extracted facts.
///
/// Immutable after creation; deleting a document also deletes the stored
/// file it references.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: i32,
    /// Public download URL (`/uploads/...`).
    pub file_url: String,
    pub merchant: String,
    /// Non-negative, 2-decimal precision. Always zero for records.
    pub amount: Decimal,
    pub category: Category,
    pub transaction_type: TransactionType,
    /// Document date (receipt date, pay period end, tax year end, ...).
    pub date: NaiveDate,
    /// Present only for bill-like expenses.
    pub due_date: Option<NaiveDate>,
    pub summary: String,
    /// Derived comparative insight, computed once at creation.
    pub insight: String,
    /// Complete transcription of the document's visible text.
    pub raw_text: Option<String>,
    pub file_size: i32,
    /// Server-local path of the stored file.
    pub file_path: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Fields for inserting a new document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDocument {
    pub file_url: String,
    pub merchant: String,
    pub amount: Decimal,
    pub category: Category,
    pub transaction_type: TransactionType,
    pub date: NaiveDate,
    pub due_date: Option<NaiveDate>,
    pub summary: String,
    pub insight: String,
    pub raw_text: Option<String>,
    pub file_size: i32,
    pub file_path: Option<String>,
}

/// Fully normalized output of the extraction pipeline.
///
/// Satisfies every document invariant: amount ≥ 0 (and exactly 0 for
/// records), category and transaction type within their closed sets.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedDocument {
    pub merchant: String,
    pub amount: Decimal,
    pub category: Category,
    pub transaction_type: TransactionType,
    pub date: NaiveDate,
    pub due_date: Option<NaiveDate>,
    pub summary: String,
    pub raw_text: String,
}

// =============================================================================
// NOTE TYPES
// =============================================================================

/// A user- or assistant-created reminder/memo.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: i32,
    pub content: String,
    pub reminder_date: Option<NaiveDate>,
    /// `HH:MM`, local wall-clock.
    pub reminder_time: Option<String>,
    pub is_completed: bool,
    pub created_at: DateTime<Utc>,
}

/// Fields for inserting a new note.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewNote {
    pub content: String,
    #[serde(default)]
    pub reminder_date: Option<NaiveDate>,
    #[serde(default)]
    pub reminder_time: Option<String>,
    #[serde(default)]
    pub is_completed: bool,
}

/// Partial note update. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteUpdate {
    pub content: Option<String>,
    pub reminder_date: Option<NaiveDate>,
    pub reminder_time: Option<String>,
    pub is_completed: Option<bool>,
}

// =============================================================================
// CHAT TYPES
// =============================================================================

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "user" => Some(Role::User),
            "assistant" => Some(Role::Assistant),
            _ => None,
        }
    }
}

/// Append-only conversation log entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: i32,
    pub role: Role,
    /// May embed a markdown `[label](/uploads/...)` download link; the
    /// rendering layer treats such links as download actions.
    pub content: String,
    pub attachment_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Fields for appending a chat message.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewChatMessage {
    pub role: Role,
    pub content: String,
    pub attachment_url: Option<String>,
}

// =============================================================================
// DERIVED PROJECTIONS
// =============================================================================

/// Kind of a derived calendar event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarEventKind {
    /// Document due date.
    Bill,
    /// Note reminder date.
    Reminder,
}

/// Derived (non-persisted) calendar entry merging document due dates and
/// note reminders into one date-indexed feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    /// Document id, or note id offset by
    /// [`crate::defaults::NOTE_EVENT_ID_OFFSET`] to avoid collisions.
    pub id: i32,
    pub title: String,
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub kind: CalendarEventKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Warehouse-wide statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total_expenses: Decimal,
    pub total_income: Decimal,
    pub total_documents: i64,
    pub top_category: Option<Category>,
    pub total_storage_bytes: i64,
}

/// Per-category storage rollup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryStorage {
    pub category: Category,
    pub count: i64,
    pub total_bytes: i64,
}

/// One day's cash flow within a monthly table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayFlow {
    pub date: NaiveDate,
    pub expenses: Decimal,
    pub income: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_round_trip() {
        for cat in CATEGORIES {
            assert_eq!(Category::parse(cat.as_str()), Some(cat));
        }
    }

    #[test]
    fn test_category_parse_rejects_unknown() {
        assert_eq!(Category::parse("Groceries"), None);
        assert_eq!(Category::parse("finance"), None); // case-sensitive
        assert_eq!(Category::parse(""), None);
    }

    #[test]
    fn test_category_serde_uses_display_names() {
        let json = serde_json::to_string(&Category::IdentityLegal).unwrap();
        assert_eq!(json, "\"Identity/Legal\"");
        let back: Category = serde_json::from_str("\"Career/School\"").unwrap();
        assert_eq!(back, Category::CareerSchool);
    }

    #[test]
    fn test_transaction_type_round_trip() {
        for tx in TRANSACTION_TYPES {
            assert_eq!(TransactionType::parse(tx.as_str()), Some(tx));
        }
        assert_eq!(TransactionType::parse("bogus"), None);
    }

    #[test]
    fn test_transaction_type_serde_lowercase() {
        assert_eq!(
            serde_json::to_string(&TransactionType::Expense).unwrap(),
            "\"expense\""
        );
    }

    #[test]
    fn test_role_parse() {
        assert_eq!(Role::parse("user"), Some(Role::User));
        assert_eq!(Role::parse("assistant"), Some(Role::Assistant));
        assert_eq!(Role::parse("system"), None);
    }

    #[test]
    fn test_document_serializes_camel_case() {
        let doc = Document {
            id: 1,
            file_url: "/uploads/a.pdf".to_string(),
            merchant: "Starbucks".to_string(),
            amount: Decimal::new(1245, 2),
            category: Category::Finance,
            transaction_type: TransactionType::Expense,
            date: NaiveDate::from_ymd_opt(2026, 2, 10).unwrap(),
            due_date: None,
            summary: "Coffee".to_string(),
            insight: "Expense of $12.45 saved in Finance.".to_string(),
            raw_text: None,
            file_size: 45000,
            file_path: None,
            created_at: Utc::now(),
        };
        let v = serde_json::to_value(&doc).unwrap();
        assert_eq!(v["fileUrl"], "/uploads/a.pdf");
        assert_eq!(v["transactionType"], "expense");
        assert_eq!(v["date"], "2026-02-10");
        assert_eq!(v["amount"], "12.45");
    }

    #[test]
    fn test_calendar_event_kind_field_name() {
        let event = CalendarEvent {
            id: 100001,
            title: "Call the bank".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 2, 20).unwrap(),
            kind: CalendarEventKind::Reminder,
            details: None,
        };
        let v = serde_json::to_value(&event).unwrap();
        assert_eq!(v["type"], "reminder");
        assert!(v.get("details").is_none());
    }
}
