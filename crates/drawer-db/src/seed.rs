//! First-run seeding with sample documents and notes.
//!
//! Runs at startup and is idempotent: each table is only seeded when it
//! is empty, so restarting the server never duplicates the samples.

use tracing::info;

use drawer_core::{Category, DocumentRepository, NewDocument, NewNote, NoteRepository, Result,
    TransactionType};

use crate::Database;

/// Seed the database with sample data when the tables are empty.
pub async fn seed_database(db: &Database) -> Result<()> {
    let document_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM documents")
        .fetch_one(&db.pool)
        .await?;
    if document_count == 0 {
        for doc in sample_documents() {
            db.documents.insert(doc).await?;
        }
        info!(
            subsystem = "db",
            component = "seed",
            "Database seeded with sample documents"
        );
    }

    let note_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM notes")
        .fetch_one(&db.pool)
        .await?;
    if note_count == 0 {
        for note in sample_notes() {
            db.notes.insert(note).await?;
        }
        info!(
            subsystem = "db",
            component = "seed",
            "Database seeded with sample notes"
        );
    }

    Ok(())
}

fn sample_documents() -> Vec<NewDocument> {
    vec![
        NewDocument {
            file_url: "/uploads/sample-starbucks.pdf".to_string(),
            merchant: "Starbucks".to_string(),
            amount: "12.45".parse().expect("valid amount"),
            category: Category::Finance,
            transaction_type: TransactionType::Expense,
            date: "2026-02-10".parse().expect("valid date"),
            due_date: None,
            summary: "Grande caramel macchiato and a turkey pesto panini at the downtown location."
                .to_string(),
            insight: "Expense of $12.45 saved in Finance.".to_string(),
            raw_text: None,
            file_size: 45000,
            file_path: None,
        },
        NewDocument {
            file_url: "/uploads/sample-comcast.pdf".to_string(),
            merchant: "Comcast".to_string(),
            amount: "89.99".parse().expect("valid amount"),
            category: Category::Home,
            transaction_type: TransactionType::Expense,
            date: "2026-02-01".parse().expect("valid date"),
            due_date: Some("2026-02-20".parse().expect("valid date")),
            summary: "Monthly internet service bill for 200Mbps plan.".to_string(),
            insight: "Reminder: Payment due on 2026-02-20 (5 days away).".to_string(),
            raw_text: None,
            file_size: 38000,
            file_path: None,
        },
        NewDocument {
            file_url: "/uploads/sample-amazon.pdf".to_string(),
            merchant: "Amazon".to_string(),
            amount: "156.78".parse().expect("valid amount"),
            category: Category::Finance,
            transaction_type: TransactionType::Expense,
            date: "2026-02-08".parse().expect("valid date"),
            due_date: None,
            summary: "Wireless earbuds and a phone charging cable purchased online.".to_string(),
            insight: "Expense of $156.78 saved in Finance.".to_string(),
            raw_text: None,
            file_size: 52000,
            file_path: None,
        },
        NewDocument {
            file_url: "/uploads/sample-paycheck.pdf".to_string(),
            merchant: "Acme Corporation".to_string(),
            amount: "2500.00".parse().expect("valid amount"),
            category: Category::Finance,
            transaction_type: TransactionType::Income,
            date: "2026-02-14".parse().expect("valid date"),
            due_date: None,
            summary: "Bi-weekly pay stub from Acme Corporation, net pay $2,500.".to_string(),
            insight: "Income of $2,500.00 recorded in Finance.".to_string(),
            raw_text: None,
            file_size: 67000,
            file_path: None,
        },
        NewDocument {
            file_url: "/uploads/sample-w2.pdf".to_string(),
            merchant: "Acme Corporation".to_string(),
            amount: "0.00".parse().expect("valid amount"),
            category: Category::Finance,
            transaction_type: TransactionType::Record,
            date: "2024-12-31".parse().expect("valid date"),
            due_date: None,
            summary: "W-2 wage statement from Acme Corporation for tax year 2024.".to_string(),
            insight: "Filed as a record in Finance.".to_string(),
            raw_text: None,
            file_size: 41000,
            file_path: None,
        },
    ]
}

fn sample_notes() -> Vec<NewNote> {
    vec![
        NewNote {
            content: "Pay electricity bill - check if rate increased this month".to_string(),
            reminder_date: Some("2026-02-28".parse().expect("valid date")),
            reminder_time: Some("09:00".to_string()),
            is_completed: false,
        },
        NewNote {
            content: "Review annual subscription renewals for Netflix and Spotify".to_string(),
            reminder_date: Some("2026-02-26".parse().expect("valid date")),
            reminder_time: Some("10:00".to_string()),
            is_completed: false,
        },
        NewNote {
            content: "Compare car insurance quotes before renewal on March 15th".to_string(),
            reminder_date: Some("2026-03-01".parse().expect("valid date")),
            reminder_time: None,
            is_completed: false,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_sample_documents_satisfy_invariants() {
        let docs = sample_documents();
        assert_eq!(docs.len(), 5);
        for doc in &docs {
            assert!(doc.amount >= Decimal::ZERO);
            if doc.transaction_type == TransactionType::Record {
                assert_eq!(doc.amount, Decimal::ZERO);
            }
        }
    }

    #[test]
    fn test_sample_documents_include_a_due_date_bill() {
        let docs = sample_documents();
        let comcast = docs.iter().find(|d| d.merchant == "Comcast").unwrap();
        assert_eq!(
            comcast.due_date,
            Some("2026-02-20".parse().unwrap())
        );
    }

    #[test]
    fn test_sample_notes() {
        let notes = sample_notes();
        assert_eq!(notes.len(), 3);
        assert!(notes.iter().all(|n| !n.content.is_empty()));
        assert!(notes.iter().all(|n| !n.is_completed));
    }
}
