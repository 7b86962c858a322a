//! RAG context builder.
//!
//! Serializes the full document/note corpus plus a computed financial
//! summary into one deterministic text block. This block is the entire
//! evidentiary basis handed to the conversational layer, so it must be
//! exhaustive (every document's raw text included) and exact (no
//! rounding beyond the 2-decimal display convention).

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::HashSet;
use std::fmt::Write;

use crate::fmt::money;
use crate::models::{Document, Note, TransactionType};

/// Build the deterministic RAG context for the conversational layer.
///
/// Output layout, in order: system preamble with `today`, one block per
/// document (facts line, summary, full raw text), the notes listing
/// (omitted entirely when there are no notes), and the financial summary
/// with totals, counts, and distinct category/merchant lists in
/// first-occurrence order.
pub fn build_rag_context(docs: &[Document], notes: &[Note], today: NaiveDate) -> String {
    let expenses: Vec<&Document> = docs
        .iter()
        .filter(|d| d.transaction_type == TransactionType::Expense)
        .collect();
    let incomes: Vec<&Document> = docs
        .iter()
        .filter(|d| d.transaction_type == TransactionType::Income)
        .collect();
    let record_count = docs
        .iter()
        .filter(|d| d.transaction_type == TransactionType::Record)
        .count();

    let total_expenses: Decimal = expenses.iter().map(|d| d.amount).sum();
    let total_income: Decimal = incomes.iter().map(|d| d.amount).sum();

    let mut context = format!(
        "You are Drawer, an intelligent AI assistant for a personal data warehouse application.\n\
         You have access to all the user's stored documents and notes. Answer questions using ONLY the data below - be specific and precise.\n\
         \n\
         Today's date is {}.\n\
         \n\
         === STORED DOCUMENTS ({} total) ===\n",
        today,
        docs.len()
    );

    for doc in docs {
        let _ = write!(
            context,
            "\n--- Document #{}: {} [{}] ---\n",
            doc.id, doc.merchant, doc.transaction_type
        );
        let _ = write!(
            context,
            "Category: {} | Type: {} | Amount: ${} | Date: {}",
            doc.category,
            doc.transaction_type,
            money(doc.amount),
            doc.date
        );
        if let Some(due) = doc.due_date {
            let _ = write!(context, " | Due: {}", due);
        }
        if !doc.file_url.is_empty() {
            let _ = write!(context, " | Download: {}", doc.file_url);
        }
        let _ = write!(context, "\nSummary: {}\n", doc.summary);
        if let Some(raw_text) = doc.raw_text.as_deref().filter(|t| !t.is_empty()) {
            let _ = write!(context, "Full extracted text:\n{}\n", raw_text);
        }
    }

    if !notes.is_empty() {
        let _ = write!(context, "\n=== NOTES & REMINDERS ({} total) ===\n", notes.len());
        for note in notes {
            let _ = write!(context, "- Note #{}: \"{}\"", note.id, note.content);
            if let Some(date) = note.reminder_date {
                let _ = write!(context, " (Reminder: {}", date);
                if let Some(time) = note.reminder_time.as_deref() {
                    let _ = write!(context, " at {}", time);
                }
                let _ = write!(context, ")");
            }
            context.push('\n');
        }
    }

    let _ = write!(
        context,
        "\n=== FINANCIAL SUMMARY ===\n\
         - Total expenses: ${} ({} expense documents)\n\
         - Total income: ${} ({} income documents)\n\
         - Net: ${}\n\
         - Records (informational, not counted): {} documents\n\
         - Total documents: {}\n\
         - Total notes: {}\n\
         - Categories: {}\n\
         - Merchants: {}\n",
        money(total_expenses),
        expenses.len(),
        money(total_income),
        incomes.len(),
        money(total_income - total_expenses),
        record_count,
        docs.len(),
        notes.len(),
        distinct_or_none(docs.iter().map(|d| d.category.as_str().to_string())),
        distinct_or_none(docs.iter().map(|d| d.merchant.clone())),
    );

    context
}

/// Join distinct values in first-occurrence order; "none" when empty.
fn distinct_or_none(values: impl Iterator<Item = String>) -> String {
    let mut seen = HashSet::new();
    let mut ordered = Vec::new();
    for value in values {
        if seen.insert(value.clone()) {
            ordered.push(value);
        }
    }
    if ordered.is_empty() {
        "none".to_string()
    } else {
        ordered.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;
    use chrono::Utc;

    fn doc(
        id: i32,
        merchant: &str,
        amount: &str,
        category: Category,
        tx: TransactionType,
    ) -> Document {
        Document {
            id,
            file_url: format!("/uploads/doc-{}.pdf", id),
            merchant: merchant.to_string(),
            amount: amount.parse().unwrap(),
            category,
            transaction_type: tx,
            date: "2026-02-10".parse().unwrap(),
            due_date: None,
            summary: format!("Summary for {}", merchant),
            insight: String::new(),
            raw_text: Some(format!("RAW TEXT {}", id)),
            file_size: 1000,
            file_path: None,
            created_at: Utc::now(),
        }
    }

    fn note(id: i32, content: &str, reminder_date: Option<&str>, time: Option<&str>) -> Note {
        Note {
            id,
            content: content.to_string(),
            reminder_date: reminder_date.map(|d| d.parse().unwrap()),
            reminder_time: time.map(|t| t.to_string()),
            is_completed: false,
            created_at: Utc::now(),
        }
    }

    fn today() -> NaiveDate {
        "2026-02-15".parse().unwrap()
    }

    #[test]
    fn test_context_contains_every_section() {
        let docs = vec![
            doc(1, "Starbucks", "12.45", Category::Finance, TransactionType::Expense),
            doc(2, "Acme Corp", "2500.00", Category::Finance, TransactionType::Income),
        ];
        let notes = vec![note(1, "Pay electricity bill", Some("2026-02-28"), Some("09:00"))];
        let ctx = build_rag_context(&docs, &notes, today());

        assert!(ctx.contains("Today's date is 2026-02-15."));
        assert!(ctx.contains("=== STORED DOCUMENTS (2 total) ==="));
        assert!(ctx.contains("--- Document #1: Starbucks [expense] ---"));
        assert!(ctx.contains("Amount: $12.45"));
        assert!(ctx.contains("Download: /uploads/doc-1.pdf"));
        assert!(ctx.contains("Full extracted text:\nRAW TEXT 1"));
        assert!(ctx.contains("=== NOTES & REMINDERS (1 total) ==="));
        assert!(ctx.contains("- Note #1: \"Pay electricity bill\" (Reminder: 2026-02-28 at 09:00)"));
        assert!(ctx.contains("=== FINANCIAL SUMMARY ==="));
    }

    #[test]
    fn test_financial_summary_arithmetic() {
        let docs = vec![
            doc(1, "Starbucks", "12.45", Category::Finance, TransactionType::Expense),
            doc(2, "Comcast", "89.99", Category::Home, TransactionType::Expense),
            doc(3, "Acme Corp", "2500.00", Category::Finance, TransactionType::Income),
            doc(4, "Acme Corp", "0.00", Category::Finance, TransactionType::Record),
        ];
        let ctx = build_rag_context(&docs, &[], today());

        assert!(ctx.contains("- Total expenses: $102.44 (2 expense documents)"));
        assert!(ctx.contains("- Total income: $2500.00 (1 income documents)"));
        assert!(ctx.contains("- Net: $2397.56"));
        assert!(ctx.contains("- Records (informational, not counted): 1 documents"));
        assert!(ctx.contains("- Total documents: 4"));
    }

    #[test]
    fn test_distinct_lists_keep_first_occurrence_order() {
        let docs = vec![
            doc(1, "Comcast", "89.99", Category::Home, TransactionType::Expense),
            doc(2, "Starbucks", "12.45", Category::Finance, TransactionType::Expense),
            doc(3, "Comcast", "89.99", Category::Home, TransactionType::Expense),
        ];
        let ctx = build_rag_context(&docs, &[], today());

        assert!(ctx.contains("- Categories: Home, Finance\n"));
        assert!(ctx.contains("- Merchants: Comcast, Starbucks\n"));
    }

    #[test]
    fn test_empty_corpus_reports_none() {
        let ctx = build_rag_context(&[], &[], today());
        assert!(ctx.contains("=== STORED DOCUMENTS (0 total) ==="));
        assert!(!ctx.contains("NOTES & REMINDERS"));
        assert!(ctx.contains("- Categories: none\n"));
        assert!(ctx.contains("- Merchants: none\n"));
        assert!(ctx.contains("- Net: $0.00"));
    }

    #[test]
    fn test_due_date_rendered_when_present() {
        let mut d = doc(1, "Comcast", "89.99", Category::Home, TransactionType::Expense);
        d.due_date = Some("2026-02-20".parse().unwrap());
        let ctx = build_rag_context(&[d], &[], today());
        assert!(ctx.contains(" | Due: 2026-02-20"));
    }

    #[test]
    fn test_note_without_reminder_has_no_parenthetical() {
        let notes = vec![note(7, "Just a thought", None, None)];
        let ctx = build_rag_context(&[], &notes, today());
        assert!(ctx.contains("- Note #7: \"Just a thought\"\n"));
        assert!(!ctx.contains("Reminder:"));
    }
}
