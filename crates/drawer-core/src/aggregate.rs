//! Aggregation engine: exact, reproducible read-side rollups over the
//! full document/note collections.
//!
//! Nothing here caches — every call recomputes from the collections it
//! is handed, so results always reflect current store state. All
//! functions are pure and deterministic.

use chrono::{Datelike, Duration, NaiveDate};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::defaults::{NOTE_EVENT_ID_OFFSET, REMINDER_TITLE_LEN};
use crate::fmt::money;
use crate::models::{
    CalendarEvent, CalendarEventKind, Category, CategoryStorage, DayFlow, Document, Note, Stats,
    TransactionType,
};

/// Warehouse-wide statistics.
///
/// `top_category` is the category with the largest summed file size;
/// ties resolve to the category first encountered in collection order,
/// and an empty collection yields `None`.
pub fn stats(docs: &[Document]) -> Stats {
    let total_expenses = sum_amounts(docs, TransactionType::Expense);
    let total_income = sum_amounts(docs, TransactionType::Income);
    let total_storage_bytes = docs.iter().map(|d| d.file_size as i64).sum();

    // Stable descending sort, so byte-total ties resolve to the category
    // first encountered in collection order.
    let mut by_category = category_rollup(docs);
    by_category.sort_by(|a, b| b.total_bytes.cmp(&a.total_bytes));
    let top_category = by_category.first().map(|entry| entry.category);

    Stats {
        total_expenses,
        total_income,
        total_documents: docs.len() as i64,
        top_category,
        total_storage_bytes,
    }
}

/// Per-category storage rollup, sorted descending by total bytes.
///
/// Categories with equal byte totals keep their first-encountered order.
pub fn storage_by_category(docs: &[Document]) -> Vec<CategoryStorage> {
    let mut rollup = category_rollup(docs);
    // Stable sort: insertion order survives byte-total ties.
    rollup.sort_by(|a, b| b.total_bytes.cmp(&a.total_bytes));
    rollup
}

/// Accumulate {count, bytes} per category in first-encountered order.
fn category_rollup(docs: &[Document]) -> Vec<CategoryStorage> {
    let mut rollup: Vec<CategoryStorage> = Vec::new();
    for doc in docs {
        match rollup.iter_mut().find(|e| e.category == doc.category) {
            Some(entry) => {
                entry.count += 1;
                entry.total_bytes += doc.file_size as i64;
            }
            None => rollup.push(CategoryStorage {
                category: doc.category,
                count: 1,
                total_bytes: doc.file_size as i64,
            }),
        }
    }
    rollup
}

/// Per-day cash flow for one calendar month.
///
/// Every day of the month gets a zero-initialized bucket (the last-day
/// arithmetic is correct for 28/29/30/31-day months); documents dated
/// within the month accumulate into their day's bucket by transaction
/// type. A document whose date somehow misses the pre-seeded table still
/// lands in a fresh bucket rather than being dropped. Result is sorted
/// ascending by date.
///
/// An unrepresentable year/month yields an empty table.
pub fn monthly_flow(docs: &[Document], year: i32, month: u32) -> Vec<DayFlow> {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return Vec::new();
    };
    let first_of_next = match month {
        12 => NaiveDate::from_ymd_opt(year + 1, 1, 1),
        _ => NaiveDate::from_ymd_opt(year, month + 1, 1),
    }
    .expect("month arithmetic stays in range");
    let last = first_of_next - Duration::days(1);

    let mut table: BTreeMap<NaiveDate, (Decimal, Decimal)> = BTreeMap::new();
    for day in 1..=last.day() {
        let date = first.with_day(day).expect("day within month");
        table.insert(date, (Decimal::ZERO, Decimal::ZERO));
    }

    for doc in docs.iter().filter(|d| d.date >= first && d.date <= last) {
        let bucket = table.entry(doc.date).or_insert((Decimal::ZERO, Decimal::ZERO));
        match doc.transaction_type {
            TransactionType::Expense => bucket.0 += doc.amount,
            TransactionType::Income => bucket.1 += doc.amount,
            TransactionType::Record => {}
        }
    }

    table
        .into_iter()
        .map(|(date, (expenses, income))| DayFlow {
            date,
            expenses,
            income,
        })
        .collect()
}

/// Unified calendar feed over an inclusive date range.
///
/// Bills come from document due dates, reminders from note reminder
/// dates; reminder ids are offset so the two series never collide in one
/// result set. The sort is stable ascending by date, so same-date events
/// keep bills-then-reminders source order.
pub fn calendar_events(
    docs: &[Document],
    notes: &[Note],
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<CalendarEvent> {
    let mut events: Vec<CalendarEvent> = Vec::new();

    for doc in docs {
        if let Some(due) = doc.due_date.filter(|d| *d >= start && *d <= end) {
            events.push(CalendarEvent {
                id: doc.id,
                title: format!("{} - ${}", doc.merchant, money(doc.amount)),
                date: due,
                kind: CalendarEventKind::Bill,
                details: Some(doc.summary.clone()),
            });
        }
    }

    for note in notes {
        if let Some(date) = note.reminder_date.filter(|d| *d >= start && *d <= end) {
            events.push(CalendarEvent {
                id: note.id + NOTE_EVENT_ID_OFFSET,
                title: truncate_title(&note.content),
                date,
                kind: CalendarEventKind::Reminder,
                details: Some(note.content.clone()),
            });
        }
    }

    events.sort_by_key(|e| e.date);
    events
}

fn truncate_title(content: &str) -> String {
    if content.chars().count() > REMINDER_TITLE_LEN {
        let truncated: String = content.chars().take(REMINDER_TITLE_LEN).collect();
        format!("{}...", truncated)
    } else {
        content.to_string()
    }
}

fn sum_amounts(docs: &[Document], transaction_type: TransactionType) -> Decimal {
    docs.iter()
        .filter(|d| d.transaction_type == transaction_type)
        .map(|d| d.amount)
        .sum()
}
