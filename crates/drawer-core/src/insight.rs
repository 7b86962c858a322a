//! Insight generator: a single derived sentence comparing a new document
//! against prior history.
//!
//! Pure function of its inputs; `today` is injected rather than read from
//! the clock. The comparative branches carry an asymmetric dead zone:
//! any positive change produces an alert, while decreases only do so
//! below −5%. That asymmetry is a fixed contract — small savings are
//! deliberately not reported.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::defaults::{DECREASE_ALERT_THRESHOLD_PCT, DUE_SOON_DAYS};
use crate::fmt::{money, whole_percent};
use crate::models::{Category, TransactionType};

fn decrease_threshold() -> Decimal {
    Decimal::from(DECREASE_ALERT_THRESHOLD_PCT)
}

/// Generate the insight sentence for a newly extracted document.
///
/// Decision order, first match wins:
/// 1. record → filed line
/// 2. income vs. previous deposit (percent change), else generic income
/// 3. expense vs. previous purchase (percent change)
/// 4. expense due-date proximity (upcoming within 7 days, or overdue)
/// 5. generic expense line
pub fn generate_insight(
    current_amount: Decimal,
    previous_amount: Option<Decimal>,
    due_date: Option<NaiveDate>,
    category: Category,
    transaction_type: TransactionType,
    today: NaiveDate,
) -> String {
    if transaction_type == TransactionType::Record {
        return format!("Filed as a record in {}.", category);
    }

    if transaction_type == TransactionType::Income {
        if let Some(previous) = previous_amount.filter(|p| *p > Decimal::ZERO) {
            let diff = percent_change(current_amount, previous);
            if diff > Decimal::ZERO {
                return format!(
                    "Income is {}% higher than your last deposit (${}).",
                    whole_percent(diff),
                    money(previous)
                );
            } else if diff < decrease_threshold() {
                return format!(
                    "Income is {}% lower than your last deposit (${}).",
                    whole_percent(diff),
                    money(previous)
                );
            }
        }
        return format!(
            "Income of ${} recorded in {}.",
            money(current_amount),
            category
        );
    }

    if let Some(previous) = previous_amount.filter(|p| *p > Decimal::ZERO) {
        let diff = percent_change(current_amount, previous);
        if diff > Decimal::ZERO {
            return format!(
                "Alert: This is {}% more expensive than your last similar purchase (${}).",
                whole_percent(diff),
                money(previous)
            );
        } else if diff < decrease_threshold() {
            return format!(
                "Great news! This is {}% less than your last similar purchase (${}).",
                whole_percent(diff),
                money(previous)
            );
        }
    }

    if let Some(due) = due_date {
        let days_until_due = (due - today).num_days();
        if (0..=DUE_SOON_DAYS).contains(&days_until_due) {
            return format!(
                "Reminder: Payment due on {} ({} days away).",
                due, days_until_due
            );
        }
        if days_until_due < 0 {
            return format!(
                "Alert: This payment was due on {} ({} days overdue).",
                due,
                days_until_due.abs()
            );
        }
    }

    format!(
        "Expense of ${} saved in {}.",
        money(current_amount),
        category
    )
}

fn percent_change(current: Decimal, previous: Decimal) -> Decimal {
    (current - previous) / previous * Decimal::ONE_HUNDRED
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn day(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_record_is_filed() {
        let insight = generate_insight(
            Decimal::ZERO,
            Some(d("100")),
            None,
            Category::Finance,
            TransactionType::Record,
            day("2025-01-01"),
        );
        assert_eq!(insight, "Filed as a record in Finance.");
    }

    #[test]
    fn test_expense_doubled_since_last_purchase() {
        let insight = generate_insight(
            d("100"),
            Some(d("50")),
            None,
            Category::Finance,
            TransactionType::Expense,
            day("2025-01-01"),
        );
        assert!(insight.contains("100% more expensive"), "{}", insight);
        assert!(insight.contains("$50.00"), "{}", insight);
    }

    #[test]
    fn test_expense_cheaper_beyond_dead_zone() {
        let insight = generate_insight(
            d("50"),
            Some(d("100")),
            None,
            Category::Home,
            TransactionType::Expense,
            day("2025-01-01"),
        );
        assert_eq!(
            insight,
            "Great news! This is 50% less than your last similar purchase ($100.00)."
        );
    }

    #[test]
    fn test_expense_dead_zone_falls_through_to_generic() {
        // −3% sits inside the (−5%, 0%] dead zone: no comparative line.
        let insight = generate_insight(
            d("97"),
            Some(d("100")),
            None,
            Category::Finance,
            TransactionType::Expense,
            day("2025-01-01"),
        );
        assert_eq!(insight, "Expense of $97.00 saved in Finance.");
    }

    #[test]
    fn test_expense_any_increase_alerts() {
        // +1% is outside the dead zone: increases always alert.
        let insight = generate_insight(
            d("101"),
            Some(d("100")),
            None,
            Category::Finance,
            TransactionType::Expense,
            day("2025-01-01"),
        );
        assert!(insight.contains("1% more expensive"), "{}", insight);
    }

    #[test]
    fn test_income_higher_than_last_deposit() {
        let insight = generate_insight(
            d("3000"),
            Some(d("2500")),
            None,
            Category::Finance,
            TransactionType::Income,
            day("2025-01-01"),
        );
        assert_eq!(
            insight,
            "Income is 20% higher than your last deposit ($2500.00)."
        );
    }

    #[test]
    fn test_income_dead_zone_uses_generic_line() {
        let insight = generate_insight(
            d("2450"),
            Some(d("2500")),
            None,
            Category::Finance,
            TransactionType::Income,
            day("2025-01-01"),
        );
        assert_eq!(insight, "Income of $2450.00 recorded in Finance.");
    }

    #[test]
    fn test_income_without_history() {
        let insight = generate_insight(
            d("800"),
            None,
            None,
            Category::CareerSchool,
            TransactionType::Income,
            day("2025-01-01"),
        );
        assert_eq!(insight, "Income of $800.00 recorded in Career/School.");
    }

    #[test]
    fn test_due_date_four_days_away() {
        let insight = generate_insight(
            d("100"),
            None,
            Some(day("2025-01-05")),
            Category::Finance,
            TransactionType::Expense,
            day("2025-01-01"),
        );
        assert!(insight.contains("4 days away"), "{}", insight);
        assert!(insight.contains("2025-01-05"), "{}", insight);
    }

    #[test]
    fn test_due_today_counts_as_upcoming() {
        let insight = generate_insight(
            d("100"),
            None,
            Some(day("2025-01-01")),
            Category::Finance,
            TransactionType::Expense,
            day("2025-01-01"),
        );
        assert!(insight.contains("0 days away"), "{}", insight);
    }

    #[test]
    fn test_overdue_payment_alerts() {
        let insight = generate_insight(
            d("100"),
            None,
            Some(day("2024-12-29")),
            Category::Home,
            TransactionType::Expense,
            day("2025-01-01"),
        );
        assert_eq!(
            insight,
            "Alert: This payment was due on 2024-12-29 (3 days overdue)."
        );
    }

    #[test]
    fn test_far_future_due_date_falls_through() {
        let insight = generate_insight(
            d("89.99"),
            None,
            Some(day("2025-03-01")),
            Category::Home,
            TransactionType::Expense,
            day("2025-01-01"),
        );
        assert_eq!(insight, "Expense of $89.99 saved in Home.");
    }

    #[test]
    fn test_previous_amount_beats_due_date() {
        // History comparison precedes due-date proximity.
        let insight = generate_insight(
            d("100"),
            Some(d("50")),
            Some(day("2025-01-03")),
            Category::Finance,
            TransactionType::Expense,
            day("2025-01-01"),
        );
        assert!(insight.contains("more expensive"), "{}", insight);
    }

    #[test]
    fn test_zero_previous_amount_is_ignored() {
        let insight = generate_insight(
            d("100"),
            Some(Decimal::ZERO),
            None,
            Category::Finance,
            TransactionType::Expense,
            day("2025-01-01"),
        );
        assert_eq!(insight, "Expense of $100.00 saved in Finance.");
    }

    #[test]
    fn test_percent_rounds_to_whole_number() {
        // (130 - 120) / 120 * 100 = 8.33…% → "8%"
        let insight = generate_insight(
            d("130"),
            Some(d("120")),
            None,
            Category::Finance,
            TransactionType::Expense,
            day("2025-01-01"),
        );
        assert!(insight.contains("8% more expensive"), "{}", insight);
    }
}
