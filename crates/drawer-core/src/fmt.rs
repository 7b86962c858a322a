//! Display formatting conventions for derived text.
//!
//! Monetary values always render with exactly two decimal places;
//! percentages render as whole numbers. These conventions are part of the
//! insight/RAG text contract, not cosmetic.

use rust_decimal::{Decimal, RoundingStrategy};

/// Render a monetary amount with exactly two decimal places (no symbol).
pub fn money(amount: Decimal) -> String {
    format!(
        "{:.2}",
        amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    )
}

/// Render a percentage magnitude as a whole number, ties away from zero.
pub fn whole_percent(pct: Decimal) -> String {
    pct.abs()
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_string()
}
