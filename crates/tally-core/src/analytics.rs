//! Analytics aggregation engine
//!
//! A pure in-memory reducer over a user's transactions: totals by kind,
//! balance, per-category income/expense breakdown, and the filtered count.
//! It performs no I/O and never fails; degenerate input produces a zeroed
//! summary. Suggestions are merged in by the analytics endpoint, not here.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::models::{Transaction, TransactionKind};

/// Per-category income/expense subtotals
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Default)]
pub struct CategoryTotals {
    pub income: f64,
    pub expense: f64,
}

/// Aggregate view of a filtered transaction set
///
/// Serializes with the wire field names the analytics endpoint promises:
/// `totalIncome`, `totalExpense`, `balance`, `categoryBreakdown`,
/// `transactionCount`.
#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    pub total_income: f64,
    pub total_expense: f64,
    pub balance: f64,
    pub category_breakdown: HashMap<String, CategoryTotals>,
    pub transaction_count: usize,
}

/// Retain transactions whose date falls within `[start, end]` inclusive.
///
/// The filter only applies when BOTH bounds are present; a single bound
/// behaves as no filter at all. That asymmetry matches the analytics
/// endpoint's query contract, where `startDate`/`endDate` are only honored
/// as a pair.
pub fn filter_by_date(
    transactions: Vec<Transaction>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Vec<Transaction> {
    match (start, end) {
        (Some(start), Some(end)) => transactions
            .into_iter()
            .filter(|tx| tx.date >= start && tx.date <= end)
            .collect(),
        _ => transactions,
    }
}

/// Reduce a filtered transaction set to totals, balance, and breakdown.
///
/// Amounts accumulate with plain double-precision addition; rounding for
/// display is the presentation layer's concern. A category appears in the
/// breakdown iff at least one transaction in the set referenced it.
pub fn aggregate(transactions: &[Transaction]) -> AnalyticsSummary {
    let mut total_income = 0.0;
    let mut total_expense = 0.0;
    let mut category_breakdown: HashMap<String, CategoryTotals> = HashMap::new();

    for tx in transactions {
        let totals = category_breakdown.entry(tx.category.clone()).or_default();
        match tx.kind {
            TransactionKind::Income => {
                total_income += tx.amount;
                totals.income += tx.amount;
            }
            TransactionKind::Expense => {
                total_expense += tx.amount;
                totals.expense += tx.amount;
            }
        }
    }

    AnalyticsSummary {
        total_income,
        total_expense,
        balance: total_income - total_expense,
        category_breakdown,
        transaction_count: transactions.len(),
    }
}

/// First and last day of the month containing `today`.
///
/// Used by the admin user listing and the budget `spent` decoration.
pub fn current_month_range(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = NaiveDate::from_ymd_opt(today.year(), today.month(), 1)
        .expect("first of month is always valid");
    let end = if today.month() == 12 {
        NaiveDate::from_ymd_opt(today.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(today.year(), today.month() + 1, 1)
    }
    .expect("first of next month is always valid")
    .pred_opt()
    .expect("last of month is always valid");
    (start, end)
}
