//! Budgeted against actual spending for one month.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::{
    TransactionType,
    budget::BudgetWithCategory,
    category::CategoryId,
    money::percentage,
    transaction::Transaction,
};

/// A budget with the money spent against it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetActual {
    #[serde(flatten)]
    pub budget: BudgetWithCategory,
    pub actual_spent: Decimal,
    /// May be negative when the budget is exceeded.
    pub remaining: Decimal,
    /// Spending as a percentage of the budget, at most 100.
    pub percentage_used: f64,
    /// Compares the amounts directly, so it stays true past 100%.
    pub is_over_budget: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetSummary {
    pub total_budget: Decimal,
    /// All expenses in the month, including those in categories without a budget.
    pub total_spent: Decimal,
    pub total_remaining: Decimal,
    /// Not capped, unlike [BudgetActual::percentage_used].
    pub percentage_used: f64,
    pub month: u8,
    pub year: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetReport {
    pub budgets: Vec<BudgetActual>,
    pub summary: BudgetSummary,
}

/// Compare each budget for `month` of `year` with the expenses recorded in its
/// category that month.
///
/// Transactions from other months and income are ignored.
pub fn compute_budget_actuals(
    budgets: &[BudgetWithCategory],
    transactions: &[Transaction],
    month: u8,
    year: i32,
) -> BudgetReport {
    let mut spent_by_category: HashMap<Option<CategoryId>, Decimal> = HashMap::new();
    let mut total_spent = Decimal::ZERO;

    for transaction in transactions.iter().filter(|transaction| {
        transaction.transaction_type == TransactionType::Expense
            && transaction.date.year() == year
            && transaction.date.month() as u8 == month
    }) {
        *spent_by_category
            .entry(transaction.category_id)
            .or_insert(Decimal::ZERO) += transaction.amount;
        total_spent += transaction.amount;
    }

    let budget_actuals: Vec<BudgetActual> = budgets
        .iter()
        .map(|budget| {
            let budget_amount = budget.budget.budget_amount;
            let actual_spent = spent_by_category
                .get(&Some(budget.budget.category_id))
                .copied()
                .unwrap_or(Decimal::ZERO);

            BudgetActual {
                budget: budget.clone(),
                actual_spent,
                remaining: budget_amount - actual_spent,
                percentage_used: percentage(actual_spent, budget_amount).min(100.0),
                is_over_budget: actual_spent > budget_amount,
            }
        })
        .collect();

    let total_budget: Decimal = budgets
        .iter()
        .map(|budget| budget.budget.budget_amount)
        .sum();

    BudgetReport {
        budgets: budget_actuals,
        summary: BudgetSummary {
            total_budget,
            total_spent,
            total_remaining: total_budget - total_spent,
            percentage_used: percentage(total_spent, total_budget),
            month,
            year,
        },
    }
}
