//! Month by month income and expenses for one year.

use rust_decimal::Decimal;
use serde::Serialize;
use time::Month;

use crate::{TransactionType, analytics::balance::TypeCounts, transaction::Transaction};

/// The Spanish name of `month`, as shown to users.
pub fn month_name(month: Month) -> &'static str {
    match month {
        Month::January => "enero",
        Month::February => "febrero",
        Month::March => "marzo",
        Month::April => "abril",
        Month::May => "mayo",
        Month::June => "junio",
        Month::July => "julio",
        Month::August => "agosto",
        Month::September => "septiembre",
        Month::October => "octubre",
        Month::November => "noviembre",
        Month::December => "diciembre",
    }
}

/// Income and expenses for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyTotals {
    /// The month number, 1 to 12.
    pub month: u8,
    pub month_name: &'static str,
    pub income: Decimal,
    pub expense: Decimal,
    pub balance: Decimal,
    pub transaction_count: TypeCounts,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlyTotals {
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub total_balance: Decimal,
}

/// Twelve months of totals for [MonthlyTrend::year].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyTrend {
    /// Always twelve entries, January first.
    pub monthly_data: Vec<MonthlyTotals>,
    pub yearly_totals: YearlyTotals,
    pub year: i32,
}

/// Total the transactions dated in `year` for each month.
///
/// Months without transactions are reported with zeros. When `type_filter` is
/// given only transactions of that type are counted.
pub fn compute_monthly_trend(
    transactions: &[Transaction],
    year: i32,
    type_filter: Option<TransactionType>,
) -> MonthlyTrend {
    let mut monthly_data: Vec<MonthlyTotals> =
        std::iter::successors(Some(Month::January), |month| Some(month.next()))
            .take(12)
            .map(|month| MonthlyTotals {
                month: month as u8,
                month_name: month_name(month),
                income: Decimal::ZERO,
                expense: Decimal::ZERO,
                balance: Decimal::ZERO,
                transaction_count: TypeCounts::default(),
            })
            .collect();

    for transaction in transactions.iter().filter(|transaction| {
        transaction.date.year() == year
            && type_filter.is_none_or(|wanted| transaction.transaction_type == wanted)
    }) {
        let totals = &mut monthly_data[transaction.date.month() as usize - 1];
        match transaction.transaction_type {
            TransactionType::Income => totals.income += transaction.amount,
            TransactionType::Expense => totals.expense += transaction.amount,
        }
        totals.transaction_count.add(transaction.transaction_type);
    }

    let mut yearly_totals = YearlyTotals {
        total_income: Decimal::ZERO,
        total_expense: Decimal::ZERO,
        total_balance: Decimal::ZERO,
    };

    for totals in &mut monthly_data {
        totals.balance = totals.income - totals.expense;
        yearly_totals.total_income += totals.income;
        yearly_totals.total_expense += totals.expense;
        yearly_totals.total_balance += totals.balance;
    }

    MonthlyTrend {
        monthly_data,
        yearly_totals,
        year,
    }
}
