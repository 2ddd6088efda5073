//! Income, expense and balance totals over a date window.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::{TransactionType, transaction::Transaction, window::DateWindow};

/// The number of transactions of each type.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TypeCounts {
    pub income: u64,
    pub expense: u64,
}

impl TypeCounts {
    pub(super) fn add(&mut self, transaction_type: TransactionType) {
        match transaction_type {
            TransactionType::Income => self.income += 1,
            TransactionType::Expense => self.expense += 1,
        }
    }
}

/// Totals of the transactions in [BalanceSummary::period].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceSummary {
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    /// `total_income - total_expenses`.
    pub balance: Decimal,
    pub transaction_count: TypeCounts,
    pub period: DateWindow,
}

/// Sum the income and expenses of the transactions dated within `window`.
///
/// Transactions outside `window` are ignored.
pub fn compute_balance(transactions: &[Transaction], window: DateWindow) -> BalanceSummary {
    let mut total_income = Decimal::ZERO;
    let mut total_expenses = Decimal::ZERO;
    let mut transaction_count = TypeCounts::default();

    for transaction in transactions
        .iter()
        .filter(|transaction| window.contains(transaction.date))
    {
        match transaction.transaction_type {
            TransactionType::Income => total_income += transaction.amount,
            TransactionType::Expense => total_expenses += transaction.amount,
        }
        transaction_count.add(transaction.transaction_type);
    }

    BalanceSummary {
        total_income,
        total_expenses,
        balance: total_income - total_expenses,
        transaction_count,
        period: window,
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use time::macros::date;

    use crate::{
        TransactionType,
        analytics::test_transaction,
        window::DateWindow,
    };

    use super::{TypeCounts, compute_balance};

    const JANUARY: DateWindow = DateWindow {
        start_date: date!(2025 - 01 - 01),
        end_date: date!(2025 - 01 - 31),
    };

    #[test]
    fn income_minus_expenses() {
        let transactions = [
            test_transaction(dec!(100), TransactionType::Income, date!(2025 - 01 - 05)),
            test_transaction(dec!(40), TransactionType::Expense, date!(2025 - 01 - 06)),
            test_transaction(dec!(10), TransactionType::Expense, date!(2025 - 01 - 07)),
        ];

        let got = compute_balance(&transactions, JANUARY);

        assert_eq!(got.total_income, dec!(100));
        assert_eq!(got.total_expenses, dec!(50));
        assert_eq!(got.balance, dec!(50));
        assert_eq!(
            got.transaction_count,
            TypeCounts {
                income: 1,
                expense: 2
            }
        );
    }

    #[test]
    fn balance_is_exact_for_cents() {
        let transactions = [
            test_transaction(dec!(0.10), TransactionType::Income, date!(2025 - 01 - 01)),
            test_transaction(dec!(0.20), TransactionType::Income, date!(2025 - 01 - 01)),
            test_transaction(dec!(0.30), TransactionType::Expense, date!(2025 - 01 - 31)),
        ];

        let got = compute_balance(&transactions, JANUARY);

        assert_eq!(got.balance, Decimal::ZERO);
        assert_eq!(got.balance, got.total_income - got.total_expenses);
    }

    #[test]
    fn ignores_transactions_outside_window() {
        let transactions = [
            test_transaction(dec!(100), TransactionType::Income, date!(2024 - 12 - 31)),
            test_transaction(dec!(100), TransactionType::Income, date!(2025 - 02 - 01)),
        ];

        let got = compute_balance(&transactions, JANUARY);

        assert_eq!(got.total_income, Decimal::ZERO);
        assert_eq!(got.transaction_count, TypeCounts::default());
        assert_eq!(got.period, JANUARY);
    }

    #[test]
    fn empty_input_gives_zeros() {
        let got = compute_balance(&[], JANUARY);

        assert_eq!(got.total_income, Decimal::ZERO);
        assert_eq!(got.total_expenses, Decimal::ZERO);
        assert_eq!(got.balance, Decimal::ZERO);
    }
}
