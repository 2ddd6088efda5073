//! Totals per category and type over a date window.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::{
    TransactionType,
    category::{Category, CategoryId},
    money::percentage,
    transaction::Transaction,
    window::DateWindow,
};

/// The name reported for transactions without a known category.
pub const UNCATEGORIZED_NAME: &str = "Sin categoría";

/// The color reported for transactions without a known category.
pub const UNCATEGORIZED_COLOR: &str = "#6B7280";

/// The total for one category and transaction type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBreakdownItem {
    pub category_id: Option<CategoryId>,
    pub category_name: String,
    pub category_color: String,
    pub category_icon: Option<String>,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub amount: Decimal,
    pub transaction_count: u64,
    /// This item's share of [CategoryBreakdown::total_amount], 0 when the total is 0.
    pub percentage: f64,
}

/// Category totals, largest first.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBreakdown {
    pub categories: Vec<CategoryBreakdownItem>,
    pub total_amount: Decimal,
    pub period: DateWindow,
}

/// Group the transactions in `window` by category and type.
///
/// `categories` supplies the name, color and icon for each group. Groups whose
/// category is missing or unknown are labelled [UNCATEGORIZED_NAME]. Items are
/// sorted by amount, largest first, and groups with equal amounts keep the
/// order in which they were first seen.
pub fn compute_category_breakdown(
    transactions: &[Transaction],
    categories: &[Category],
    type_filter: Option<TransactionType>,
    window: DateWindow,
) -> CategoryBreakdown {
    let mut group_index: HashMap<(Option<CategoryId>, TransactionType), usize> = HashMap::new();
    let mut groups: Vec<(Option<CategoryId>, TransactionType, Decimal, u64)> = Vec::new();

    for transaction in transactions.iter().filter(|transaction| {
        window.contains(transaction.date)
            && type_filter.is_none_or(|wanted| transaction.transaction_type == wanted)
    }) {
        let key = (transaction.category_id, transaction.transaction_type);
        let index = *group_index.entry(key).or_insert_with(|| {
            groups.push((key.0, key.1, Decimal::ZERO, 0));
            groups.len() - 1
        });

        let group = &mut groups[index];
        group.2 += transaction.amount;
        group.3 += 1;
    }

    let total_amount: Decimal = groups.iter().map(|group| group.2).sum();
    let categories_by_id: HashMap<CategoryId, &Category> = categories
        .iter()
        .map(|category| (category.id, category))
        .collect();

    let mut items: Vec<CategoryBreakdownItem> = groups
        .into_iter()
        .map(|(category_id, transaction_type, amount, transaction_count)| {
            let category = category_id.and_then(|id| categories_by_id.get(&id));
            let (category_name, category_color, category_icon) = match category {
                Some(category) => (
                    category.name.clone(),
                    category.color.to_string(),
                    category.icon.clone(),
                ),
                None => (
                    UNCATEGORIZED_NAME.to_owned(),
                    UNCATEGORIZED_COLOR.to_owned(),
                    None,
                ),
            };

            CategoryBreakdownItem {
                category_id,
                category_name,
                category_color,
                category_icon,
                transaction_type,
                amount,
                transaction_count,
                percentage: percentage(amount, total_amount),
            }
        })
        .collect();

    items.sort_by(|a, b| b.amount.cmp(&a.amount));

    CategoryBreakdown {
        categories: items,
        total_amount,
        period: window,
    }
}
