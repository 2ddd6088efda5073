//! Categories label income and expense transactions and carry the color and
//! icon shown for them in reports.

mod create;
mod db;
mod delete;
mod domain;
mod edit;
mod list;

pub use create::create_category_endpoint;
pub use db::{
    count_categories, create_category, create_category_table, create_default_categories,
    delete_category, get_categories, get_categories_with_counts, get_category, update_category,
};
pub(crate) use db::map_category_row;
pub use delete::delete_category_endpoint;
pub use domain::{
    Category, CategoryColor, CategoryFormData, CategoryId, CategorySummary, CategoryWithCount,
    DEFAULT_CATEGORIES, DEFAULT_CATEGORY_COLOR, NewCategory,
};
pub use edit::update_category_endpoint;
pub use list::{CategoryData, CategoryState, get_categories_endpoint, get_category_endpoint};
