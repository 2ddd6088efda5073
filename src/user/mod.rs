//! Users: the account model, its persistence and the profile/statistics routes.

mod core;
mod db;
mod profile;
mod stats;

pub use core::{User, UserID, validate_email, validate_name};
pub use db::{create_user, create_user_table, get_user_by_email, get_user_by_id, update_user_profile};
pub use profile::{UserData, get_profile, update_profile};
pub use stats::{MonthlyStats, UserStats, get_user_stats};
