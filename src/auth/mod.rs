//! Authentication: password hashing, access tokens and the routes for
//! registering and logging in.

mod log_in;
mod middleware;
mod password;
mod register;
mod token;

pub use log_in::{get_verify_token, post_log_in};
pub use middleware::{AuthState, auth_guard};
pub use password::{MIN_PASSWORD_LENGTH, PasswordHash, ValidatedPassword};
pub use register::{AuthenticatedUser, register_user};
pub use token::{Claims, DEFAULT_TOKEN_DURATION, decode_token, encode_token};
