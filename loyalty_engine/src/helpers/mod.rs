mod luhn;
mod passwords;

pub use luhn::is_valid_luhn;
pub use passwords::{hash_password, verify_password};
