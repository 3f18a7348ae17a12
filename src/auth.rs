mod admin_guard;
mod bearer;
mod password;

pub use admin_guard::Administrator;
pub use bearer::bearer_token;
pub use password::{check_password_policy, hash_password, verify_credentials};
