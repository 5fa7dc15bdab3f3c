//! Auth domain - single admin account behind a password, JWT sessions.

pub mod jwt;
pub mod password;

pub use jwt::{Claims, JwtService, ADMIN_TOKEN_HOURS};
pub use password::AdminPassword;
