//! Authentication module
//!
//! Provides JWT session tokens and argon2 password hashing.

mod jwt;
mod middleware;
mod password;

pub use jwt::{Claims, JwtService};
pub use middleware::AuthUser;
pub use password::PasswordService;
