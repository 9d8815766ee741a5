//! Authentication and authorization module

pub mod jwt;
pub mod middleware;
pub mod ownership;
pub mod password;

pub use jwt::{Claims, TokenError, TokenService};
pub use middleware::{extract_token, jwt_auth_middleware, AuthContext};
pub use ownership::{is_owner, require_owner};
pub use password::{PasswordError, PasswordHasher};
