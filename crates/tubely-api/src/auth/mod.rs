//! Bearer-token authentication: HS256 access tokens, the middleware that
//! validates them, and the [`AuthUser`] extractor handlers consume.

pub mod jwt;
pub mod middleware;
pub mod models;

pub use jwt::{get_bearer_token, make_jwt, validate_jwt};
pub use models::AuthUser;
