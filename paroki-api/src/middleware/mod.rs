/// Middleware for the API server
///
/// - `security`: security response headers
/// - `auth`: Bearer authentication and the admin guard

pub mod auth;
pub mod security;
