/// HTTP route handlers
///
/// - `health`: health check endpoint
/// - `auth`: register, login, refresh
/// - `public`: pages visible without an account
/// - `member`: dashboard, settings and documents for signed-in members
/// - `admin`: content management, reports and exports

pub mod admin;
pub mod auth;
pub mod health;
pub mod member;
pub mod public;
