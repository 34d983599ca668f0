/// Signed-in member pages
///
/// Every handler here runs behind `require_user` and reads the caller from
/// the [`paroki_shared::auth::middleware::AuthContext`] extension.

pub mod dashboard;
pub mod documents;
pub mod settings;
