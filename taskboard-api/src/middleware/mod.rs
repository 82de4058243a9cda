/// Middleware modules for the API server
///
/// - `security`: Security response headers
/// - `session`: Cookie session authentication

pub mod security;
pub mod session;
