//! REST API access
//!
//! [`ApiClient`] attaches the stored access token to every request and
//! recovers from a single 401 by refreshing the token pair.

pub mod client;
pub mod tokens;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use client::{ApiClient, REFRESH_PATH};
pub use tokens::{AuthTokens, FileTokenStore, MemoryTokenStore, TokenStore};
pub use transport::{ApiRequest, ApiResponse, HttpTransport, Method, ReqwestTransport};
