//! OAuth credentials and access-token refresh.

mod credentials;
mod refresh;

pub use credentials::{Credentials, RefreshedToken};
pub use refresh::TokenRefresher;
