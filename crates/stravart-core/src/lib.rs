pub mod config;
pub mod logging;

pub mod activity;
pub mod auth;
pub mod error;
pub mod http;
pub mod rate_limit;
pub mod retry;
pub mod signals;
pub mod validate;

pub use activity::{Activity, ActivityFetcher, ListQuery};
pub use auth::Credentials;
pub use error::{ActivityError, ErrorCode};
