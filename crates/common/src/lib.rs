//! Pieces shared by the devapi crates: logging setup and the response
//! envelope the router wraps read results in.

pub mod types;
pub mod utils;

/// Fixed body served on `GET /`.
pub const GREETING: &str = "Dev API";
