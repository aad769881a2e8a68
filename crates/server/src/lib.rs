pub mod app;
pub mod errors;
pub mod routes;
pub mod startup;

pub use app::{build_cors, DevApi, DevApiConfig};
pub use startup::run;
