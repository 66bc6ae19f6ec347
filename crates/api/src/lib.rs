pub mod error;
pub mod extract;
pub mod middleware;
pub mod routes;

pub use routes::{build_router, ApiState};
