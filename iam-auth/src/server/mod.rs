pub mod handlers;
pub mod middleware;
pub mod routes;

pub use routes::{api_routes, health_route};
