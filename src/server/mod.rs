pub mod app;
pub mod rate_limit;
pub mod routes;
pub mod state;
