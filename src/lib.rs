pub mod config;
pub mod error;
pub mod history;
pub mod notify;
pub mod server;
pub mod uploads;
