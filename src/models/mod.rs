//! Data models: run configuration, client profile and candidate servers

pub mod config;
pub mod server;

pub use config::RunConfig;
pub use server::{ClientProfile, Position, TestServer};
