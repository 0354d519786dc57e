//! # Blog API
//!
//! Actix-web server exposing CRUD over `/posts`.
//! The binary in `main.rs` wires configuration and telemetry; tests start the
//! same server in-process through [`server::run`].

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod observability;
pub mod server;
pub mod state;
pub mod telemetry;

pub use config::AppConfig;
pub use state::AppState;
