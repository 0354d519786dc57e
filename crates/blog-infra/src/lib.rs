//! # Blog Infrastructure
//!
//! Concrete implementations of the ports defined in `blog-core`,
//! plus the synthetic post generator used for seeding.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external dependencies, in-memory only
//! - `postgres` - PostgreSQL post store via SeaORM

pub mod database;
pub mod seed;

// Re-exports - In-Memory
pub use database::{DatabaseConfig, InMemoryPostRepository};

#[cfg(feature = "postgres")]
pub use database::{PostgresPostRepository, connect};
