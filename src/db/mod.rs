//! Database module
//!
//! PostgreSQL integration using sqlx with:
//! - Connection pool management and embedded migrations
//! - Row types with FromRow
//! - Repository functions per table

pub mod models;
pub mod pool;
pub mod repository;

pub use pool::{create_pool, health_check, run_migrations};
