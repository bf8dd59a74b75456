//! Database repositories
//!
//! Repository pattern for database access, separating data access logic
//! from business logic.

pub mod channels;
pub mod metadata;
pub mod sources;
