//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repositories translate between Diesel rows and domain types and map every
//! database failure onto the port's error enum. Row structs and the table
//! definition stay private to this module.
//!
//! # Example
//!
//! ```no_run
//! use booksyde::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
//!
//! let pool = DbPool::lazy(&PoolConfig::new("postgres://localhost/booksyde"));
//! let repo = DieselUserRepository::new(pool);
//! ```

mod diesel_basic_error_mapping;
mod diesel_user_repository;
mod models;
mod pool;
mod schema;

pub use diesel_user_repository::DieselUserRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
