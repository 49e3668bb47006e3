//! Configuration types shared across server modules

mod database;

pub use database::DatabaseConfig;
