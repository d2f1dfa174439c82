mod repository;

pub use repository::*;

/// Schema for the Cars, Clients and Rentals tables. Every statement is idempotent.
pub const SCHEMA: &str = include_str!("schema.sql");
