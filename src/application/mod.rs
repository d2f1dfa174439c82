// Application layer - the rental ledger service used by every client (CLI, tests).

pub mod error;
pub mod service;

pub use error::*;
pub use service::*;
