use std::path::{Path, PathBuf};

/// Default database file, created in the working directory.
pub const DEFAULT_DATABASE: &str = "tesla_rental.db";

/// Environment variable that overrides the database location.
pub const DATABASE_ENV: &str = "RENTAL_LEDGER_DB";

/// Where and how the ledger stores its records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerConfig {
    pub database_path: PathBuf,
    /// Upper bound on pooled SQLite connections.
    pub max_connections: u32,
}

impl LedgerConfig {
    pub fn new(database_path: impl Into<PathBuf>) -> Self {
        Self {
            database_path: database_path.into(),
            max_connections: 1,
        }
    }

    pub fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections.max(1);
        self
    }

    pub fn database_path(&self) -> &Path {
        &self.database_path
    }

    /// URL that opens the database read-write, creating the file if missing.
    pub fn database_url(&self) -> String {
        format!("sqlite:{}?mode=rwc", self.database_path.display())
    }

    /// URL that opens an existing database without creating it.
    pub fn existing_database_url(&self) -> String {
        format!("sqlite:{}", self.database_path.display())
    }
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DATABASE)
    }
}
