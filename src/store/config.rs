use super::search::MatchMode;
use super::DatabaseType;

/// Configuration for membership store backends
///
/// Holds everything needed to connect to and operate the relational store.
/// The matching mode for pattern search is resolved here once and injected
/// into the store; operations never read ambient configuration.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// The type of database backend to use
    pub database_type: DatabaseType,

    /// Connection URL for the store
    /// Examples: "sqlite:./membership.db" or ":memory:"
    pub connection_url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Connection acquire timeout in seconds
    pub connection_timeout: u64,

    /// Pattern matching mode for the search subsystem
    pub match_mode: MatchMode,
}

impl StoreConfig {
    /// Create a SQLite configuration
    pub fn sqlite(connection_url: String) -> Self {
        Self {
            database_type: DatabaseType::SQLite,
            connection_url,
            max_connections: 10,
            connection_timeout: 30,
            match_mode: MatchMode::Medial,
        }
    }

    /// Create an in-memory SQLite configuration for testing
    ///
    /// A single connection: every pooled connection of an in-memory SQLite
    /// database would otherwise see its own empty database.
    pub fn memory_sqlite() -> Self {
        Self::sqlite(":memory:".to_string()).with_max_connections(1)
    }

    /// Set maximum connections
    pub fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }

    /// Set connection acquire timeout
    pub fn with_connection_timeout(mut self, timeout_seconds: u64) -> Self {
        self.connection_timeout = timeout_seconds;
        self
    }

    /// Set the pattern matching mode
    pub fn with_match_mode(mut self, match_mode: MatchMode) -> Self {
        self.match_mode = match_mode;
        self
    }

    /// Check if this is an in-memory database
    pub fn is_memory_database(&self) -> bool {
        self.connection_url == ":memory:" || self.connection_url == "sqlite::memory:"
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.connection_url.is_empty() {
            return Err("Connection URL cannot be empty".to_string());
        }

        if self.max_connections == 0 {
            return Err("Max connections must be greater than 0".to_string());
        }

        match self.database_type {
            DatabaseType::SQLite => {
                if !self.connection_url.starts_with("sqlite:")
                    && self.connection_url != ":memory:"
                    && !self.connection_url.ends_with(".db")
                    && !self.connection_url.ends_with(".sqlite")
                {
                    return Err(
                        "SQLite connection URL must start with 'sqlite:', be ':memory:', or end with '.db' or '.sqlite'"
                            .to_string(),
                    );
                }
            }
        }

        if self.is_memory_database() && self.max_connections != 1 {
            return Err("In-memory SQLite requires exactly one connection".to_string());
        }

        Ok(())
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::memory_sqlite()
    }
}
