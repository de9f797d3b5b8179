pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod store;

// Re-export commonly used types for easier access
pub use error::{EngineError, EngineResult};
pub use models::{Account, AccountState, BackendGroup, MembershipType};
pub use store::predicate::{AccountRef, GroupRef};
pub use store::search::MatchMode;
pub use store::{Backend, MembershipReader, MembershipStore, MembershipWriter, RemovalOutcome};
