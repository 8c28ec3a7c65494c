//! Write-behind persistence: pending intents and the flush cycle.

mod intent;
mod manager;

pub use intent::{EntityKind, Intent, Operation};
pub use manager::{
    FlushFailure, FlushReport, PersistenceError, RepositoryPersistenceManager,
};
