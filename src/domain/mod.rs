pub mod kind;
pub mod outcome;
pub mod snapshot;

pub use kind::{DataKind, ALL_DATA_PATH};
pub use outcome::FetchOutcome;
pub use snapshot::SnapshotSummary;
