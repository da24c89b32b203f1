//! Results storage module
//!
//! Persists finished runs so they can be listed, reloaded and exported.

mod storage;

pub use storage::{
    AggregateStats, EnvironmentInfo, ExportFormat, ResultsStorage, RunInfo, StoredRun, UnitRecord,
};
