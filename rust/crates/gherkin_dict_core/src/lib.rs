//! gherkin_dict_core: step extraction, step index and ranked search for the Gherkin dictionary.
//! Keep this crate platform-agnostic and free of I/O.

pub mod error;
pub mod extract;
pub mod history;
pub mod keyword;
pub mod search;
pub mod similarity;
pub mod snapshot;
pub mod step_index;

pub use error::{SearchError, SnapshotError};
pub use extract::extract_steps;
pub use history::{HistoryEntry, SearchHistory};
pub use keyword::{normalize_keyword, StepKeyword};
pub use search::{
    parse_query, reuse_rate, search, CategoryFilter, ParsedQuery, SearchHit, SearchMode, SearchOutcome,
    SearchState, SortMode,
};
pub use similarity::score;
pub use snapshot::{ProjectInfo, SnapshotDocument, SnapshotMetrics};
pub use step_index::{
    build_snapshot, build_snapshot_at, Snapshot, SourceRecord, StepEntry, StepIndexBuilder, TestCaseRef,
};

/// Returns the crate version at compile time (useful for debugging).
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
