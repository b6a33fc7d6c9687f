#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("unknown sort mode: {value} (expected relevance, frequency, alphabetic or reuse)")]
    UnknownSortMode { value: String },
    #[error("unknown step category: {value} (expected all, Given, When, Then, And or But)")]
    UnknownCategory { value: String },
}

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("failed to parse snapshot document: {source}")]
    Parse {
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to serialize snapshot document: {source}")]
    Serialize {
        #[source]
        source: serde_json::Error,
    },
}
