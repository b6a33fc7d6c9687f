//! Persisted snapshot document (`data.json`) and summary metrics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SnapshotError;
use crate::step_index::{Snapshot, StepEntry};

/// Steps used by at least this many records count as high reuse.
pub const HIGH_REUSE_MIN_COUNT: usize = 3;

/// Where the indexed records came from; carried through to the document for links.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ProjectInfo {
    pub jira_base_url: String,
    pub agile_test_base_url: String,
    pub project_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotDocument {
    pub generated_at: DateTime<Utc>,
    #[serde(default)]
    pub jira_base_url: String,
    #[serde(default)]
    pub agile_test_base_url: String,
    #[serde(default)]
    pub project_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
    #[serde(default)]
    pub total_issues: usize,
    #[serde(default)]
    pub total_steps: usize,
    pub steps: Vec<StepEntry>,
}

impl SnapshotDocument {
    pub fn new(snapshot: &Snapshot, project: ProjectInfo) -> Self {
        SnapshotDocument {
            generated_at: snapshot.generated_at,
            jira_base_url: project.jira_base_url,
            agile_test_base_url: project.agile_test_base_url,
            project_id: project.project_id,
            project_name: project.project_name.filter(|n| !n.is_empty()),
            total_issues: snapshot.total_records,
            total_steps: snapshot.steps.len(),
            steps: snapshot.steps.clone(),
        }
    }

    pub fn from_json(text: &str) -> Result<Self, SnapshotError> {
        serde_json::from_str(text).map_err(|source| SnapshotError::Parse { source })
    }

    pub fn to_json_pretty(&self) -> Result<String, SnapshotError> {
        serde_json::to_string_pretty(self).map_err(|source| SnapshotError::Serialize { source })
    }

    pub fn project(&self) -> ProjectInfo {
        ProjectInfo {
            jira_base_url: self.jira_base_url.clone(),
            agile_test_base_url: self.agile_test_base_url.clone(),
            project_id: self.project_id.clone(),
            project_name: self.project_name.clone(),
        }
    }

    /// Steps are kept in document order; the builder already sorted them.
    pub fn into_snapshot(self) -> Snapshot {
        Snapshot {
            generated_at: self.generated_at,
            steps: self.steps,
            total_records: self.total_issues,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotMetrics {
    pub total_steps: usize,
    pub total_records: usize,
    /// Mean `count` per step, rounded to one decimal.
    pub average_reuse: f64,
    pub high_reuse: usize,
}

impl SnapshotMetrics {
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        let total_steps = snapshot.steps.len();
        let average_reuse = if total_steps == 0 {
            0.0
        } else {
            let sum: usize = snapshot.steps.iter().map(|s| s.count.max(1)).sum();
            (sum as f64 / total_steps as f64 * 10.0).round() / 10.0
        };
        SnapshotMetrics {
            total_steps,
            total_records: snapshot.total_records,
            average_reuse,
            high_reuse: snapshot
                .steps
                .iter()
                .filter(|s| s.count >= HIGH_REUSE_MIN_COUNT)
                .count(),
        }
    }
}
