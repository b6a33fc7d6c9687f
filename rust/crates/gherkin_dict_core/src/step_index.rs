use std::collections::{BTreeSet, HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::extract::extract_steps;

/// One test case or issue whose free text is mined for steps.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SourceRecord {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub text: String,
    #[serde(default, rename = "issueId", skip_serializing_if = "Option::is_none")]
    pub issue_id: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TestCaseRef {
    pub id: String,
    #[serde(rename = "issueId")]
    pub issue_id: Option<String>,
    pub name: String,
}

impl TestCaseRef {
    /// Name shown in filters; falls back to the id when the name is empty.
    pub fn label(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct StepEntry {
    pub step: String,
    pub count: usize,
    #[serde(rename = "testCases", default)]
    pub test_cases: Vec<TestCaseRef>,
}

impl StepEntry {
    /// First whitespace-delimited word, i.e. the canonical keyword.
    pub fn keyword(&self) -> &str {
        self.step.split_whitespace().next().unwrap_or("")
    }

    pub fn reuse_percent(&self, total_records: usize) -> u32 {
        if total_records == 0 {
            return 0;
        }
        (self.count as f64 / total_records as f64 * 100.0).round() as u32
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    pub generated_at: DateTime<Utc>,
    pub steps: Vec<StepEntry>,
    pub total_records: usize,
}

impl Snapshot {
    pub fn from_steps(mut steps: Vec<StepEntry>, total_records: usize, generated_at: DateTime<Utc>) -> Self {
        // Sort for stability
        steps.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.step.cmp(&b.step)));
        Snapshot {
            generated_at,
            steps,
            total_records,
        }
    }

    /// Distinct test case labels across all steps, sorted.
    pub fn test_case_names(&self) -> Vec<String> {
        let names: BTreeSet<&str> = self
            .steps
            .iter()
            .flat_map(|s| s.test_cases.iter().map(TestCaseRef::label))
            .collect();
        names.into_iter().map(str::to_string).collect()
    }
}

/// Accumulates records into a deduplicated step index.
#[derive(Debug, Default)]
pub struct StepIndexBuilder {
    positions: HashMap<String, usize>,
    entries: Vec<StepEntry>,
    record_ids: HashSet<String>,
    skipped: usize,
}

impl StepIndexBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one record with its extracted steps. Returns `false` when the record has
    /// no usable id and was skipped.
    pub fn add_record<I>(&mut self, record: &SourceRecord, steps: I) -> bool
    where
        I: IntoIterator<Item = String>,
    {
        let id = record.id.trim();
        if id.is_empty() {
            tracing::debug!(name = %record.name, "skipping record without id");
            self.skipped += 1;
            return false;
        }
        self.record_ids.insert(id.to_string());

        let mut seen: HashSet<String> = HashSet::new();
        for step in steps {
            if step.is_empty() || !seen.insert(step.clone()) {
                continue;
            }
            let pos = match self.positions.get(&step) {
                Some(&pos) => pos,
                None => {
                    self.entries.push(StepEntry {
                        step: step.clone(),
                        count: 0,
                        test_cases: Vec::new(),
                    });
                    self.positions.insert(step, self.entries.len() - 1);
                    self.entries.len() - 1
                }
            };
            // A record id seen twice in one batch still counts once.
            let entry = &mut self.entries[pos];
            if !entry.test_cases.iter().any(|tc| tc.id == id) {
                entry.count += 1;
                entry.test_cases.push(TestCaseRef {
                    id: id.to_string(),
                    issue_id: record.issue_id.clone(),
                    name: display_name(record, id),
                });
            }
        }
        true
    }

    pub fn finish(self) -> Snapshot {
        self.finish_at(Utc::now())
    }

    /// Like [`finish`](Self::finish) with an explicit timestamp, for reproducible output.
    pub fn finish_at(self, generated_at: DateTime<Utc>) -> Snapshot {
        tracing::info!(
            steps = self.entries.len(),
            records = self.record_ids.len(),
            skipped = self.skipped,
            "step index built"
        );
        let records = self.record_ids.len();
        Snapshot::from_steps(self.entries, records, generated_at)
    }
}

fn display_name(record: &SourceRecord, id: &str) -> String {
    let name = record.name.trim();
    if name.is_empty() {
        format!("Test Case {id}")
    } else {
        name.to_string()
    }
}

/// Extracts steps from every record and builds the snapshot.
pub fn build_snapshot(records: &[SourceRecord]) -> Snapshot {
    build_snapshot_at(records, Utc::now())
}

pub fn build_snapshot_at(records: &[SourceRecord], generated_at: DateTime<Utc>) -> Snapshot {
    let mut builder = StepIndexBuilder::new();
    for (record, steps) in records.iter().zip(extract_all(records)) {
        builder.add_record(record, steps);
    }
    builder.finish_at(generated_at)
}

#[cfg(not(feature = "parallel"))]
fn extract_all(records: &[SourceRecord]) -> Vec<Vec<String>> {
    records.iter().map(|r| extract_steps(&r.text).collect()).collect()
}

// Indexed collect keeps record order, so accumulation sees the same sequence as the
// sequential path.
#[cfg(feature = "parallel")]
fn extract_all(records: &[SourceRecord]) -> Vec<Vec<String>> {
    use rayon::prelude::*;
    records.par_iter().map(|r| extract_steps(&r.text).collect()).collect()
}
