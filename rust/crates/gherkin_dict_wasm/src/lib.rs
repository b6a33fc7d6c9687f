use gherkin_dict_core::{
    build_snapshot, search, ProjectInfo, SearchMode, SearchState, SnapshotDocument, SnapshotMetrics,
    SourceRecord, TestCaseRef,
};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

#[derive(Deserialize)]
struct BuildRequest {
    records: Vec<SourceRecord>,
    #[serde(default)]
    project: ProjectInfo,
}

#[derive(Serialize)]
struct SearchHitJson<'a> {
    step: &'a str,
    count: usize,
    #[serde(rename = "testCases")]
    test_cases: &'a [TestCaseRef],
    #[serde(skip_serializing_if = "Option::is_none")]
    similarity: Option<u32>,
}

#[derive(Serialize)]
struct SearchResponse<'a> {
    mode: SearchMode,
    total: usize,
    #[serde(rename = "topScore", skip_serializing_if = "Option::is_none")]
    top_score: Option<u32>,
    hits: Vec<SearchHitJson<'a>>,
}

fn error_json(message: impl std::fmt::Display) -> String {
    serde_json::json!({ "error": message.to_string() }).to_string()
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| error_json(e))
}

/// Builds a snapshot document from `{ "records": [...], "project": {...} }`.
/// Invalid input yields `{ "error": "..." }`.
#[wasm_bindgen]
pub fn build_snapshot_json(input_json: &str) -> String {
    let req: BuildRequest = match serde_json::from_str(input_json) {
        Ok(req) => req,
        Err(e) => return error_json(format!("invalid build request: {e}")),
    };
    let snapshot = build_snapshot(&req.records);
    to_json(&SnapshotDocument::new(&snapshot, req.project))
}

/// Runs one search of `state_json` (a `SearchState`) against a snapshot document.
#[wasm_bindgen]
pub fn search_steps(document_json: &str, state_json: &str) -> String {
    let document = match SnapshotDocument::from_json(document_json) {
        Ok(doc) => doc,
        Err(e) => return error_json(e),
    };
    let state: SearchState = match serde_json::from_str(state_json) {
        Ok(state) => state,
        Err(e) => return error_json(format!("invalid search state: {e}")),
    };
    let snapshot = document.into_snapshot();
    let outcome = search(&snapshot, &state);
    let response = SearchResponse {
        mode: outcome.mode,
        total: outcome.hits.len(),
        top_score: outcome.top_score(),
        hits: outcome
            .hits
            .iter()
            .map(|h| SearchHitJson {
                step: &h.entry.step,
                count: h.entry.count,
                test_cases: &h.entry.test_cases,
                similarity: h.score,
            })
            .collect(),
    };
    to_json(&response)
}

/// Summary metrics plus the test case names for the filter drop-down.
#[wasm_bindgen]
pub fn snapshot_summary(document_json: &str) -> String {
    let snapshot = match SnapshotDocument::from_json(document_json) {
        Ok(doc) => doc.into_snapshot(),
        Err(e) => return error_json(e),
    };
    to_json(&serde_json::json!({
        "metrics": SnapshotMetrics::from_snapshot(&snapshot),
        "testCases": snapshot.test_case_names(),
    }))
}

#[wasm_bindgen]
pub fn core_version() -> String {
    gherkin_dict_core::version().to_string()
}
