//! Maps exported AgileTest test cases and Jira issues onto [`SourceRecord`]s.
//!
//! Each field is read from a fixed, ordered list of keys; the first non-empty value wins.

use std::sync::OnceLock;

use clap::ValueEnum;
use gherkin_dict_core::SourceRecord;
use regex::Regex;
use serde_json::{Map, Value};

use crate::error::AdapterError;

const ID_KEYS: &[&str] = &["id", "testCaseId", "testcaseId"];
const NAME_KEYS: &[&str] = &["name", "testName", "title", "testCaseName"];
const ISSUE_KEYS: &[&str] = &["issueId", "jiraIssueId", "issueKey", "jiraIssueKey"];
const TEXT_KEYS: &[&str] = &["scenario", "gherkin", "text", "description"];
const LIST_KEYS: &[&str] = &["data", "testCases", "items", "results"];
const STEP_LIST_KEYS: &[&str] = &["testSteps", "steps"];
const STEP_TEXT_KEYS: &[&str] = &["gherkin", "text", "description", "action", "expected"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SourceKind {
    /// AgileTest test case export.
    AgileTest,
    /// Jira issue search export.
    Jira,
}

/// Parses an export and returns at most `limit` records.
pub fn adapt_records(
    export: &str,
    kind: SourceKind,
    jira_field: &str,
    limit: usize,
) -> Result<Vec<SourceRecord>, AdapterError> {
    let value: Value = serde_json::from_str(export).map_err(|source| AdapterError::Parse { source })?;
    let records: Vec<SourceRecord> = match kind {
        SourceKind::AgileTest => test_case_list(&value)?
            .iter()
            .filter_map(Value::as_object)
            .take(limit)
            .map(agile_test_record)
            .collect(),
        SourceKind::Jira => jira_issue_list(&value)?
            .iter()
            .filter_map(Value::as_object)
            .take(limit)
            .map(|issue| jira_record(issue, jira_field))
            .collect(),
    };
    tracing::debug!(records = records.len(), ?kind, "adapted export");
    Ok(records)
}

fn test_case_list(value: &Value) -> Result<&Vec<Value>, AdapterError> {
    if let Some(list) = value.as_array() {
        return Ok(list);
    }
    LIST_KEYS
        .iter()
        .find_map(|k| value.get(k).and_then(Value::as_array))
        .ok_or(AdapterError::MissingList {
            expected: "test case",
        })
}

fn jira_issue_list(value: &Value) -> Result<&Vec<Value>, AdapterError> {
    value
        .get("issues")
        .and_then(Value::as_array)
        .ok_or(AdapterError::MissingList { expected: "issues" })
}

pub fn agile_test_record(obj: &Map<String, Value>) -> SourceRecord {
    let mut text = first_string(obj, TEXT_KEYS).unwrap_or_default();
    let structured = structured_steps(obj);
    if !structured.is_empty() {
        if !text.is_empty() {
            text.push('\n');
        }
        text.push_str(&structured.join("\n"));
    }
    SourceRecord {
        id: first_string(obj, ID_KEYS).unwrap_or_default(),
        name: first_string(obj, NAME_KEYS).unwrap_or_default(),
        text,
        issue_id: ISSUE_KEYS
            .iter()
            .filter_map(|k| obj.get(*k))
            .find_map(numeric_issue_id),
    }
}

fn jira_record(issue: &Map<String, Value>, field: &str) -> SourceRecord {
    let fields = issue.get("fields").and_then(Value::as_object);
    let field_text = |key: &str| {
        fields
            .and_then(|f| f.get(key))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };
    SourceRecord {
        id: first_string(issue, &["key", "id"]).unwrap_or_default(),
        name: field_text("summary"),
        text: field_text(field),
        issue_id: issue.get("id").and_then(numeric_issue_id),
    }
}

/// Renders a structured step list (`testSteps` / `steps`) as one line per step.
fn structured_steps(obj: &Map<String, Value>) -> Vec<String> {
    let Some(steps) = STEP_LIST_KEYS
        .iter()
        .find_map(|k| obj.get(*k).and_then(Value::as_array))
    else {
        return Vec::new();
    };
    steps
        .iter()
        .filter_map(format_step)
        .flat_map(|line| {
            line.lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .collect()
}

fn format_step(step: &Value) -> Option<String> {
    let obj = match step {
        Value::String(s) => return Some(s.clone()),
        Value::Object(obj) => obj,
        _ => return None,
    };
    let text = first_string(obj, STEP_TEXT_KEYS).or_else(|| first_string(obj, &["name"]))?;
    let keyword = obj.get("keyword").and_then(Value::as_str).map(str::trim).unwrap_or("");
    if !keyword.is_empty() && !text.starts_with(keyword) {
        let joined = format!("{keyword} {text}");
        return Some(joined.split_whitespace().collect::<Vec<_>>().join(" "));
    }
    Some(text.trim().to_string())
}

fn first_string(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|k| match obj.get(*k)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn digits_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d+").expect("digit pattern is valid"))
}

/// Positive numbers are kept as-is; keys like `"QA-123"` yield their first digit run.
fn numeric_issue_id(value: &Value) -> Option<String> {
    let raw = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        _ => return None,
    };
    if matches!(raw.parse::<u64>(), Ok(n) if n > 0) {
        return Some(raw);
    }
    digits_re().find(&raw).map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn agile_test_aliases_and_wrapped_list() {
        let export = json!({
            "items": [
                { "testCaseId": 12, "title": "Login", "jiraIssueKey": "QA-77", "scenario": "Given a user" },
                { "id": "13", "name": "Logout", "issueId": 1005, "gherkin": "When leaving" }
            ]
        })
        .to_string();
        let records = adapt_records(&export, SourceKind::AgileTest, "description", 500).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "12");
        assert_eq!(records[0].name, "Login");
        assert_eq!(records[0].issue_id.as_deref(), Some("77"));
        assert_eq!(records[0].text, "Given a user");
        assert_eq!(records[1].issue_id.as_deref(), Some("1005"));
        assert_eq!(records[1].text, "When leaving");
    }

    #[test]
    fn agile_test_structured_steps_get_keywords() {
        let export = json!([{
            "id": "1",
            "testSteps": [
                { "keyword": "Given", "text": "a  cart" },
                { "keyword": "When", "action": "When paying" },
                "Then a receipt\nAnd an email"
            ]
        }])
        .to_string();
        let records = adapt_records(&export, SourceKind::AgileTest, "description", 500).unwrap();
        assert_eq!(
            records[0].text,
            "Given a cart\nWhen paying\nThen a receipt\nAnd an email"
        );
    }

    #[test]
    fn limit_caps_records() {
        let export = json!([{ "id": "1" }, { "id": "2" }, { "id": "3" }]).to_string();
        let records = adapt_records(&export, SourceKind::AgileTest, "description", 2).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn jira_issues_use_configured_field() {
        let export = json!({
            "total": 1,
            "issues": [{
                "id": "10042",
                "key": "QA-1",
                "fields": { "summary": "Checkout", "customfield_100": "Given a cart\nThen pay" }
            }]
        })
        .to_string();
        let records = adapt_records(&export, SourceKind::Jira, "customfield_100", 500).unwrap();
        assert_eq!(records[0].id, "QA-1");
        assert_eq!(records[0].name, "Checkout");
        assert_eq!(records[0].issue_id.as_deref(), Some("10042"));
        assert_eq!(records[0].text, "Given a cart\nThen pay");
    }

    #[test]
    fn unknown_shape_is_an_error() {
        let err = adapt_records(r#"{"nothing": true}"#, SourceKind::AgileTest, "description", 10)
            .unwrap_err();
        assert!(matches!(err, AdapterError::MissingList { .. }));
        assert!(adapt_records("[", SourceKind::Jira, "description", 10).is_err());
    }
}
