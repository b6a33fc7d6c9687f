use std::cmp::Ordering;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::SearchError;
use crate::keyword::StepKeyword;
use crate::similarity::score;
use crate::step_index::{Snapshot, StepEntry};

/// Steps at or below this score are dropped when the query has text outside quotes.
pub const MIN_RELEVANCE: u32 = 30;

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SortMode {
    #[default]
    Relevance,
    Frequency,
    Alphabetic,
    Reuse,
}

impl FromStr for SortMode {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "relevance" => Ok(SortMode::Relevance),
            "frequency" => Ok(SortMode::Frequency),
            "alphabetic" => Ok(SortMode::Alphabetic),
            "reuse" => Ok(SortMode::Reuse),
            other => Err(SearchError::UnknownSortMode {
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(StepKeyword),
}

impl CategoryFilter {
    fn accepts(self, entry: &StepEntry) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(keyword) => entry.keyword() == keyword.label(),
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            return Ok(CategoryFilter::All);
        }
        StepKeyword::ALL
            .into_iter()
            .find(|k| k.label() == s)
            .map(CategoryFilter::Only)
            .ok_or_else(|| SearchError::UnknownCategory { value: s.to_string() })
    }
}

impl Serialize for CategoryFilter {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CategoryFilter::All => serializer.serialize_str("all"),
            CategoryFilter::Only(keyword) => serializer.serialize_str(keyword.label()),
        }
    }
}

impl<'de> Deserialize<'de> for CategoryFilter {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Everything one search needs besides the snapshot. Callers own it and pass it in.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SearchState {
    pub query: String,
    pub category: CategoryFilter,
    #[serde(rename = "testCase", skip_serializing_if = "Option::is_none")]
    pub test_case: Option<String>,
    pub sort: SortMode,
}

impl SearchState {
    fn test_case_filter(&self) -> Option<&str> {
        self.test_case.as_deref().filter(|tc| !tc.is_empty())
    }
}

/// Query text split into free text and quoted literal parameters.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParsedQuery {
    pub residual: String,
    pub parameters: Vec<String>,
}

fn quoted_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#""([^"]*)""#).expect("quoted parameter pattern is valid"))
}

pub fn parse_query(query: &str) -> ParsedQuery {
    let re = quoted_re();
    let parameters = re
        .captures_iter(query)
        .filter_map(|cap| cap.get(1))
        .map(|m| m.as_str())
        .filter(|p| !p.is_empty())
        .map(str::to_lowercase)
        .collect();
    let residual = re.replace_all(query, "").trim().to_string();
    ParsedQuery {
        residual,
        parameters,
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
    /// No query text and no test case filter: the whole (category-filtered) index.
    Browse,
    Query,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SearchHit<'a> {
    pub entry: &'a StepEntry,
    pub score: Option<u32>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SearchOutcome<'a> {
    pub mode: SearchMode,
    pub hits: Vec<SearchHit<'a>>,
}

impl SearchOutcome<'_> {
    pub fn top_score(&self) -> Option<u32> {
        self.hits.first().and_then(|h| h.score)
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }
}

pub fn search<'a>(snapshot: &'a Snapshot, state: &SearchState) -> SearchOutcome<'a> {
    let query = state.query.trim().to_lowercase();
    let test_case = state.test_case_filter();

    if query.is_empty() && test_case.is_none() {
        let mut hits: Vec<SearchHit<'a>> = snapshot
            .steps
            .iter()
            .filter(|entry| state.category.accepts(entry))
            .map(|entry| SearchHit { entry, score: None })
            .collect();
        sort_hits(&mut hits, state.sort, false, snapshot);
        return SearchOutcome {
            mode: SearchMode::Browse,
            hits,
        };
    }

    let parsed = parse_query(&query);
    let mut hits: Vec<SearchHit<'a>> = snapshot
        .steps
        .iter()
        .filter(|entry| state.category.accepts(entry))
        .filter(|entry| match test_case {
            Some(name) => entry.test_cases.iter().any(|tc| tc.label() == name),
            None => true,
        })
        .filter_map(|entry| {
            let candidate = entry.step.to_lowercase();
            let s = score(&parsed.residual, &candidate, parsed.parameters.as_slice());
            if !parsed.residual.is_empty() && s <= MIN_RELEVANCE {
                return None;
            }
            Some(SearchHit {
                entry,
                score: Some(s),
            })
        })
        .collect();

    sort_hits(&mut hits, state.sort, !query.is_empty(), snapshot);
    tracing::debug!(query = %query, hits = hits.len(), "search completed");
    SearchOutcome {
        mode: SearchMode::Query,
        hits,
    }
}

/// `count / (total_steps / total_records) * 100`; zero when either total is zero.
pub fn reuse_rate(entry: &StepEntry, snapshot: &Snapshot) -> f64 {
    let total_steps = snapshot.steps.len();
    if total_steps == 0 || snapshot.total_records == 0 {
        return 0.0;
    }
    let steps_per_record = total_steps as f64 / snapshot.total_records as f64;
    entry.count as f64 / steps_per_record * 100.0
}

fn sort_hits(hits: &mut [SearchHit<'_>], mode: SortMode, has_text: bool, snapshot: &Snapshot) {
    match mode {
        SortMode::Frequency => hits.sort_by(|a, b| b.entry.count.cmp(&a.entry.count)),
        SortMode::Alphabetic => hits.sort_by(|a, b| a.entry.step.cmp(&b.entry.step)),
        SortMode::Reuse => hits.sort_by(|a, b| {
            reuse_rate(b.entry, snapshot).total_cmp(&reuse_rate(a.entry, snapshot))
        }),
        SortMode::Relevance => hits.sort_by(|a, b| {
            let by_score = if has_text {
                b.score.cmp(&a.score)
            } else {
                Ordering::Equal
            };
            by_score.then_with(|| b.entry.count.cmp(&a.entry.count))
        }),
    }
}
