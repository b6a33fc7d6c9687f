//! Relevance scoring of a candidate step against a search query.
//!
//! Tiers are evaluated in order and the first applicable one decides:
//!
//! 1. every quoted parameter must occur in the candidate, otherwise 0;
//! 2. an empty query scores a neutral 50 (60 when parameters matched);
//! 3. exact equality scores 100;
//! 4. containment scores `75 + 25 * len(query) / len(candidate)`, plus 10;
//! 5. word overlap scores the matched share of the longer word list, plus 10.
//!
//! Tiers 4 and 5 are clamped to 100. Callers lowercase both sides first.

pub const EMPTY_QUERY_SCORE: u32 = 50;
pub const PARAMETER_BONUS: u32 = 10;
pub const MAX_SCORE: u32 = 100;

pub fn score<S: AsRef<str>>(query: &str, candidate: &str, parameters: &[S]) -> u32 {
    if !parameters.iter().all(|p| candidate.contains(p.as_ref())) {
        return 0;
    }

    if query.is_empty() {
        return if parameters.is_empty() {
            EMPTY_QUERY_SCORE
        } else {
            EMPTY_QUERY_SCORE + PARAMETER_BONUS
        };
    }

    if candidate == query {
        return MAX_SCORE;
    }

    if candidate.contains(query) {
        let ratio = char_len(query) as f64 / char_len(candidate) as f64;
        let base = (75.0 + ratio * 25.0).round() as u32;
        return (base + PARAMETER_BONUS).min(MAX_SCORE);
    }

    word_overlap(query, candidate)
}

fn word_overlap(query: &str, candidate: &str) -> u32 {
    let query_words: Vec<&str> = query.split_whitespace().collect();
    let candidate_words: Vec<&str> = candidate.split_whitespace().collect();

    let matches = query_words
        .iter()
        .filter(|&&w| candidate_words.iter().any(|&cw| cw.contains(w) || w.contains(cw)))
        .count();
    if matches == 0 {
        return 0;
    }

    let longest = query_words.len().max(candidate_words.len());
    let base = (matches as f64 / longest as f64 * 100.0).round() as u32;
    (base + PARAMETER_BONUS).min(MAX_SCORE)
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}
