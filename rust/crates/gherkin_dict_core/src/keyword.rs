use std::fmt;

use serde::{Deserialize, Serialize};

/// Canonical Gherkin step keyword.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum StepKeyword {
    Given,
    When,
    Then,
    And,
    But,
}

impl StepKeyword {
    pub const ALL: [StepKeyword; 5] = [
        StepKeyword::Given,
        StepKeyword::When,
        StepKeyword::Then,
        StepKeyword::And,
        StepKeyword::But,
    ];

    /// Recognizes English and Spanish keyword tokens, ignoring case.
    pub fn from_token(token: &str) -> Option<Self> {
        match token.to_lowercase().as_str() {
            "given" | "dado" => Some(StepKeyword::Given),
            "when" | "cuando" => Some(StepKeyword::When),
            "then" | "entonces" => Some(StepKeyword::Then),
            "and" | "y" => Some(StepKeyword::And),
            "but" | "pero" => Some(StepKeyword::But),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StepKeyword::Given => "Given",
            StepKeyword::When => "When",
            StepKeyword::Then => "Then",
            StepKeyword::And => "And",
            StepKeyword::But => "But",
        }
    }
}

impl fmt::Display for StepKeyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Maps a keyword token to its canonical label; unknown tokens come back unchanged.
pub fn normalize_keyword(token: &str) -> &str {
    match StepKeyword::from_token(token) {
        Some(keyword) => keyword.label(),
        None => token,
    }
}
