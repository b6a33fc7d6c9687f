use std::sync::OnceLock;

use regex::Regex;

use crate::keyword::normalize_keyword;

fn step_line_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^\s*(given|when|then|and|but|dado|cuando|entonces|y|pero)\s+(.*)$")
            .expect("step line pattern is valid")
    })
}

/// Yields canonical step lines (`"{Keyword} {rest}"`) found in `text`, in line order.
///
/// Narrative lines without a leading keyword, and keyword lines with nothing after
/// the keyword, are skipped.
pub fn extract_steps(text: &str) -> impl Iterator<Item = String> + '_ {
    let re = step_line_re();
    text.lines().filter_map(move |line| {
        let cap = re.captures(line)?;
        let keyword = normalize_keyword(cap.get(1)?.as_str());
        let rest = collapse_whitespace(cap.get(2)?.as_str());
        if rest.is_empty() {
            return None;
        }
        Some(format!("{keyword} {rest}"))
    })
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
