//! Line-oriented `"id count"` / `"id state"` lists embedded in text fields.
//!
//! Both kinds accept `x`/`X` as a separator synonym (`2000000 x10`).

use serde::{Deserialize, Serialize};

use crate::record::Pair;

/// Which second column a pair list carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PairKind {
    IdCount,
    /// `id state`
    IdState,
}

impl PairKind {
    /// Leaf name of the second value inside a stored list slot
    pub fn value_leaf(self) -> &'static str {
        match self {
            Self::IdCount => "count",
            Self::IdState => "state",
        }
    }
}

/// Outcome of tokenizing one line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LineToken {
    /// Blank or `#` comment
    Skip,
    Pair(Pair),
    Invalid,
}

pub(crate) fn tokenize_line(line: &str) -> LineToken {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return LineToken::Skip;
    }

    let normalized = line.replace(['x', 'X'], " ");
    let mut tokens = normalized.split_whitespace();
    match (tokens.next(), tokens.next(), tokens.next()) {
        (Some(id), Some(value), None) => match (parse_int(id), parse_int(value)) {
            (Some(id), Some(value)) => LineToken::Pair((id, value)),
            _ => LineToken::Invalid,
        },
        _ => LineToken::Invalid,
    }
}

/// Base-10 integer with an optional leading `-` (a leading `+` is rejected)
fn parse_int(token: &str) -> Option<i64> {
    if token.starts_with('+') {
        return None;
    }
    token.parse().ok()
}

/// Parse an `id count` list, silently dropping malformed lines.
pub fn parse_pairs(text: &str) -> Vec<Pair> {
    parse_pairs_as(text, PairKind::IdCount)
}

/// Parse a pair list of the given kind, silently dropping malformed lines.
pub fn parse_pairs_as(text: &str, kind: PairKind) -> Vec<Pair> {
    let mut pairs = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        match tokenize_line(line) {
            LineToken::Pair(pair) => pairs.push(pair),
            LineToken::Invalid => {
                log::debug!("Dropping malformed {kind:?} line {}: {line:?}", idx + 1)
            }
            LineToken::Skip => {}
        }
    }
    pairs
}

/// One `"{id} {value}"` per line, no trailing newline.
pub fn format_pairs(pairs: &[Pair]) -> String {
    pairs
        .iter()
        .map(|(id, value)| format!("{id} {value}"))
        .collect::<Vec<_>>()
        .join("\n")
}
