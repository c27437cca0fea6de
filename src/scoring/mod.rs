//! Text match scoring
//!
//! Scores a query against a candidate name. A non-empty query must be a
//! case-insensitive subsequence of the name to score at all. Matches fall into
//! tiers (prefix, word boundary, acronym, subsequence), each owning a disjoint
//! band of scores so a better tier always wins. Inside a band, compact matches
//! and shorter names score higher.

use serde::{Deserialize, Serialize};

/// Score given to every named candidate for the empty query
pub const EMPTY_QUERY_SCORE: f64 = 1.0;

/// Width of the score band owned by each tier
const TIER_BAND: f64 = 0.15;

/// Description matches are worth this fraction of a name match
const DESCRIPTION_FACTOR: f64 = 0.5;

/// How a query matched a name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    /// Empty query, every candidate matches
    Browse,
    Subsequence,
    Acronym,
    WordBoundary,
    Prefix,
    /// Matched through the description rather than the name
    Description,
}

impl MatchKind {
    fn base(self) -> f64 {
        match self {
            Self::Browse => EMPTY_QUERY_SCORE,
            Self::Subsequence => 0.10,
            Self::Acronym => 0.30,
            Self::WordBoundary => 0.50,
            Self::Prefix => 0.70,
            Self::Description => 0.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Browse => "browse",
            Self::Subsequence => "subsequence",
            Self::Acronym => "acronym",
            Self::WordBoundary => "word_boundary",
            Self::Prefix => "prefix",
            Self::Description => "description",
        }
    }
}

/// Result of matching one query against one text
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextMatch {
    pub kind: MatchKind,
    pub score: f64,
}

/// Scorer options
#[derive(Debug, Clone, Copy, Default)]
pub struct Scorer {
    /// Fall back to the description when the name does not match
    pub match_description: bool,
}

impl Scorer {
    pub fn new(match_description: bool) -> Self {
        Self { match_description }
    }

    /// Match a query against a candidate's name, and optionally its description
    pub fn score(&self, query: &str, name: &str, description: &str) -> Option<TextMatch> {
        if let Some(m) = match_text(query, name) {
            return Some(m);
        }
        if !self.match_description || is_blank(name) {
            return None;
        }
        match_text(query, description).map(|m| TextMatch {
            kind: MatchKind::Description,
            score: m.score * DESCRIPTION_FACTOR,
        })
    }
}

/// Score a query against a name; zero when it does not match
pub fn score(query: &str, name: &str) -> f64 {
    match_text(query, name).map_or(0.0, |m| m.score)
}

/// Match a query against a name
pub fn match_text(query: &str, name: &str) -> Option<TextMatch> {
    if is_blank(name) {
        return None;
    }

    let query = fold(query.trim());
    if query.is_empty() {
        return Some(TextMatch {
            kind: MatchKind::Browse,
            score: EMPTY_QUERY_SCORE,
        });
    }

    let name = fold(name);
    let window = best_window(&name, &query)?;
    let starts = word_starts(&name);

    let (kind, quality) = if name.starts_with(&query) {
        (MatchKind::Prefix, 1.0)
    } else if starts.iter().any(|&i| name[i..].starts_with(&query)) {
        (MatchKind::WordBoundary, 1.0)
    } else if let Some(first_word) = acronym_start(&starts, &name, &query) {
        (MatchKind::Acronym, if first_word == 0 { 1.0 } else { 0.75 })
    } else {
        let compactness = query.len() as f64 / window.span() as f64;
        let on_word_starts = window
            .positions
            .iter()
            .filter(|p| starts.binary_search(*p).is_ok())
            .count() as f64
            / query.len() as f64;
        (MatchKind::Subsequence, 0.5 * compactness + 0.5 * on_word_starts)
    };

    // Single characters carry no length weighting.
    let coverage = if query.len() >= 2 {
        query.len() as f64 / name.len() as f64
    } else {
        1.0
    };

    Some(TextMatch {
        kind,
        score: kind.base() + TIER_BAND * (0.5 * quality + 0.5 * coverage),
    })
}

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

fn fold(s: &str) -> Vec<char> {
    s.chars().flat_map(char::to_lowercase).collect()
}

/// Indices where an alphanumeric run begins
fn word_starts(name: &[char]) -> Vec<usize> {
    let mut starts = Vec::new();
    let mut prev_alnum = false;
    for (i, c) in name.iter().enumerate() {
        let alnum = c.is_alphanumeric();
        if alnum && !prev_alnum {
            starts.push(i);
        }
        prev_alnum = alnum;
    }
    starts
}

/// Word index at which the query spells consecutive word initials
fn acronym_start(starts: &[usize], name: &[char], query: &[char]) -> Option<usize> {
    if query.len() < 2 || query.len() > starts.len() {
        return None;
    }
    (0..=starts.len() - query.len()).find(|&w| {
        query
            .iter()
            .zip(&starts[w..])
            .all(|(q, &i)| name[i] == *q)
    })
}

#[derive(Debug)]
struct Window {
    positions: Vec<usize>,
}

impl Window {
    fn span(&self) -> usize {
        match (self.positions.first(), self.positions.last()) {
            (Some(first), Some(last)) => last - first + 1,
            _ => 0,
        }
    }
}

/// Shortest greedy subsequence alignment; earliest wins ties
fn best_window(name: &[char], query: &[char]) -> Option<Window> {
    let mut best: Option<Window> = None;

    for start in (0..name.len()).filter(|&i| name[i] == query[0]) {
        let mut positions = Vec::with_capacity(query.len());
        let mut next = 0;
        for (i, c) in name.iter().enumerate().skip(start) {
            if *c == query[next] {
                positions.push(i);
                next += 1;
                if next == query.len() {
                    break;
                }
            }
        }
        if next < query.len() {
            // Later starts cannot complete either.
            break;
        }
        let window = Window { positions };
        if best.as_ref().map_or(true, |b| window.span() < b.span()) {
            best = Some(window);
        }
    }

    best
}
