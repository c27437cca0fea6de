//! Learned relevance bias
//!
//! Every selection adds one to two counters: one for the (candidate, query)
//! pair and one for the candidate overall. Rejections subtract one. The bias
//! scales the text match score by a factor bounded in
//! `(1 - bias_weight, 1 + bias_weight)` that is strictly increasing in the
//! counters, so a single reinforcement always moves the score and a score
//! never changes sign.

use crate::catalog::Searchable;
use crate::config::RankingConfig;
use crate::error::Result;
use crate::scoring::{MatchKind, Scorer};
use crate::store::RelevanceStore;
use log::debug;
use std::sync::Arc;

/// Separates the candidate id from the query inside a store key
const KEY_SEPARATOR: char = '\u{1f}';

/// Trim, lowercase and collapse whitespace runs
pub fn normalize_query(query: &str) -> String {
    query
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Store key for the (candidate, normalized query) counter
pub fn query_key(candidate_id: &str, normalized_query: &str) -> String {
    format!("q{}{}{}{}", KEY_SEPARATOR, candidate_id, KEY_SEPARATOR, normalized_query)
}

/// Store key for the candidate's overall counter
pub fn item_key(candidate_id: &str) -> String {
    format!("i{}{}", KEY_SEPARATOR, candidate_id)
}

/// Split a store key into (candidate id, query); query is `None` for item keys
pub fn parse_key(key: &str) -> Option<(&str, Option<&str>)> {
    let mut parts = key.splitn(3, KEY_SEPARATOR);
    match (parts.next()?, parts.next()?, parts.next()) {
        ("q", id, Some(query)) => Some((id, Some(query))),
        ("i", id, None) => Some((id, None)),
        _ => None,
    }
}

/// Final score of one candidate for one query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Relevance {
    pub match_kind: MatchKind,
    pub text_score: f64,
    pub bias: f64,
    pub score: f64,
}

/// Combines text matching with the persisted bias
pub struct RelevanceProvider {
    store: Option<Arc<dyn RelevanceStore>>,
    config: RankingConfig,
    scorer: Scorer,
}

impl RelevanceProvider {
    /// Create a provider; `store` may be absent, in which case bias is zero
    pub fn new(store: Option<Arc<dyn RelevanceStore>>, config: RankingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            store,
            scorer: Scorer::new(config.match_description),
            config,
        })
    }

    /// Provider with default weights and no learning
    pub fn without_store() -> Self {
        Self {
            store: None,
            config: RankingConfig::default(),
            scorer: Scorer::default(),
        }
    }

    pub fn config(&self) -> &RankingConfig {
        &self.config
    }

    pub fn store(&self) -> Option<&Arc<dyn RelevanceStore>> {
        self.store.as_ref()
    }

    /// Record that `candidate` was chosen for `query`
    pub fn increase_relevance(&self, candidate: &dyn Searchable, query: &str) -> Result<()> {
        self.reinforce(candidate, query, 1.0)
    }

    /// Record that `candidate` was passed over for `query`
    pub fn decrease_relevance(&self, candidate: &dyn Searchable, query: &str) -> Result<()> {
        self.reinforce(candidate, query, -1.0)
    }

    fn reinforce(&self, candidate: &dyn Searchable, query: &str, delta: f64) -> Result<()> {
        let Some(store) = &self.store else {
            debug!("No relevance store, ignoring reinforcement for {}", candidate.id());
            return Ok(());
        };
        let query = normalize_query(query);
        let per_query_key = query_key(candidate.id(), &query);
        let overall_key = item_key(candidate.id());
        let values = store.adjust_many(&[(per_query_key.as_str(), delta), (overall_key.as_str(), delta)])?;
        debug!(
            "Relevance of {} for {:?}: counters {:?}",
            candidate.id(),
            query,
            values
        );
        Ok(())
    }

    /// Stored bias for (candidate, query); zero without a store
    pub fn bias(&self, candidate: &dyn Searchable, query: &str) -> Result<f64> {
        let Some(store) = &self.store else {
            return Ok(0.0);
        };
        let query = normalize_query(query);
        let per_query = store.get(&query_key(candidate.id(), &query))?;
        let overall = store.get(&item_key(candidate.id()))?;
        Ok(per_query + self.config.item_weight * overall)
    }

    /// Multiplier applied to the text score for a given bias
    pub fn bias_factor(&self, bias: f64) -> f64 {
        1.0 + self.config.bias_weight * bias / (bias.abs() + self.config.bias_softness)
    }

    /// Full relevance of a candidate, `None` when the text does not match
    pub fn relevance(&self, candidate: &dyn Searchable, query: &str) -> Result<Option<Relevance>> {
        let query = normalize_query(query);
        let Some(text) = self
            .scorer
            .score(&query, candidate.name(), candidate.description())
        else {
            return Ok(None);
        };
        let bias = self.bias(candidate, &query)?;
        Ok(Some(Relevance {
            match_kind: text.kind,
            text_score: text.score,
            bias,
            score: text.score * self.bias_factor(bias),
        }))
    }

    /// Text match combined with stored bias; zero when the text does not match
    pub fn update_relevance(&self, candidate: &dyn Searchable, query: &str) -> Result<f64> {
        Ok(self
            .relevance(candidate, query)?
            .map_or(0.0, |relevance| relevance.score))
    }
}
