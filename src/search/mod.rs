//! Result ranking
//!
//! Filters a caller-provided candidate snapshot by kind and context, scores
//! the survivors and returns them best first. A candidate whose scoring fails
//! is logged and left out; the search itself never fails.

use crate::catalog::{KindSet, Searchable};
use crate::config::RankingConfig;
use crate::error::Result;
use crate::relevance::{normalize_query, Relevance, RelevanceProvider};
use crate::scoring::MatchKind;
use crate::store::RelevanceStore;
use log::{debug, error, warn};
use std::cmp::Ordering;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// A ranked candidate
#[derive(Debug, Clone, Copy)]
pub struct ScoredResult<'a, T> {
    pub item: &'a T,
    pub score: f64,
    pub match_kind: MatchKind,
}

/// Which candidates take part in a search
#[derive(Clone, Copy, Default)]
pub struct SearchFilter<'f> {
    /// Accepted kinds; `None` accepts every kind
    pub kinds: Option<&'f KindSet>,
    /// Paired item the candidates must support
    pub context: Option<&'f dyn Searchable>,
}

impl<'f> SearchFilter<'f> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kinds(mut self, kinds: &'f KindSet) -> Self {
        self.kinds = Some(kinds);
        self
    }

    pub fn context(mut self, context: &'f dyn Searchable) -> Self {
        self.context = Some(context);
        self
    }

    /// Whether a candidate is eligible at all
    pub fn accepts(&self, candidate: &dyn Searchable) -> bool {
        if let Some(kinds) = self.kinds {
            if !kinds.contains(&candidate.kind()) {
                return false;
            }
        }
        match self.context {
            Some(context) => candidate.supports_context(context),
            None => true,
        }
    }
}

/// Ranking engine with injected persistence
pub struct SearchEngine {
    relevance: RelevanceProvider,
}

impl SearchEngine {
    pub fn new(store: Option<Arc<dyn RelevanceStore>>, config: RankingConfig) -> Result<Self> {
        Ok(Self {
            relevance: RelevanceProvider::new(store, config)?,
        })
    }

    /// Engine without learning
    pub fn without_store() -> Self {
        Self {
            relevance: RelevanceProvider::without_store(),
        }
    }

    pub fn relevance(&self) -> &RelevanceProvider {
        &self.relevance
    }

    /// Rank `candidates` for `query`, best first
    pub fn search<'a, T: Searchable>(
        &self,
        query: &str,
        candidates: &'a [T],
        filter: SearchFilter<'_>,
    ) -> Vec<ScoredResult<'a, T>> {
        let query = normalize_query(query);
        let mut results = Vec::new();
        let mut filtered = 0usize;
        let mut failed = 0usize;

        for item in candidates {
            let accepted = panic::catch_unwind(AssertUnwindSafe(|| filter.accepts(item)));
            match accepted {
                Ok(true) => {}
                Ok(false) => {
                    filtered += 1;
                    continue;
                }
                Err(_) => {
                    warn!("Filtering a candidate panicked; excluding it");
                    failed += 1;
                    continue;
                }
            }

            match self.score_one(item, &query) {
                Ok(Some(relevance)) if relevance.score > 0.0 => results.push(ScoredResult {
                    item,
                    score: relevance.score,
                    match_kind: relevance.match_kind,
                }),
                Ok(_) => {}
                Err(reason) => {
                    warn!("Excluding candidate from results: {}", reason);
                    failed += 1;
                }
            }
        }

        if query.is_empty() {
            // Browse mode: stable sort keeps catalog order among equals.
            results.sort_by(|a, b| b.score.total_cmp(&a.score));
        } else {
            results.sort_by(|a, b| compare_ranked(a, b));
        }

        debug!(
            "Search {:?}: {} candidates, {} filtered, {} failed, {} matched",
            query,
            candidates.len(),
            filtered,
            failed,
            results.len()
        );

        results
    }

    /// Score one candidate inside a recovery boundary
    fn score_one<T: Searchable>(
        &self,
        item: &T,
        query: &str,
    ) -> std::result::Result<Option<Relevance>, String> {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.relevance.relevance(item, query)));
        match outcome {
            Ok(Ok(relevance)) => Ok(relevance),
            Ok(Err(e)) => Err(format!("{}: {}", describe(item), e)),
            Err(payload) => Err(format!("{}: panicked: {}", describe(item), panic_message(&*payload))),
        }
    }

    /// The user picked `candidate` for `query`
    pub fn report_selected(&self, candidate: &dyn Searchable, query: &str) -> Result<()> {
        self.relevance.increase_relevance(candidate, query)
    }

    /// The user skipped past `candidate` to pick a lower-ranked one
    pub fn report_rejected(&self, candidate: &dyn Searchable, query: &str) -> Result<()> {
        self.relevance.decrease_relevance(candidate, query)
    }

    /// Report a pick from a ranked list: the chosen result gains, every result
    /// ranked above it loses
    pub fn report_choice<T: Searchable>(
        &self,
        results: &[ScoredResult<'_, T>],
        chosen: usize,
        query: &str,
    ) -> Result<()> {
        let Some(picked) = results.get(chosen) else {
            return Ok(());
        };
        for skipped in &results[..chosen] {
            self.report_rejected(skipped.item, query)?;
        }
        self.report_selected(picked.item, query)
    }
}

/// Send panic reports to the `error` log instead of stderr.
///
/// Panics caught while scoring a candidate are then reported only through
/// `log`, followed by the `warn` line naming the excluded candidate.
pub fn log_panics() {
    panic::set_hook(Box::new(|info| {
        error!("{}", info);
    }));
}

/// Score descending, then shorter name, then name
fn compare_ranked<T: Searchable>(a: &ScoredResult<'_, T>, b: &ScoredResult<'_, T>) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.item.name().chars().count().cmp(&b.item.name().chars().count()))
        .then_with(|| a.item.name().cmp(b.item.name()))
}

fn describe<T: Searchable>(item: &T) -> String {
    panic::catch_unwind(AssertUnwindSafe(|| item.id().to_string()))
        .unwrap_or_else(|_| "<unidentifiable candidate>".to_string())
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
