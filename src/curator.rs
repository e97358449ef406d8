use crate::model::{CurationOutcome, CurationStats, ScoredCandidate, SearchResult};
use crate::subject_filter::SubjectFilter;
use anyhow::Result;
use rayon::prelude::*;
use std::cmp::Reverse;
use std::collections::HashSet;
use tracing::{debug, warn};

/// Boundary to the remote media search. One query in, raw results out; the
/// pipeline owns failure absorption so a broken query can never fail a run.
pub trait QueryFetcher: Sync {
    fn fetch(&self, query: &str, limit: u32) -> Result<Vec<SearchResult>>;
}

/// Turns raw search results into a ranked, deduplicated, bounded URL pool.
pub struct CurationPipeline<F> {
    fetcher: F,
    filter: SubjectFilter,
    query_limit: u32,
}

impl<F: QueryFetcher> CurationPipeline<F> {
    pub fn new(fetcher: F, filter: SubjectFilter, query_limit: u32) -> Self {
        Self {
            fetcher,
            filter,
            query_limit,
        }
    }

    /// Run every configured query and build the candidate pool.
    ///
    /// Queries are fetched on the rayon pool; `collect` is the join barrier
    /// and preserves query order, so ranking ties always break by first
    /// appearance. An empty pool is a valid outcome, not an error.
    pub fn curate(&self, queries: &[String], limit: usize) -> CurationOutcome {
        let fetched: Vec<Option<Vec<SearchResult>>> = queries
            .par_iter()
            .map(|query| match self.fetcher.fetch(query, self.query_limit) {
                Ok(results) => {
                    debug!("Query '{}' returned {} results", query, results.len());
                    Some(results)
                }
                Err(e) => {
                    warn!("Query '{}' failed, continuing without it: {}", query, e);
                    None
                }
            })
            .collect();

        let mut stats = CurationStats {
            queries_run: queries.len(),
            ..CurationStats::default()
        };

        // Aggregate in query order, deduplicating by URL as results arrive so
        // a repeated URL keeps the score of its first appearance.
        let mut seen = HashSet::new();
        let mut candidates: Vec<ScoredCandidate> = Vec::new();
        for per_query in fetched {
            let Some(results) = per_query else {
                stats.queries_failed += 1;
                continue;
            };
            stats.results_seen += results.len();
            for result in results {
                if !self.filter.accept(&result.title) {
                    continue;
                }
                if !self.filter.quality_ok(&result) {
                    continue;
                }
                if !seen.insert(result.image_url.clone()) {
                    continue;
                }
                candidates.push(ScoredCandidate {
                    score: self.filter.score(&result),
                    image_url: result.image_url,
                });
            }
        }

        // Stable sort: equal scores stay in first-seen order.
        candidates.sort_by_key(|candidate| Reverse(candidate.score));
        candidates.truncate(limit);

        stats.results_kept = candidates.len();
        CurationOutcome {
            pool: candidates
                .into_iter()
                .map(|candidate| candidate.image_url)
                .collect(),
            stats,
        }
    }
}
