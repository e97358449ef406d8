/// One raw hit from the media search API, before any filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub title: String,
    pub image_url: String,
    /// Empty when the API omitted media metadata.
    pub mime: String,
    pub width: u32,
    pub height: u32,
}

/// A search result that passed the subject filter, ranked for pool ordering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredCandidate {
    pub score: u32,
    pub image_url: String,
}

/// Counters for one curation run. Query failures are absorbed into empty
/// per-query results, so these counts are the only way to tell "API down"
/// apart from "nothing qualified".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CurationStats {
    pub queries_run: usize,
    pub queries_failed: usize,
    pub results_seen: usize,
    pub results_kept: usize,
}

/// Result of a curation run: the ranked, deduplicated pool plus its stats.
#[derive(Debug, Clone, Default)]
pub struct CurationOutcome {
    pub pool: Vec<String>,
    pub stats: CurationStats,
}
