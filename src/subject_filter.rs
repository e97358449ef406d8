use crate::model::SearchResult;
use crate::storage::{FilterConfig, ScoringConfig};

/// Title/metadata predicate and ranking function for search results.
/// Pure over its inputs; a single instance is shared across rayon workers.
#[derive(Debug, Clone)]
pub struct SubjectFilter {
    filter: FilterConfig,
    scoring: ScoringConfig,
}

impl SubjectFilter {
    pub fn new(filter: FilterConfig, scoring: ScoringConfig) -> Self {
        Self { filter, scoring }
    }

    /// A title is on-subject when it contains at least one required term and
    /// none of the blocked terms. Matching is case-insensitive substring
    /// matching, so a blocked term inside a longer word still blocks.
    pub fn accept(&self, title: &str) -> bool {
        let title = title.to_lowercase();
        let has_subject = self
            .filter
            .required_terms
            .iter()
            .any(|term| title.contains(term.as_str()));
        let is_blocked = self
            .filter
            .blocked_terms
            .iter()
            .any(|term| title.contains(term.as_str()));
        has_subject && !is_blocked
    }

    /// Metadata gate: mime allow-list plus minimum dimensions. Always passes
    /// when no gate is configured.
    pub fn quality_ok(&self, result: &SearchResult) -> bool {
        let Some(gate) = &self.filter.quality else {
            return true;
        };
        gate.allowed_mime
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(&result.mime))
            && result.width >= gate.min_width
            && result.height >= gate.min_height
    }

    /// Sum of keyword-group weights hit by the title, plus a capped bonus for
    /// horizontal resolution.
    pub fn score(&self, result: &SearchResult) -> u32 {
        let title = result.title.to_lowercase();
        let keyword_score: u32 = self
            .scoring
            .keyword_weights
            .iter()
            .filter(|group| group.terms.iter().any(|term| title.contains(term.as_str())))
            .map(|group| group.weight)
            .sum();

        let resolution_bonus = if self.scoring.resolution_divisor > 0 {
            (result.width / self.scoring.resolution_divisor).min(self.scoring.resolution_bonus_cap)
        } else {
            0
        };

        keyword_score + resolution_bonus
    }
}
