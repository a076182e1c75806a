use std::{collections::HashSet, fmt, sync::Arc};

use indexmap::IndexMap;
use nodedoc_registry::NodeRepository;
use nodedoc_types::{OperationDescriptor, SimilaritySuggestion};
use tracing::{debug, warn};

use crate::{
    EngineConfig, SuggestionError,
    cache::{OperationCache, SuggestionCache},
    normalizer::normalize_operations,
    patterns::get_node_patterns,
    sampler::{MaintenanceSampler, RandomSampler},
    similarity::{calculate_similarity, get_similarity_reason},
};

const PATTERN_REASON: &str = "recognized pattern match";

/// Produces ranked "did you mean" suggestions for invalid node operations.
///
/// The engine owns two caches:
///
/// - an operation cache holding normalized operation lists per
///   `(node, resource)`, refreshed after the configured TTL;
/// - a suggestion cache holding finished results per
///   `(node, invalid value, resource)`, trimmed to the most recent entries
///   once it grows past its high-water mark.
///
/// Both are guarded by mutexes so one engine can serve concurrent requests.
/// Cache maintenance is opportunistic: each lookup asks the
/// [`MaintenanceSampler`] whether to run cleanup, so no background task is
/// needed.
pub struct SuggestionEngine {
    repository: Arc<dyn NodeRepository>,
    sampler: Arc<dyn MaintenanceSampler>,
    config: EngineConfig,
    operation_cache: OperationCache,
    suggestion_cache: SuggestionCache,
}

impl fmt::Debug for SuggestionEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SuggestionEngine")
            .field("config", &self.config)
            .field("cached_operation_lists", &self.operation_cache.len())
            .field("cached_suggestion_lists", &self.suggestion_cache.len())
            .finish()
    }
}

impl SuggestionEngine {
    pub fn new(repository: Arc<dyn NodeRepository>, config: EngineConfig) -> Self {
        Self::with_sampler(repository, config, Arc::new(RandomSampler))
    }

    pub fn with_sampler(repository: Arc<dyn NodeRepository>, config: EngineConfig, sampler: Arc<dyn MaintenanceSampler>) -> Self {
        Self {
            operation_cache: OperationCache::new(config.operation_cache_ttl()),
            suggestion_cache: SuggestionCache::new(config.suggestion_cache_high_water, config.suggestion_cache_retain),
            repository,
            sampler,
            config,
        }
    }

    /// Suggests existing operations for `invalid` on `node_type`, best first.
    ///
    /// Never fails: lookup problems are logged and produce an empty list.
    /// Returns an empty list when `invalid` is itself a valid operation.
    /// `max_results` defaults to the configured limit.
    pub fn find_similar_operations(
        &self,
        node_type: &str,
        invalid: &str,
        resource: Option<&str>,
        max_results: Option<usize>,
    ) -> Vec<SimilaritySuggestion> {
        let cache_key = SuggestionCache::key(node_type, invalid, resource);
        let mut suggestions = match self.suggestion_cache.get(&cache_key) {
            Some(cached) => {
                debug!(node_type = %node_type, cache_key = %cache_key, "suggestion cache hit");
                cached
            }
            None => {
                let ranked = self.rank_suggestions(node_type, invalid, resource);
                debug!(
                    node_type = %node_type,
                    cache_key = %cache_key,
                    suggestion_count = ranked.len(),
                    "suggestions computed"
                );
                self.suggestion_cache.insert(cache_key, ranked.clone());
                ranked
            }
        };
        // The cache holds the full ranking; each caller gets its own cut.
        suggestions.truncate(max_results.unwrap_or(self.config.default_max_results));

        if self.sampler.sample(self.config.suggestion_cleanup_probability) {
            self.cleanup_caches();
        }
        suggestions
    }

    /// Returns the normalized operations for `node_type`, restricted to `resource` when given.
    ///
    /// Unknown nodes and repository failures yield an empty list that is not
    /// cached. Only malformed stored operations are returned as errors.
    pub fn get_node_operations(&self, node_type: &str, resource: Option<&str>) -> Result<Vec<OperationDescriptor>, SuggestionError> {
        let cache_key = OperationCache::key(node_type, resource);
        let result = match self.operation_cache.lookup_fresh(&cache_key) {
            Some(operations) => {
                debug!(node_type = %node_type, cache_key = %cache_key, "operation cache hit");
                Ok(operations)
            }
            None => self.load_operations(node_type, resource, cache_key),
        };

        if self.sampler.sample(self.config.operation_cleanup_probability) {
            self.cleanup_caches();
        }
        result
    }

    /// Whether the repository knows `node_type`. Repository failures count as unknown.
    pub fn has_node(&self, node_type: &str) -> bool {
        match self.repository.get_node(node_type) {
            Ok(record) => record.is_some(),
            Err(error) => {
                warn!(node_type = %node_type, %error, "node lookup failed");
                false
            }
        }
    }

    /// Empties both caches.
    pub fn clear_cache(&self) {
        self.operation_cache.clear();
        self.suggestion_cache.clear();
        debug!("suggestion engine caches cleared");
    }

    /// Evicts expired operation lists and trims the suggestion cache.
    pub(crate) fn cleanup_caches(&self) {
        let expired = self.operation_cache.evict_expired();
        let trimmed = self.suggestion_cache.trim();
        debug!(
            expired_operation_lists = expired,
            trimmed_suggestion_lists = trimmed,
            "suggestion engine cache cleanup"
        );
    }

    fn load_operations(&self, node_type: &str, resource: Option<&str>, cache_key: String) -> Result<Vec<OperationDescriptor>, SuggestionError> {
        let record = match self.repository.get_node(node_type) {
            Ok(Some(record)) => record,
            Ok(None) => {
                debug!(node_type = %node_type, "node not found; no operations");
                return Ok(Vec::new());
            }
            Err(error) => {
                warn!(node_type = %node_type, %error, "node lookup failed; no operations");
                return Ok(Vec::new());
            }
        };

        let operations = normalize_operations(&record, resource)?;
        debug!(
            node_type = %node_type,
            cache_key = %cache_key,
            operation_count = operations.len(),
            "operation cache miss; operations normalized"
        );
        self.operation_cache.store(cache_key, operations.clone());
        Ok(operations)
    }

    fn rank_suggestions(&self, node_type: &str, invalid: &str, resource: Option<&str>) -> Vec<SimilaritySuggestion> {
        let operations = match self.get_node_operations(node_type, resource) {
            Ok(operations) => operations,
            Err(error) => {
                warn!(node_type = %node_type, %error, "operation lookup failed; no suggestions");
                Vec::new()
            }
        };

        if operations.is_empty() || operations.iter().any(|operation| operation.operation == invalid) {
            return Vec::new();
        }

        let mut ranked: IndexMap<String, SimilaritySuggestion> = IndexMap::new();
        self.collect_pattern_suggestions(node_type, invalid, resource, &operations, &mut ranked);

        let pattern_values: HashSet<String> = ranked.keys().cloned().collect();
        for operation in operations.iter().filter(|operation| !pattern_values.contains(&operation.operation)) {
            let confidence = calculate_similarity(invalid, &operation.operation);
            if confidence <= self.config.min_confidence {
                continue;
            }
            merge_suggestion(
                &mut ranked,
                SimilaritySuggestion {
                    value: operation.operation.clone(),
                    confidence,
                    reason: get_similarity_reason(confidence, invalid, &operation.operation).to_string(),
                    description: operation.description.clone(),
                    resource: operation.resource.clone(),
                },
            );
        }

        let mut suggestions: Vec<SimilaritySuggestion> = ranked.into_values().collect();
        suggestions.sort_by(|left, right| right.confidence.total_cmp(&left.confidence));
        suggestions
    }

    fn collect_pattern_suggestions(
        &self,
        node_type: &str,
        invalid: &str,
        resource: Option<&str>,
        operations: &[OperationDescriptor],
        ranked: &mut IndexMap<String, SimilaritySuggestion>,
    ) {
        let invalid_lower = invalid.to_lowercase();
        if invalid_lower.is_empty() {
            return;
        }

        for entry in get_node_patterns(node_type) {
            let pattern_lower = entry.pattern.to_lowercase();
            if !invalid_lower.contains(&pattern_lower) && !pattern_lower.contains(&invalid_lower) {
                continue;
            }
            let Some(target) = find_operation(operations, entry.suggestion, resource) else {
                continue;
            };
            merge_suggestion(
                ranked,
                SimilaritySuggestion {
                    value: target.operation.clone(),
                    confidence: self.config.pattern_confidence,
                    reason: PATTERN_REASON.to_string(),
                    description: target.description.clone(),
                    resource: target.resource.clone(),
                },
            );
        }
    }
}

/// Finds `value` among `operations`, preferring a descriptor scoped to `resource`.
fn find_operation<'a>(operations: &'a [OperationDescriptor], value: &str, resource: Option<&str>) -> Option<&'a OperationDescriptor> {
    let mut matching = operations.iter().filter(|operation| operation.operation == value);
    let first = matching.next()?;
    if resource.is_none() || first.resource.as_deref() == resource {
        return Some(first);
    }
    Some(
        matching
            .find(|operation| operation.resource.as_deref() == resource)
            .unwrap_or(first),
    )
}

/// Keeps one suggestion per value, at its first position, with the highest confidence seen.
fn merge_suggestion(ranked: &mut IndexMap<String, SimilaritySuggestion>, candidate: SimilaritySuggestion) {
    match ranked.get_mut(&candidate.value) {
        Some(existing) if existing.confidence < candidate.confidence => *existing = candidate,
        Some(_) => {}
        None => {
            ranked.insert(candidate.value.clone(), candidate);
        }
    }
}
