use std::{
    path::Path,
    sync::{
        Arc, RwLock,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
};

use nodedoc_engine::{EngineConfig, FixedSampler, SuggestionEngine, SuggestionError};
use nodedoc_registry::{NodeCatalog, NodeRepository};
use nodedoc_types::NodeRecord;
use serde_json::json;

/// Catalog-backed repository that counts lookups and can be swapped or failed mid-test.
struct FixtureRepository {
    catalog: RwLock<NodeCatalog>,
    lookups: AtomicUsize,
    failing: AtomicBool,
}

impl FixtureRepository {
    fn load() -> Arc<Self> {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/data/nodes_fixture.json");
        let catalog = NodeCatalog::load(&path).expect("load fixture catalog");
        Arc::new(Self {
            catalog: RwLock::new(catalog),
            lookups: AtomicUsize::new(0),
            failing: AtomicBool::new(false),
        })
    }

    fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    fn replace(&self, record: NodeRecord) {
        self.catalog.write().expect("catalog lock").insert(record);
    }
}

impl NodeRepository for FixtureRepository {
    fn get_node(&self, node_type: &str) -> anyhow::Result<Option<NodeRecord>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            anyhow::bail!("catalog offline");
        }
        Ok(self.catalog.read().expect("catalog lock").find(node_type).cloned())
    }
}

fn engine_over(repository: Arc<FixtureRepository>, config: EngineConfig) -> SuggestionEngine {
    SuggestionEngine::with_sampler(repository, config, Arc::new(FixedSampler::never()))
}

fn engine() -> (Arc<FixtureRepository>, SuggestionEngine) {
    let repository = FixtureRepository::load();
    (repository.clone(), engine_over(repository, EngineConfig::default()))
}

const QUERIES: &[(&str, &str, Option<&str>)] = &[
    ("nodes-base.messenger", "sned", None),
    ("nodes-base.messenger", "Send", None),
    ("nodes-base.messenger", "remove", None),
    ("nodes-base.googleDrive", "listFiles", None),
    ("nodes-base.googleDrive", "removeFile", None),
    ("nodes-base.googleDrive", "downlod", None),
    ("nodes-base.slack", "sendMessage", None),
    ("nodes-base.slack", "sendMessage", Some("message")),
    ("nodes-base.slack", "getAl", Some("channel")),
    ("nodes-base.slack", "e", None),
];

#[test]
fn typo_suggests_intended_operation_first() {
    let (_, engine) = engine();
    let suggestions = engine.find_similar_operations("nodes-base.messenger", "sned", None, None);

    let best = suggestions.first().expect("at least one suggestion");
    assert_eq!(best.value, "send");
    assert!(best.confidence >= 0.7, "confidence too low: {}", best.confidence);
    assert_eq!(best.description.as_deref(), Some("Send a message"));
}

#[test]
fn storage_pattern_maps_list_files_to_search() {
    let (_, engine) = engine();
    let suggestions = engine.find_similar_operations("nodes-base.googleDrive", "listFiles", None, None);

    let best = suggestions.first().expect("at least one suggestion");
    assert_eq!(best.value, "search");
    assert_eq!(best.confidence, 0.85);
    assert_eq!(best.reason, "recognized pattern match");
    assert!(suggestions.iter().all(|suggestion| suggestion.value != "list"));
}

#[test]
fn repeated_queries_are_served_from_cache() {
    let (repository, engine) = engine();

    let first = engine.find_similar_operations("nodes-base.messenger", "sned", None, None);
    let lookups_after_first = repository.lookups();
    let second = engine.find_similar_operations("nodes-base.messenger", "sned", None, None);

    assert_eq!(first, second);
    assert_eq!(repository.lookups(), lookups_after_first);
}

#[test]
fn valid_operation_gets_no_suggestions() {
    let (_, engine) = engine();
    assert!(engine.find_similar_operations("nodes-base.messenger", "send", None, None).is_empty());
    assert!(
        engine
            .find_similar_operations("nodes-base.slack", "archive", Some("channel"), None)
            .is_empty()
    );
}

#[test]
fn suggestions_are_ranked_unique_and_grounded() {
    let (_, engine) = engine();

    for (node_type, invalid, resource) in QUERIES {
        let operations = engine.get_node_operations(node_type, *resource).expect("fixture operations");
        let suggestions = engine.find_similar_operations(node_type, invalid, *resource, Some(10));

        for pair in suggestions.windows(2) {
            assert!(
                pair[0].confidence >= pair[1].confidence,
                "{node_type}/{invalid}: not descending: {suggestions:?}"
            );
        }
        for (index, suggestion) in suggestions.iter().enumerate() {
            assert_ne!(suggestion.value, *invalid, "{node_type}: suggested the input itself");
            assert!(
                operations.iter().any(|operation| operation.operation == suggestion.value),
                "{node_type}/{invalid}: '{}' is not an operation",
                suggestion.value
            );
            assert!(
                suggestions[..index].iter().all(|earlier| earlier.value != suggestion.value),
                "{node_type}/{invalid}: duplicate '{}'",
                suggestion.value
            );
            assert!((0.0..=1.0).contains(&suggestion.confidence));
        }
    }
}

#[test]
fn max_results_caps_the_list() {
    let (_, engine) = engine();
    let unlimited = engine.find_similar_operations("nodes-base.slack", "e", None, Some(10));
    assert!(unlimited.len() > 2, "expected several candidates, got {unlimited:?}");

    let capped = engine.find_similar_operations("nodes-base.slack", "e", None, Some(2));
    assert_eq!(capped, unlimited[..2].to_vec());
}

#[test]
fn cached_results_respect_each_calls_limit() {
    let (repository, engine) = engine();
    repository.replace(
        NodeRecord::new("nodes-base.messenger").with_operations(json!(["send", "sent", "sand", "seed", "spend", "shed"])),
    );

    let wide = engine.find_similar_operations("nodes-base.messenger", "sned", None, Some(5));
    assert!(wide.len() > 1, "expected several candidates, got {wide:?}");
    let lookups = repository.lookups();

    let narrow = engine.find_similar_operations("nodes-base.messenger", "sned", None, Some(1));
    assert_eq!(narrow, wide[..1].to_vec());

    let wide_again = engine.find_similar_operations("nodes-base.messenger", "sned", None, Some(5));
    assert_eq!(wide_again, wide);
    assert_eq!(repository.lookups(), lookups);
}

#[test]
fn resource_filter_limits_candidates() {
    let (_, engine) = engine();
    let suggestions = engine.find_similar_operations("nodes-base.slack", "sned", Some("channel"), None);
    assert!(suggestions.iter().all(|suggestion| suggestion.value != "send"));

    let messages = engine.find_similar_operations("nodes-base.slack", "sned", Some("message"), None);
    assert_eq!(messages.first().map(|suggestion| suggestion.value.as_str()), Some("send"));
    assert_eq!(messages[0].resource.as_deref(), Some("message"));
}

#[test]
fn expired_operation_lists_are_refetched() {
    let repository = FixtureRepository::load();
    let config = EngineConfig {
        operation_cache_ttl_ms: 0,
        ..EngineConfig::default()
    };
    let engine = engine_over(repository.clone(), config);

    let before = engine.get_node_operations("nodes-base.messenger", None).expect("operations");
    assert_eq!(before.len(), 3);

    repository.replace(NodeRecord::new("nodes-base.messenger").with_operations(json!(["send", "archive"])));
    let after = engine.get_node_operations("nodes-base.messenger", None).expect("operations");
    let values: Vec<&str> = after.iter().map(|operation| operation.operation.as_str()).collect();
    assert_eq!(values, vec!["send", "archive"]);
}

#[test]
fn fresh_operation_lists_are_reused() {
    let (repository, engine) = engine();

    engine.get_node_operations("nodes-base.messenger", None).expect("operations");
    repository.replace(NodeRecord::new("nodes-base.messenger").with_operations(json!(["archive"])));
    let cached = engine.get_node_operations("nodes-base.messenger", None).expect("operations");

    assert_eq!(cached.len(), 3);
    assert_eq!(repository.lookups(), 1);

    engine.clear_cache();
    let refreshed = engine.get_node_operations("nodes-base.messenger", None).expect("operations");
    assert_eq!(refreshed.len(), 1);
}

#[test]
fn malformed_operations_degrade_to_no_suggestions() {
    let (_, engine) = engine();

    assert!(engine.find_similar_operations("nodes-base.broken", "sned", None, None).is_empty());
    let error = engine
        .get_node_operations("nodes-base.broken", None)
        .expect_err("malformed operations");
    assert!(matches!(error, SuggestionError::OperationParsing { .. }));
}

#[test]
fn repository_failures_degrade_to_no_suggestions() {
    let (repository, engine) = engine();
    repository.failing.store(true, Ordering::SeqCst);

    assert!(engine.find_similar_operations("nodes-base.messenger", "sned", None, None).is_empty());
    assert!(engine.get_node_operations("nodes-base.messenger", None).expect("degraded lookup").is_empty());

    repository.failing.store(false, Ordering::SeqCst);
    assert_eq!(engine.get_node_operations("nodes-base.messenger", None).expect("operations").len(), 3);
}

#[test]
fn unknown_node_has_no_suggestions() {
    let (_, engine) = engine();
    assert!(engine.find_similar_operations("nodes-base.missing", "sned", None, None).is_empty());
    assert!(engine.get_node_operations("nodes-base.missing", None).expect("lookup").is_empty());
}

#[test]
fn engine_is_shareable_across_threads() {
    let (_, engine) = engine();
    let engine = Arc::new(engine);

    std::thread::scope(|scope| {
        for _ in 0..4 {
            let engine = Arc::clone(&engine);
            scope.spawn(move || {
                for (node_type, invalid, resource) in QUERIES {
                    engine.find_similar_operations(node_type, invalid, *resource, None);
                }
            });
        }
    });

    let best = engine.find_similar_operations("nodes-base.messenger", "sned", None, None);
    assert_eq!(best[0].value, "send");
}
