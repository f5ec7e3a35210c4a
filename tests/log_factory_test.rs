use pipeline_failsafe::failure::InitializationError;
use pipeline_failsafe::logging::{
    FactoryCatalog, LogFactory, LogLevel, ResolveError, SharedLogFactory, SharedLogger,
    TracingLogFactory, LOG_FACTORY_KEY,
};
use pipeline_failsafe::registry::ResourceRegistry;
use std::sync::Arc;
use std::thread;

/// A backend that cannot be built without arguments.
#[derive(Debug)]
struct NeedsEndpointFactory {
    _endpoint: String,
}

impl LogFactory for NeedsEndpointFactory {
    fn logger(&self, _name: &str) -> Option<SharedLogger> {
        None
    }

    fn default_logger(&self) -> Result<SharedLogger, InitializationError> {
        Err(InitializationError::new("no endpoint"))
    }
}

#[derive(Debug, Default)]
struct RateCache;

fn catalog() -> FactoryCatalog {
    let mut catalog = FactoryCatalog::with_builtin_backends();
    catalog
        .register_log_factory_with("syslog", || {
            std::env::var("PIPELINE_TEST_SYSLOG_ENDPOINT_THAT_IS_NEVER_SET")
                .map(|endpoint| NeedsEndpointFactory {
                    _endpoint: endpoint,
                })
        })
        .register_resource("rate-cache", || Ok::<_, std::io::Error>(RateCache));
    catalog
}

fn resolve_cause(result: Result<SharedLogFactory, InitializationError>) -> ResolveError {
    let err = result.expect_err("resolution should fail");
    err.cause_as::<ResolveError>()
        .cloned()
        .expect("cause should be a ResolveError")
}

#[test]
fn test_resolve_builtin_backends() {
    let catalog = catalog();

    let tracing = catalog.resolve("tracing").expect("tracing backend");
    let logger = tracing.logger("Pipeline.Rating").expect("logger");
    assert_eq!(logger.name(), "Pipeline.Rating");
    logger.info("resolved");

    let null = catalog.resolve("  null ").expect("identifier is trimmed");
    let silent = null.logger("anything").expect("logger");
    assert!(!silent.is_enabled(LogLevel::Fatal));
}

#[test]
fn test_resolve_unset_identifier() {
    let catalog = catalog();
    assert!(matches!(resolve_cause(catalog.resolve("")), ResolveError::Unset));
    assert!(matches!(resolve_cause(catalog.resolve("   ")), ResolveError::Unset));
}

#[test]
fn test_resolve_unknown_identifier() {
    let cause = resolve_cause(catalog().resolve("log4rs"));
    match cause {
        ResolveError::NotFound { identifier } => assert_eq!(identifier, "log4rs"),
        other => panic!("unexpected cause: {other:?}"),
    }
}

#[test]
fn test_resolve_construction_failure() {
    let err = catalog().resolve("syslog").expect_err("cannot construct");
    assert!(err.message().contains("default constructor"));

    match err.cause_as::<ResolveError>() {
        Some(ResolveError::ConstructionFailed { identifier, source }) => {
            assert_eq!(identifier, "syslog");
            assert!(source.downcast_ref::<std::env::VarError>().is_some());
        }
        other => panic!("unexpected cause: {other:?}"),
    }
}

#[test]
fn test_resolve_type_mismatch() {
    let cause = resolve_cause(catalog().resolve("rate-cache"));
    match cause {
        ResolveError::TypeMismatch { identifier, found } => {
            assert_eq!(identifier, "rate-cache");
            assert!(found.ends_with("RateCache"), "found = {found}");
        }
        other => panic!("unexpected cause: {other:?}"),
    }
}

#[test]
fn test_catalog_identifiers_are_sorted() {
    let catalog = catalog();
    let ids: Vec<&str> = catalog.identifiers().collect();
    assert_eq!(ids, ["null", "rate-cache", "syslog", "tracing"]);
    assert!(catalog.contains("syslog"));
    assert!(!catalog.contains("log4rs"));
}

#[test]
fn test_tracing_factory_caches_loggers() {
    let factory = TracingLogFactory::default();

    let first = factory.logger("Pipeline.Audit").unwrap();
    let second = factory.logger("Pipeline.Audit").unwrap();
    assert!(Arc::ptr_eq(&first, &second));

    assert!(factory.logger("").is_none());
    assert_eq!(factory.default_logger().unwrap().name(), "default");
}

#[test]
fn test_logger_for_uses_qualified_type_name() {
    let factory: SharedLogFactory = Arc::new(TracingLogFactory::default());
    let logger = factory.logger_for::<RateCache>().unwrap();
    assert!(logger.name().ends_with("::RateCache"));
    assert!(logger.name().contains("log_factory_test"));
}

#[test]
fn test_registry_publishes_factory() {
    let registry = ResourceRegistry::new();
    assert!(registry.get::<SharedLogFactory>(LOG_FACTORY_KEY).is_none());

    let factory = catalog().resolve("tracing").unwrap();
    registry.register(LOG_FACTORY_KEY, factory.clone());

    let found = registry.get::<SharedLogFactory>(LOG_FACTORY_KEY).unwrap();
    assert!(Arc::ptr_eq(&found, &factory));
    assert!(registry.contains(LOG_FACTORY_KEY));
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_registry_overwrites_and_checks_type() {
    let registry = ResourceRegistry::new();
    registry.register("Limit", 10u32);
    registry.register("Limit", 20u32);
    assert_eq!(registry.get::<u32>("Limit"), Some(20));
    assert_eq!(registry.len(), 1);

    assert_eq!(registry.get::<u64>("Limit"), None);
    assert_eq!(registry.get::<u32>("Missing"), None);
}

#[test]
fn test_registry_concurrent_reads_after_startup() {
    let registry = Arc::new(ResourceRegistry::new());
    registry.register(LOG_FACTORY_KEY, catalog().resolve("null").unwrap());

    thread::scope(|scope| {
        for _ in 0..8 {
            let registry = &registry;
            scope.spawn(move || {
                for _ in 0..100 {
                    let factory = registry.get::<SharedLogFactory>(LOG_FACTORY_KEY).unwrap();
                    assert!(factory.logger("worker").is_some());
                }
            });
        }
    });
}
