use pipeline_failsafe::failure::{FailureKind, FailureSink};
use pipeline_failsafe::lifecycle::{try_setup_tracing, PipelineContext};
use pipeline_failsafe::logging::{
    cache_command, framework_command, pipe_command, FactoryCatalog, LogLevel, LogResolver,
    ResolveError, TracingLogFactory, LOG_FACTORY_KEY, NO_FACTORY_MESSAGE, NO_LOGGER_MESSAGE,
    WRONG_FACTORY_TYPE_MESSAGE,
};
use pipeline_failsafe::mock::MockLogFactory;
use pipeline_failsafe::registry::ResourceRegistry;
use std::sync::Arc;

fn resolver_with(mock: &Arc<MockLogFactory>) -> (LogResolver, Arc<FailureSink>) {
    let ctx = PipelineContext::default();
    ctx.publish_log_factory(mock.clone());
    (ctx.log_resolver().clone(), Arc::clone(ctx.sink()))
}

#[test]
fn test_no_factory_reports_once() {
    let sink = FailureSink::shared();
    let resolver = LogResolver::new(Arc::new(ResourceRegistry::new()), sink.clone());

    assert!(resolver.logger("x").is_none());

    let failures = sink.drain();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].kind(), FailureKind::Initialization);
    assert_eq!(failures[0].message(), NO_FACTORY_MESSAGE);
    assert_eq!(failures[0].message(), "No log factory found");
}

/// A factory stored under its concrete type is not the same as no factory.
#[test]
fn test_factory_with_wrong_type_is_diagnosed() {
    let ctx = PipelineContext::default();
    ctx.registry()
        .register(LOG_FACTORY_KEY, Arc::new(TracingLogFactory::default()));

    assert!(ctx.logger("Pipeline.Rating").is_none());

    let failures = ctx.sink().drain();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].kind(), FailureKind::Initialization);
    assert_eq!(failures[0].message(), WRONG_FACTORY_TYPE_MESSAGE);
    assert_ne!(failures[0].message(), NO_FACTORY_MESSAGE);

    // Publishing through the context coerces to the trait object
    ctx.sink().clear();
    ctx.publish_log_factory(Arc::new(TracingLogFactory::default()));
    assert!(ctx.logger("Pipeline.Rating").is_some());
    assert!(ctx.sink().is_empty());
}

#[test]
fn test_factory_without_logger_reports_once() {
    let mock = Arc::new(MockLogFactory::new());
    mock.expect_logger("x").return_none();
    let (resolver, sink) = resolver_with(&mock);

    assert!(resolver.logger("x").is_none());

    let failures = sink.drain();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].kind(), FailureKind::Initialization);
    assert_eq!(failures[0].message(), NO_LOGGER_MESSAGE);
    assert_eq!(failures[0].message(), "unable to load logger. Resource not found");
    mock.verify();
}

#[test]
fn test_resolved_logger_reports_nothing() {
    let mock = Arc::new(MockLogFactory::new());
    let recorder = mock.expect_logger("Pipeline.Rating").return_logger();
    let (resolver, sink) = resolver_with(&mock);

    let logger = resolver.logger("Pipeline.Rating").expect("logger");
    logger.warning("rate plan expires tomorrow");
    logger.error(&pipe_command("Rating", "Daily", "Reload", "full"));

    assert!(!sink.has_fatal());
    assert_eq!(
        recorder.lines(),
        vec![
            (LogLevel::Warning, "rate plan expires tomorrow".to_string()),
            (
                LogLevel::Error,
                "Command <Reload> handled by <Rating> in pipe <Daily> with parameter <full>"
                    .to_string()
            ),
        ]
    );
    mock.verify();
}

#[test]
fn test_logger_for_normalizes_type_name() {
    struct RatingStage;

    let mock = Arc::new(MockLogFactory::new());
    mock.expect_logger(std::any::type_name::<RatingStage>())
        .return_logger();
    let (resolver, sink) = resolver_with(&mock);

    assert!(resolver.logger_for::<RatingStage>().is_some());
    assert!(sink.is_empty());
    mock.verify();
}

#[test]
fn test_default_logger_needs_no_factory() {
    let sink = FailureSink::shared();
    let resolver = LogResolver::new(Arc::new(ResourceRegistry::new()), sink.clone());

    let fallback = resolver.default_logger();
    fallback.error("logging setup failed");

    assert_eq!(fallback.name(), "default");
    assert!(resolver.factory().is_none());
    assert!(!sink.has_fatal(), "default logger must not report");
}

#[test]
fn test_formatting_helpers() {
    assert_eq!(
        pipe_command("ModA", "PipeA", "START", "5"),
        "Command <START> handled by <ModA> in pipe <PipeA> with parameter <5>"
    );
    assert_eq!(
        framework_command("Shutdown", "now"),
        "Command <Shutdown> handled by <Framework> with parameter <now>"
    );
    assert_eq!(
        cache_command("TariffCache", "Reload", ""),
        "Command <Reload> handled by <TariffCache> with parameter <>"
    );
}

#[test]
fn test_context_installs_factory_and_resolves_lazily() {
    try_setup_tracing();

    let ctx = PipelineContext::default();
    let catalog = FactoryCatalog::with_builtin_backends();

    ctx.install_log_factory(&catalog, "tracing").expect("install");
    let first = ctx.log_resolver() as *const LogResolver;
    let second = ctx.log_resolver() as *const LogResolver;
    assert_eq!(first, second, "resolver is built once");

    let logger = ctx.logger("Pipeline.Output").expect("logger");
    logger.info("output opened");
    assert!(!ctx.sink().has_fatal());
}

#[test]
fn test_context_install_failure_is_reported() {
    let ctx = PipelineContext::default();
    let catalog = FactoryCatalog::with_builtin_backends();

    let err = ctx.install_log_factory(&catalog, "").unwrap_err();
    assert!(matches!(err.cause_as::<ResolveError>(), Some(ResolveError::Unset)));

    // Nothing published, failure recorded for the orchestrator
    assert!(ctx.log_resolver().factory().is_none());
    let failures = ctx.sink().drain();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].kind(), FailureKind::Initialization);
}

#[test]
fn test_context_shares_sink_with_workers() {
    let ctx = Arc::new(PipelineContext::default());

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let ctx = Arc::clone(&ctx);
            std::thread::spawn(move || ctx.logger(&format!("Worker{i}")))
        })
        .collect();

    for handle in handles {
        assert!(handle.join().unwrap().is_none());
    }

    let failures = ctx.sink().drain();
    assert_eq!(failures.len(), 4);
    assert!(failures.iter().all(|f| f.message() == NO_FACTORY_MESSAGE));
}
