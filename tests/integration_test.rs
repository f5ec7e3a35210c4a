use pipeline_failsafe::failure::{FailureKind, ProcessingError};
use pipeline_failsafe::lifecycle::{
    try_setup_tracing, ConfigError, PipelineConfig, PipelineContext, PipelineSystem, RunSummary,
    Stage, ENV_CYCLE_MS, ENV_LOG_FACTORY,
};
use pipeline_failsafe::logging::{FactoryCatalog, LogLevel, NO_FACTORY_MESSAGE};
use pipeline_failsafe::mock::MockLogFactory;
use pipeline_failsafe::record::{ErrorType, Record, RecordError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Flags non-numeric payloads, gives up entirely on "poison".
struct CheckStage {
    seen: Arc<AtomicUsize>,
}

impl Stage for CheckStage {
    fn name(&self) -> &str {
        "Check"
    }

    fn process(
        &self,
        record: &mut Record<String>,
        _ctx: &PipelineContext,
    ) -> Result<(), ProcessingError> {
        self.seen.fetch_add(1, Ordering::SeqCst);
        match record.payload().as_str() {
            "poison" => Err(ProcessingError::new("rate tables unusable")),
            p if p.parse::<u32>().is_err() => {
                record.add_error(
                    RecordError::new("not a number", ErrorType::DataValidation)
                        .with_module(self.name()),
                );
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

fn batch(payloads: &[&str]) -> Vec<Record<String>> {
    payloads.iter().map(|p| Record::new(p.to_string())).collect()
}

fn installed_context() -> Arc<PipelineContext> {
    let ctx = Arc::new(PipelineContext::default());
    ctx.install_log_factory(&FactoryCatalog::with_builtin_backends(), "tracing")
        .expect("tracing backend");
    ctx
}

fn check_system(ctx: Arc<PipelineContext>, seen: &Arc<AtomicUsize>) -> PipelineSystem {
    let stages: Vec<Box<dyn Stage>> = vec![Box::new(CheckStage {
        seen: Arc::clone(seen),
    })];
    PipelineSystem::new("rating", ctx, stages).with_workers(3)
}

#[tokio::test]
async fn test_run_counts_records_and_record_errors() {
    try_setup_tracing();
    let seen = Arc::new(AtomicUsize::new(0));
    let system = check_system(installed_context(), &seen);

    let summary = system
        .run(vec![
            batch(&["10", "20", "x", "30"]),
            batch(&["40", "y", "z"]),
        ])
        .await
        .expect("no fatal failure");

    assert_eq!(
        summary,
        RunSummary {
            cycles: 2,
            records: 7,
            records_with_errors: 3,
        }
    );
    assert_eq!(seen.load(Ordering::SeqCst), 7);
    assert!(!system.context().sink().has_fatal(), "record errors are not fatal");
}

#[tokio::test]
async fn test_fatal_stage_stops_at_cycle_boundary() {
    try_setup_tracing();
    let seen = Arc::new(AtomicUsize::new(0));
    let system = check_system(installed_context(), &seen).with_workers(1);

    let err = system
        .run(vec![
            batch(&["1", "2"]),
            batch(&["3", "poison", "4"]),
            batch(&["5", "6"]),
        ])
        .await
        .expect_err("poison is fatal");

    assert_eq!(err.message(), "rate tables unusable");
    // Single worker stops at the poison record; the third batch never starts
    assert_eq!(seen.load(Ordering::SeqCst), 4);

    let sink = system.context().sink();
    let failures = sink.drain();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].kind(), FailureKind::Processing);

    system.reset();
    assert!(!sink.has_fatal());

    let summary = system.run(vec![batch(&["7"])]).await.expect("clean run");
    assert_eq!(summary.records, 1);
}

#[tokio::test]
async fn test_run_without_log_factory_fails_first_cycle() {
    let seen = Arc::new(AtomicUsize::new(0));
    let system = check_system(Arc::new(PipelineContext::default()), &seen);

    let err = system
        .run(vec![batch(&["1"]), batch(&["2"])])
        .await
        .expect_err("no backend published");

    assert_eq!(err.message(), NO_FACTORY_MESSAGE);
    let original = err
        .cause_as::<pipeline_failsafe::failure::Failure>()
        .expect("original failure chained");
    assert_eq!(original.kind(), FailureKind::Initialization);
    assert_eq!(seen.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_orchestrator_logs_through_published_factory() {
    let ctx = Arc::new(PipelineContext::default());
    let mock = Arc::new(MockLogFactory::new());
    let recorder = mock.expect_logger("Pipeline").return_logger();
    ctx.publish_log_factory(mock.clone());

    let seen = Arc::new(AtomicUsize::new(0));
    let system = check_system(ctx, &seen);
    system.run(vec![batch(&["1", "2"])]).await.expect("clean run");

    assert_eq!(
        recorder.messages_at(LogLevel::Info),
        vec![
            "Command <Start> handled by <Framework> with parameter <rating>".to_string(),
            "Command <Stop> handled by <Framework> with parameter <rating>".to_string(),
        ]
    );
    assert!(recorder.messages_at(LogLevel::Fatal).is_empty());
    mock.verify();
}

#[test]
fn test_config_from_toml() {
    let config = PipelineConfig::from_toml_str(
        r#"
        log_factory = "tracing"
        pipeline_name = "rating"
        cycle_interval_ms = 50
        "#,
    )
    .unwrap();

    assert_eq!(config.log_factory_identifier(), "tracing");
    assert_eq!(config.pipeline_name, "rating");
    assert_eq!(config.cycle_interval_ms, 50);

    let defaults = PipelineConfig::from_toml_str("").unwrap();
    assert_eq!(defaults, PipelineConfig::default());
    assert_eq!(defaults.log_factory_identifier(), "");
}

#[test]
fn test_config_rejects_unknown_keys() {
    let err = PipelineConfig::from_toml_str("log_backend = \"tracing\"").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn test_config_overrides() {
    let config = PipelineConfig::default()
        .with_overrides(|key| match key {
            ENV_LOG_FACTORY => Some("null".to_string()),
            ENV_CYCLE_MS => Some(" 25 ".to_string()),
            _ => None,
        })
        .unwrap();

    assert_eq!(config.log_factory.as_deref(), Some("null"));
    assert_eq!(config.cycle_interval_ms, 25);
    assert_eq!(config.pipeline_name, "pipeline");

    let err = PipelineConfig::default()
        .with_overrides(|key| (key == ENV_CYCLE_MS).then(|| "soon".to_string()))
        .unwrap_err();
    match err {
        ConfigError::InvalidValue { key, value } => {
            assert_eq!(key, ENV_CYCLE_MS);
            assert_eq!(value, "soon");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_config_missing_file() {
    let err = PipelineConfig::from_file("/nonexistent/pipeline.toml").unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }));
}
