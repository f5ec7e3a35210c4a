use super::context::PipelineContext;
use crate::failure::ProcessingError;
use crate::logging::{framework_command, pipe_command, SharedLogger};
use crate::record::Record;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};

/// Category of the orchestrator's own logger.
pub const PIPELINE_LOGGER: &str = "Pipeline";

/// One processing step applied to every record.
///
/// Returning `Err` means the stage cannot continue at all: the worker reports
/// the error to the sink and stops. Problems with a single record belong on
/// the record instead ([`Record::add_error`]).
pub trait Stage: Send + Sync {
    fn name(&self) -> &str;

    fn process(
        &self,
        record: &mut Record<String>,
        ctx: &PipelineContext,
    ) -> Result<(), ProcessingError>;
}

/// Counters for a completed run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub cycles: usize,
    pub records: usize,
    pub records_with_errors: usize,
}

/// Minimal orchestrator driving stages over batches of records.
///
/// Each batch is one cycle: the batch is split across worker threads
/// (`spawn_blocking`), every worker pushes its records through all stages,
/// and once all workers are joined the cycle boundary checks the sink.
///
/// ```rust
/// use pipeline_failsafe::lifecycle::{PipelineContext, PipelineSystem, Stage};
/// use pipeline_failsafe::logging::FactoryCatalog;
/// use pipeline_failsafe::failure::ProcessingError;
/// use pipeline_failsafe::record::Record;
/// use std::sync::Arc;
///
/// struct Upper;
/// impl Stage for Upper {
///     fn name(&self) -> &str { "Upper" }
///     fn process(&self, r: &mut Record<String>, _: &PipelineContext) -> Result<(), ProcessingError> {
///         *r.payload_mut() = r.payload().to_uppercase();
///         Ok(())
///     }
/// }
///
/// #[tokio::main]
/// async fn main() {
///     let ctx = Arc::new(PipelineContext::default());
///     ctx.install_log_factory(&FactoryCatalog::with_builtin_backends(), "null").unwrap();
///
///     let system = PipelineSystem::new("demo", ctx, vec![Box::new(Upper)]);
///
///     let batch = vec![Record::new("a".to_string()), Record::new("b".to_string())];
///     let summary = system.run(vec![batch]).await.unwrap();
///     assert_eq!(summary.records, 2);
/// }
/// ```
pub struct PipelineSystem {
    name: String,
    ctx: Arc<PipelineContext>,
    stages: Arc<Vec<Box<dyn Stage>>>,
    workers: usize,
    cycle_interval: Duration,
}

impl PipelineSystem {
    pub fn new(
        name: impl Into<String>,
        ctx: Arc<PipelineContext>,
        stages: Vec<Box<dyn Stage>>,
    ) -> Self {
        Self {
            name: name.into(),
            ctx,
            stages: Arc::new(stages),
            workers: 4,
            cycle_interval: Duration::from_millis(1),
        }
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Minimum spacing between cycle starts; clamped to at least 1ms.
    pub fn with_cycle_interval(mut self, cycle_interval: Duration) -> Self {
        self.cycle_interval = cycle_interval.max(Duration::from_millis(1));
        self
    }

    pub fn context(&self) -> &Arc<PipelineContext> {
        &self.ctx
    }

    /// Processes one batch per cycle until the batches run out or a fatal
    /// failure is observed at a cycle boundary.
    ///
    /// The orchestrator's own logger is resolved through the context first, so
    /// running without a published log factory fails at the first boundary.
    ///
    /// On a fatal failure every stored failure is logged and the first one is
    /// returned, see [`FailureSink::rethrow_first`](crate::failure::FailureSink::rethrow_first).
    /// The sink is left as-is; call [`reset`](Self::reset) before another run.
    pub async fn run<I>(&self, batches: I) -> Result<RunSummary, ProcessingError>
    where
        I: IntoIterator<Item = Vec<Record<String>>>,
    {
        let log = self.logger();
        log.info(&framework_command("Start", &self.name));

        let mut summary = RunSummary::default();
        let mut interval = tokio::time::interval(self.cycle_interval);

        for batch in batches {
            interval.tick().await;
            summary.cycles += 1;
            debug!(
                pipeline = %self.name,
                cycle = summary.cycles,
                size = batch.len(),
                "Cycle started"
            );

            let records = self.run_cycle(batch).await;

            // Cycle boundary
            let sink = self.ctx.sink();
            if sink.has_fatal() {
                for failure in sink.drain() {
                    error!(
                        pipeline = %self.name,
                        kind = %failure.kind(),
                        error = %failure,
                        "Pipeline failure"
                    );
                }
                log.fatal(&pipe_command(
                    PIPELINE_LOGGER,
                    &self.name,
                    "Abort",
                    &summary.cycles.to_string(),
                ));
                sink.rethrow_first()?;
            }

            summary.records += records.len();
            summary.records_with_errors += records.iter().filter(|r| r.has_errors()).count();
        }

        info!(pipeline = %self.name, ?summary, "Pipeline finished");
        log.info(&framework_command("Stop", &self.name));
        Ok(summary)
    }

    /// Clears the sink between runs.
    pub fn reset(&self) {
        self.ctx.sink().clear();
    }

    async fn run_cycle(&self, batch: Vec<Record<String>>) -> Vec<Record<String>> {
        let chunk_size = batch.len().div_ceil(self.workers).max(1);
        let mut pending = batch.into_iter();
        let mut handles = Vec::with_capacity(self.workers);

        loop {
            let chunk: Vec<Record<String>> = pending.by_ref().take(chunk_size).collect();
            if chunk.is_empty() {
                break;
            }
            let ctx = Arc::clone(&self.ctx);
            let stages = Arc::clone(&self.stages);
            handles.push(tokio::task::spawn_blocking(move || {
                process_chunk(&ctx, &stages, chunk)
            }));
        }

        let mut processed = Vec::new();
        for handle in handles {
            match handle.await {
                Ok(records) => processed.extend(records),
                Err(e) => self
                    .ctx
                    .sink()
                    .report(ProcessingError::new(format!("Worker failed: {e}"))),
            }
        }
        processed
    }

    fn logger(&self) -> SharedLogger {
        let resolver = self.ctx.log_resolver();
        resolver
            .logger(PIPELINE_LOGGER)
            .unwrap_or_else(|| resolver.default_logger())
    }
}

fn process_chunk(
    ctx: &PipelineContext,
    stages: &[Box<dyn Stage>],
    chunk: Vec<Record<String>>,
) -> Vec<Record<String>> {
    let mut processed = Vec::with_capacity(chunk.len());
    for mut record in chunk {
        for stage in stages {
            if let Err(e) = stage.process(&mut record, ctx) {
                debug!(stage = stage.name(), error = %e, "Stage aborted worker");
                ctx.sink().report(e);
                return processed;
            }
        }
        processed.push(record);
    }
    processed
}
