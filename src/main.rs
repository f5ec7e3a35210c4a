//! # Pipeline Failsafe Demo
//!
//! Runs a small two-stage pipeline over synthetic call records.
//!
//! 1. Loads configuration (`--config` file, then env, then CLI flags).
//! 2. Resolves the configured log backend and publishes it.
//! 3. Runs cycles until the batches run out or a stage reports a fatal failure.
//!
//! ```bash
//! RUST_LOG=info cargo run -- --log-factory tracing --fail-at-cycle 3
//! ```

use clap::Parser;
use pipeline_failsafe::failure::ProcessingError;
use pipeline_failsafe::lifecycle::{
    setup_tracing, PipelineConfig, PipelineContext, PipelineSystem, Stage,
};
use pipeline_failsafe::logging::{FactoryCatalog, SharedLogger};
use pipeline_failsafe::record::{ErrorType, Record, RecordError};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

/// Payload that makes the rating stage give up.
const POISON: &str = "poison";

#[derive(Debug, Parser)]
#[command(
    name = "pipeline-failsafe",
    about = "Demo pipeline with cross-thread failure reporting"
)]
struct Args {
    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log backend identifier (overrides the config)
    #[arg(long)]
    log_factory: Option<String>,

    /// Number of cycles to run
    #[arg(long, default_value_t = 5)]
    cycles: usize,

    /// Records per cycle
    #[arg(long, default_value_t = 8)]
    batch_size: usize,

    /// Inject an unratable record in this cycle
    #[arg(long)]
    fail_at_cycle: Option<usize>,

    /// Worker threads per cycle
    #[arg(long, default_value_t = 4)]
    workers: usize,
}

/// Flags records whose duration is not a number. Never fatal.
struct ValidateStage;

impl Stage for ValidateStage {
    fn name(&self) -> &str {
        "Validate"
    }

    fn process(
        &self,
        record: &mut Record<String>,
        _ctx: &PipelineContext,
    ) -> Result<(), ProcessingError> {
        if record.payload() != POISON && record.payload().parse::<u32>().is_err() {
            let error = RecordError::new("duration is not a number", ErrorType::DataValidation)
                .with_module(self.name())
                .with_description(format!("got '{}'", record.payload()));
            record.add_error(error);
        }
        Ok(())
    }
}

/// Prices valid records; a poison record means the rate tables are unusable.
struct RateStage {
    log: SharedLogger,
}

impl Stage for RateStage {
    fn name(&self) -> &str {
        "Rate"
    }

    fn process(
        &self,
        record: &mut Record<String>,
        _ctx: &PipelineContext,
    ) -> Result<(), ProcessingError> {
        if record.payload() == POISON {
            return Err(ProcessingError::new("rate tables unusable"));
        }
        if record.has_errors() {
            return Ok(());
        }
        if let Ok(seconds) = record.payload().parse::<u32>() {
            let price = f64::from(seconds) * 0.002;
            self.log.debug(&format!("rated {seconds}s at {price:.4}"));
            *record.payload_mut() = format!("{seconds}:{price:.4}");
        }
        Ok(())
    }
}

fn load_config(args: &Args) -> Result<PipelineConfig, String> {
    let mut config = match &args.config {
        Some(path) => PipelineConfig::from_file(path).map_err(|e| e.to_string())?,
        None => PipelineConfig::default(),
    }
    .with_overrides(|key| std::env::var(key).ok())
    .map_err(|e| e.to_string())?;

    if let Some(identifier) = &args.log_factory {
        config.log_factory = Some(identifier.clone());
    }
    Ok(config)
}

fn synthetic_batches(args: &Args) -> Vec<Vec<Record<String>>> {
    (1..=args.cycles)
        .map(|cycle| {
            (0..args.batch_size)
                .map(|i| {
                    let poisoned = Some(cycle) == args.fail_at_cycle && i == args.batch_size / 2;
                    let payload = if poisoned {
                        POISON.to_string()
                    } else if i % 5 == 4 {
                        format!("{}s", i * 7)
                    } else {
                        (cycle * 60 + i * 13).to_string()
                    };
                    Record::new(payload)
                })
                .collect()
        })
        .collect()
}

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    let args = Args::parse();
    let config = load_config(&args)?;
    info!(?config, "Configuration loaded");

    let ctx = Arc::new(PipelineContext::default());
    let catalog = FactoryCatalog::with_builtin_backends();

    if let Err(e) = ctx.install_log_factory(&catalog, config.log_factory_identifier()) {
        let known: Vec<&str> = catalog.identifiers().collect();
        error!(error = %e, ?known, "Cannot start without a log backend");
        return Err(e.to_string());
    }

    let rate_log = ctx
        .logger("Pipeline.Rate")
        .unwrap_or_else(|| ctx.log_resolver().default_logger());
    let stages: Vec<Box<dyn Stage>> = vec![
        Box::new(ValidateStage),
        Box::new(RateStage { log: rate_log }),
    ];

    let system = PipelineSystem::new(config.pipeline_name.clone(), Arc::clone(&ctx), stages)
        .with_workers(args.workers)
        .with_cycle_interval(Duration::from_millis(config.cycle_interval_ms));

    match system.run(synthetic_batches(&args)).await {
        Ok(summary) => {
            info!(?summary, "Application completed successfully");
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Pipeline stopped on fatal failure");
            system.reset();
            Err(e.to_string())
        }
    }
}
