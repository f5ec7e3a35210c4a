use crate::failure::{FailureSink, InitializationError, SharedFailureSink};
use crate::logging::{FactoryCatalog, LogResolver, SharedLogFactory, SharedLogger, LOG_FACTORY_KEY};
use crate::registry::ResourceRegistry;
use std::sync::{Arc, OnceLock};
use tracing::{error, info};

/// Everything a pipeline component needs to report failures and find loggers.
///
/// Built once at process start and handed (usually as `Arc<PipelineContext>`)
/// to every component, instead of reaching for global singletons.
///
/// # Wiring
///
/// ```rust
/// use pipeline_failsafe::lifecycle::PipelineContext;
/// use pipeline_failsafe::logging::FactoryCatalog;
///
/// let ctx = PipelineContext::default();
/// let catalog = FactoryCatalog::with_builtin_backends();
///
/// ctx.install_log_factory(&catalog, "tracing").unwrap();
///
/// let log = ctx.logger("Pipeline.Rating").unwrap();
/// log.info("rating started");
/// assert!(!ctx.sink().has_fatal());
/// ```
#[derive(Debug)]
pub struct PipelineContext {
    registry: Arc<ResourceRegistry>,
    sink: SharedFailureSink,
    resolver: OnceLock<LogResolver>,
}

impl Default for PipelineContext {
    fn default() -> Self {
        Self::new(Arc::new(ResourceRegistry::new()), FailureSink::shared())
    }
}

impl PipelineContext {
    pub fn new(registry: Arc<ResourceRegistry>, sink: SharedFailureSink) -> Self {
        Self {
            registry,
            sink,
            resolver: OnceLock::new(),
        }
    }

    pub fn registry(&self) -> &Arc<ResourceRegistry> {
        &self.registry
    }

    pub fn sink(&self) -> &SharedFailureSink {
        &self.sink
    }

    /// The log resolver, constructed on first use.
    pub fn log_resolver(&self) -> &LogResolver {
        self.resolver
            .get_or_init(|| LogResolver::new(Arc::clone(&self.registry), Arc::clone(&self.sink)))
    }

    /// Shortcut for `log_resolver().logger(name)`.
    pub fn logger(&self, name: &str) -> Option<SharedLogger> {
        self.log_resolver().logger(name)
    }

    /// Publishes `factory` under [`LOG_FACTORY_KEY`], replacing any previous one.
    ///
    /// Takes the trait-object handle so a concrete `Arc<F>` is coerced on the
    /// way in; the resolver only ever finds a [`SharedLogFactory`] there.
    pub fn publish_log_factory(&self, factory: SharedLogFactory) {
        self.registry.register(LOG_FACTORY_KEY, factory);
    }

    /// Resolves the backend named `identifier` and publishes it under
    /// [`LOG_FACTORY_KEY`].
    ///
    /// On failure nothing is published; the error is reported to the sink and
    /// also returned so startup code can stop early.
    pub fn install_log_factory(
        &self,
        catalog: &FactoryCatalog,
        identifier: &str,
    ) -> Result<(), InitializationError> {
        match catalog.resolve(identifier) {
            Ok(factory) => {
                self.publish_log_factory(factory);
                info!(identifier, "Log factory installed");
                Ok(())
            }
            Err(e) => {
                error!(identifier, error = %e, "Log factory installation failed");
                self.sink.report(e.clone());
                Err(e)
            }
        }
    }
}
