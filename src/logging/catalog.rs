//! # Factory Catalog
//!
//! Dynamic construction by name, without runtime type introspection.
//!
//! The catalog is an explicit table from string identifiers to constructor
//! functions, filled once at process start. [`FactoryCatalog::resolve`] looks
//! an identifier up, runs its zero-argument constructor and checks that the
//! result really is a [`LogFactory`]. Swapping the logging backend is then a
//! configuration change, not a recompilation.
//!
//! ## Failure causes
//!
//! Resolution either yields a fully usable factory or an
//! [`InitializationError`] whose cause is one of:
//!
//! | Cause | When |
//! |-------|------|
//! | [`ResolveError::Unset`] | identifier is empty or whitespace |
//! | [`ResolveError::NotFound`] | nothing registered under the identifier |
//! | [`ResolveError::ConstructionFailed`] | the constructor returned an error |
//! | [`ResolveError::TypeMismatch`] | the entry builds something that is not a log factory |
//!
//! ```rust
//! use pipeline_failsafe::logging::{FactoryCatalog, ResolveError};
//!
//! let catalog = FactoryCatalog::with_builtin_backends();
//!
//! let factory = catalog.resolve("tracing").unwrap();
//! assert!(factory.logger("Pipeline.Rating").is_some());
//!
//! let err = catalog.resolve("log4rs").unwrap_err();
//! assert!(matches!(err.cause_as::<ResolveError>(), Some(ResolveError::NotFound { .. })));
//! ```

use super::backends::{NullLogFactory, TracingLogFactory};
use super::factory::{LogFactory, SharedLogFactory};
use crate::failure::{ErrorCause, InitializationError};
use std::any::{type_name, Any};
use std::collections::BTreeMap;
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Error a catalog constructor may return.
pub type ConstructError = Box<dyn StdError + Send + Sync + 'static>;

type Constructor =
    Box<dyn Fn() -> Result<Box<dyn Any + Send + Sync>, ConstructError> + Send + Sync>;

/// Why a log factory could not be resolved.
#[derive(Debug, Clone, Error)]
pub enum ResolveError {
    #[error("log factory identifier is unset")]
    Unset,

    #[error("no implementation registered under '{identifier}'")]
    NotFound { identifier: String },

    #[error("implementation '{identifier}' failed to construct: {source}")]
    ConstructionFailed {
        identifier: String,
        source: ErrorCause,
    },

    #[error("implementation '{identifier}' builds a {found}, not a log factory")]
    TypeMismatch { identifier: String, found: String },
}

struct CatalogEntry {
    produces: &'static str,
    constructor: Constructor,
}

/// Table of named, zero-argument constructors.
#[derive(Default)]
pub struct FactoryCatalog {
    entries: BTreeMap<String, CatalogEntry>,
}

impl FactoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// A catalog with the backends shipped in this crate:
    /// `"tracing"` ([`TracingLogFactory`]) and `"null"` ([`NullLogFactory`]).
    pub fn with_builtin_backends() -> Self {
        let mut catalog = Self::new();
        catalog.register_log_factory::<TracingLogFactory>("tracing");
        catalog.register_log_factory::<NullLogFactory>("null");
        catalog
    }

    /// Registers a log factory built through its `Default` impl.
    pub fn register_log_factory<F>(&mut self, identifier: impl Into<String>) -> &mut Self
    where
        F: LogFactory + Default + 'static,
    {
        self.register_log_factory_with(identifier, || Ok::<_, ConstructError>(F::default()))
    }

    /// Registers a log factory with a fallible zero-argument constructor.
    pub fn register_log_factory_with<F, E, C>(
        &mut self,
        identifier: impl Into<String>,
        constructor: C,
    ) -> &mut Self
    where
        F: LogFactory + 'static,
        E: Into<ConstructError>,
        C: Fn() -> Result<F, E> + Send + Sync + 'static,
    {
        let constructor: Constructor =
            Box::new(move || -> Result<Box<dyn Any + Send + Sync>, ConstructError> {
                let factory = constructor().map_err(Into::<ConstructError>::into)?;
                let factory: SharedLogFactory = Arc::new(factory);
                Ok(Box::new(factory))
            });
        self.insert(identifier.into(), type_name::<F>(), constructor)
    }

    /// Registers a constructor for some other kind of plugin.
    ///
    /// Other plugin kinds may share the table; resolving one of them as a log
    /// factory is reported as [`ResolveError::TypeMismatch`].
    pub fn register_resource<R, E, C>(
        &mut self,
        identifier: impl Into<String>,
        constructor: C,
    ) -> &mut Self
    where
        R: Any + Send + Sync,
        E: Into<ConstructError>,
        C: Fn() -> Result<R, E> + Send + Sync + 'static,
    {
        let constructor: Constructor =
            Box::new(move || -> Result<Box<dyn Any + Send + Sync>, ConstructError> {
                let resource = constructor().map_err(Into::<ConstructError>::into)?;
                Ok(Box::new(resource))
            });
        self.insert(identifier.into(), type_name::<R>(), constructor)
    }

    fn insert(
        &mut self,
        identifier: String,
        produces: &'static str,
        constructor: Constructor,
    ) -> &mut Self {
        debug!(%identifier, produces, "Catalog entry registered");
        if self
            .entries
            .insert(identifier.clone(), CatalogEntry { produces, constructor })
            .is_some()
        {
            warn!(%identifier, "Catalog entry replaced");
        }
        self
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.entries.contains_key(identifier)
    }

    /// Registered identifiers, sorted.
    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Builds the log factory registered under `identifier`.
    #[tracing::instrument(skip(self))]
    pub fn resolve(&self, identifier: &str) -> Result<SharedLogFactory, InitializationError> {
        let result = self.try_resolve(identifier);
        match &result {
            Ok(factory) => info!(?factory, "Log factory resolved"),
            Err(e) => warn!(
                error = %e,
                cause = ?e.cause_as::<ResolveError>(),
                "Log factory resolution failed"
            ),
        }
        result
    }

    fn try_resolve(&self, identifier: &str) -> Result<SharedLogFactory, InitializationError> {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return Err(InitializationError::with_cause(
                "LogFactory.resolve(): LogFactory identifier is unset",
                ResolveError::Unset,
            ));
        }

        let Some(entry) = self.entries.get(identifier) else {
            return Err(InitializationError::with_cause(
                "LogFactory.resolve(): LogFactory implementation not found in catalog.",
                ResolveError::NotFound {
                    identifier: identifier.to_owned(),
                },
            ));
        };

        let built = (entry.constructor)().map_err(|source| {
            InitializationError::with_cause(
                "LogFactory.resolve(): Cannot construct LogFactory with its default constructor",
                ResolveError::ConstructionFailed {
                    identifier: identifier.to_owned(),
                    source: Arc::from(source),
                },
            )
        })?;

        built
            .downcast::<SharedLogFactory>()
            .map(|factory| *factory)
            .map_err(|_| {
                InitializationError::with_cause(
                    "LogFactory.resolve(): LogFactory identifier does not name a LogFactory implementation.",
                    ResolveError::TypeMismatch {
                        identifier: identifier.to_owned(),
                        found: entry.produces.to_owned(),
                    },
                )
            })
    }
}

impl fmt::Debug for FactoryCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(id, entry)| (id, entry.produces)))
            .finish()
    }
}
