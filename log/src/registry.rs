//! At-most-once logger construction per name.
//!
//! The registry lock is held from the moment a name is found missing until
//! its logger is inserted (or construction fails), so concurrent requests for
//! the same name wait for, and then reuse, the first one's logger. Nobody can
//! observe a logger with only some of its sinks attached.

use crate::{
    env::EnvReader,
    error::Result,
    logger::Logger,
    options::{LoggerOptions, Resolver, GLOBAL_PREFIX},
};
use parking_lot::{Mutex, MutexGuard};
use std::{
    collections::HashMap,
    sync::{Arc, OnceLock},
};

/// `None` is the unnamed logger, distinct from every string name.
type LoggerKey = Option<String>;

#[derive(Debug, Default)]
pub struct Registry {
    resolver: Resolver,
    loggers: Mutex<HashMap<LoggerKey, Logger>>,
}

/// Result of [`Registry::acquire`].
pub enum Acquired<'a> {
    /// Already built. Any new options for it are ignored.
    Configured(Logger),
    /// Not built yet; the registry stays locked until this is consumed.
    Vacant(VacantLogger<'a>),
}

impl Acquired<'_> {
    pub fn is_configured(&self) -> bool {
        matches!(self, Acquired::Configured(_))
    }
}

pub struct VacantLogger<'a> {
    loggers: MutexGuard<'a, HashMap<LoggerKey, Logger>>,
    resolver: &'a Resolver,
    name: LoggerKey,
}

impl VacantLogger<'_> {
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Resolve `options`, build the logger and register it.
    ///
    /// On error nothing is registered and the next request starts over.
    pub fn configure(self, options: &LoggerOptions) -> Result<Logger> {
        let config = self.resolver.resolve(self.name(), options)?;
        let logger = Logger::build(self.name(), config)?;
        Ok(self.insert(logger))
    }

    /// Register an already built logger under this name.
    pub fn insert(mut self, logger: Logger) -> Logger {
        self.loggers.insert(self.name, logger.clone());
        logger
    }
}

impl Registry {
    /// A registry reading the process environment with the `QUICKLOGS` prefix.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_resolver(resolver: Resolver) -> Self {
        Self {
            resolver,
            loggers: Mutex::default(),
        }
    }

    pub fn with_env(env: impl EnvReader + 'static) -> Self {
        Self::with_resolver(Resolver::new(Arc::new(env), GLOBAL_PREFIX))
    }

    /// The process-wide registry, created on first use.
    pub fn global() -> &'static Registry {
        static GLOBAL: OnceLock<Registry> = OnceLock::new();
        GLOBAL.get_or_init(Registry::new)
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    pub fn acquire(&self, name: Option<&str>) -> Acquired<'_> {
        let name = normalize(name);
        let loggers = self.loggers.lock();
        if let Some(logger) = loggers.get(&name) {
            return Acquired::Configured(logger.clone());
        }
        Acquired::Vacant(VacantLogger {
            loggers,
            resolver: &self.resolver,
            name,
        })
    }

    /// Return the logger for `name`, building it from `options` on first use.
    ///
    /// Later calls for the same name return the same logger and ignore their
    /// `options`.
    pub fn get_logger(&self, name: Option<&str>, options: &LoggerOptions) -> Result<Logger> {
        match self.acquire(name) {
            Acquired::Configured(logger) => Ok(logger),
            Acquired::Vacant(vacant) => vacant.configure(options),
        }
    }

    pub fn get(&self, name: Option<&str>) -> Option<Logger> {
        self.loggers.lock().get(&normalize(name)).cloned()
    }

    pub fn len(&self) -> usize {
        self.loggers.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.loggers.lock().is_empty()
    }

    /// Names of all configured loggers, unnamed first, the rest sorted.
    pub fn names(&self) -> Vec<Option<String>> {
        let mut names: Vec<_> = self.loggers.lock().keys().cloned().collect();
        names.sort();
        names
    }
}

fn normalize(name: Option<&str>) -> LoggerKey {
    name.filter(|n| !n.is_empty()).map(str::to_string)
}
