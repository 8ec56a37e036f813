//! Runner registry.
//!
//! Maps backend names to factories producing fresh [`Runner`] instances.
//! Reads vastly outnumber writes (registration happens once at startup), so
//! an `RwLock` over the factory table is sufficient. There is no hidden
//! static registration: backends are installed explicitly, typically into
//! [`RunnerRegistry::global`] from a single initialization routine.

use std::sync::{OnceLock, RwLock};

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::error::{HalError, HalResult};
use crate::runner::Runner;

/// Factory producing an independent runner instance per call.
pub type RunnerFactory = Box<dyn Fn() -> Box<dyn Runner> + Send + Sync>;

/// Thread-safe name → factory registry.
#[derive(Default)]
pub struct RunnerRegistry {
    factories: RwLock<FxHashMap<String, RunnerFactory>>,
}

impl RunnerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry.
    pub fn global() -> &'static RunnerRegistry {
        static GLOBAL: OnceLock<RunnerRegistry> = OnceLock::new();
        GLOBAL.get_or_init(RunnerRegistry::new)
    }

    /// Register a factory under `name`.
    ///
    /// Fails with [`HalError::EmptyRunnerName`] or
    /// [`HalError::DuplicateRunner`].
    pub fn register<F>(&self, name: impl Into<String>, factory: F) -> HalResult<()>
    where
        F: Fn() -> Box<dyn Runner> + Send + Sync + 'static,
    {
        let name = name.into();
        if name.is_empty() {
            return Err(HalError::EmptyRunnerName);
        }

        let mut factories = self
            .factories
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if factories.contains_key(&name) {
            return Err(HalError::DuplicateRunner(name));
        }
        debug!(runner = %name, "registering runner");
        factories.insert(name, Box::new(factory));
        Ok(())
    }

    /// Like [`RunnerRegistry::register`] but panics on failure.
    ///
    /// Intended for static registration at process start, where a failed
    /// registration is fatal.
    ///
    /// # Panics
    ///
    /// Panics if the name is empty or already taken.
    pub fn must_register<F>(&self, name: impl Into<String>, factory: F)
    where
        F: Fn() -> Box<dyn Runner> + Send + Sync + 'static,
    {
        let name = name.into();
        if let Err(e) = self.register(name.clone(), factory) {
            panic!("failed to register runner '{name}': {e}");
        }
    }

    /// Create a fresh runner instance by name.
    pub fn create(&self, name: &str) -> HalResult<Box<dyn Runner>> {
        let factories = self
            .factories
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let factory = factories
            .get(name)
            .ok_or_else(|| HalError::UnknownRunner(name.to_string()))?;
        Ok(factory())
    }

    /// Remove a registration; returns whether one existed. Test hook.
    pub fn unregister(&self, name: &str) -> bool {
        let removed = self
            .factories
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .remove(name)
            .is_some();
        if removed {
            debug!(runner = %name, "unregistered runner");
        }
        removed
    }

    /// Whether a runner is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.factories
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .contains_key(name)
    }

    /// All registered names, sorted so table iteration order never escapes.
    pub fn list(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .factories
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }
}

/// Register a factory with the global registry.
pub fn register_runner<F>(name: impl Into<String>, factory: F) -> HalResult<()>
where
    F: Fn() -> Box<dyn Runner> + Send + Sync + 'static,
{
    RunnerRegistry::global().register(name, factory)
}

/// Register with the global registry, panicking on failure.
pub fn must_register_runner<F>(name: impl Into<String>, factory: F)
where
    F: Fn() -> Box<dyn Runner> + Send + Sync + 'static,
{
    RunnerRegistry::global().must_register(name, factory);
}

/// Create a runner from the global registry.
pub fn create_runner(name: &str) -> HalResult<Box<dyn Runner>> {
    RunnerRegistry::global().create(name)
}

/// All names registered with the global registry.
pub fn list_runners() -> Vec<String> {
    RunnerRegistry::global().list()
}
