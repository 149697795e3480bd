//! Backend discovery.
//!
//! A [`Factory`] exposes zero or more backend variants under contiguous ids
//! starting at 0. Hosts probe `metadata(0)`, `metadata(1)`, ... until it
//! returns `None`, and only call `create` for ids confirmed that way.
//!
//! Factories are collected in a [`Registry`]. Enumeration is most-recently
//! registered first. A process-wide registry is available through
//! [`register`], [`factories`] and [`discover`]; it is meant to be filled
//! during startup before backends are used, but is lock-guarded so late
//! registration is still sound.

use std::{fmt, sync::Arc};

use once_cell::sync::Lazy;
use parking_lot::RwLock;

use crate::{
    backend::api::Backend,
    foundation::{
        core::{PixelFormat, WindowHandleKind},
        error::{R3dError, R3dResult},
    },
};

/// Symbol name under which a loadable backend module exports its factory function.
pub const FACTORY_FUNCTION_NAME: &str = "lsp_r3d_factory";
/// Symbol name under which a loadable backend module exports its interface version.
pub const FACTORY_VERSION_NAME: &str = "lsp_r3d_version";

/// Interface version of this crate's backend contract.
pub const INTERFACE_VERSION: Version = Version::new(1, 0, 0);

/// Three-part interface version.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
pub struct Version {
    /// Bumped when the operation table changes incompatibly.
    pub major: u32,
    /// Bumped for additions.
    pub minor: u32,
    /// Bumped for fixes.
    pub micro: u32,
}

impl Version {
    /// `major.minor.micro`.
    pub const fn new(major: u32, minor: u32, micro: u32) -> Self {
        Self {
            major,
            minor,
            micro,
        }
    }

    /// Same major version: the operation table layout is unchanged.
    pub fn is_compatible_with(self, other: Version) -> bool {
        self.major == other.major
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.micro)
    }
}

/// What a factory says about one of its backends.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct BackendMetadata {
    /// Stable identifier, unique across factories.
    pub id: &'static str,
    /// Human readable name.
    pub display: &'static str,
    /// Window system the backend attaches to.
    pub window: WindowHandleKind,
    /// Layout the backend produces natively.
    pub format: PixelFormat,
}

/// Source of one or more backend variants.
pub trait Factory: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// Interface version the factory was built against.
    fn version(&self) -> Version {
        INTERFACE_VERSION
    }

    /// Metadata for backend `id`, or `None` once past the last backend.
    fn metadata(&self, id: usize) -> Option<BackendMetadata>;

    /// Instantiate backend `id`. The result is already initialized.
    fn create(&self, id: usize) -> R3dResult<Box<dyn Backend>>;
}

/// A backend found by [`Registry::discover`].
#[derive(Clone)]
pub struct DiscoveredBackend {
    /// Factory that advertised the backend.
    pub factory: Arc<dyn Factory>,
    /// Id within `factory`.
    pub index: usize,
    /// What the factory reported for `index`.
    pub metadata: BackendMetadata,
}

impl DiscoveredBackend {
    /// Instantiate this backend through its factory.
    pub fn create(&self) -> R3dResult<Box<dyn Backend>> {
        self.factory.create(self.index)
    }
}

impl fmt::Debug for DiscoveredBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiscoveredBackend")
            .field("factory", &self.factory.name())
            .field("index", &self.index)
            .field("metadata", &self.metadata)
            .finish()
    }
}

/// Ordered set of factories.
#[derive(Default)]
pub struct Registry {
    // Registration order; enumeration walks it backwards.
    entries: Vec<Arc<dyn Factory>>,
}

impl Registry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `factory` in front of every previously registered one.
    pub fn register(&mut self, factory: Arc<dyn Factory>) -> R3dResult<()> {
        let version = factory.version();
        if !version.is_compatible_with(INTERFACE_VERSION) {
            return Err(R3dError::validation(format!(
                "factory '{}' targets interface {version}, expected {}.x",
                factory.name(),
                INTERFACE_VERSION.major
            )));
        }
        tracing::debug!(factory = factory.name(), %version, "factory registered");
        self.entries.push(factory);
        Ok(())
    }

    /// Number of registered factories.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` before the first registration.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Factories, most recently registered first.
    pub fn factories(&self) -> impl Iterator<Item = &Arc<dyn Factory>> {
        self.entries.iter().rev()
    }

    /// Probe every factory for its backends.
    #[tracing::instrument(skip(self), fields(factories = self.entries.len()))]
    pub fn discover(&self) -> Vec<DiscoveredBackend> {
        let mut found = Vec::new();
        for factory in self.factories() {
            let mut index = 0;
            while let Some(metadata) = factory.metadata(index) {
                found.push(DiscoveredBackend {
                    factory: Arc::clone(factory),
                    index,
                    metadata,
                });
                index += 1;
            }
            tracing::debug!(factory = factory.name(), backends = index, "factory probed");
        }
        found
    }

    /// Backend whose metadata id equals `id`.
    pub fn find(&self, id: &str) -> R3dResult<DiscoveredBackend> {
        self.discover()
            .into_iter()
            .find(|b| b.metadata.id == id)
            .ok_or_else(|| R3dError::not_found(format!("backend '{id}'")))
    }

    /// First backend for `window`, preferring one that natively produces
    /// `format` when given.
    pub fn select(
        &self,
        window: WindowHandleKind,
        format: Option<PixelFormat>,
    ) -> Option<DiscoveredBackend> {
        let candidates: Vec<_> = self
            .discover()
            .into_iter()
            .filter(|b| b.metadata.window == window)
            .collect();
        let preferred =
            format.and_then(|want| candidates.iter().position(|b| b.metadata.format == want));
        let idx = preferred.unwrap_or(0);
        candidates.into_iter().nth(idx)
    }
}

static GLOBAL: Lazy<RwLock<Registry>> = Lazy::new(|| RwLock::new(Registry::new()));

/// Register `factory` with the process-wide registry.
pub fn register(factory: Arc<dyn Factory>) -> R3dResult<()> {
    GLOBAL.write().register(factory)
}

/// Snapshot of the process-wide registry, most recently registered first.
pub fn factories() -> Vec<Arc<dyn Factory>> {
    GLOBAL.read().factories().cloned().collect()
}

/// [`Registry::discover`] over the process-wide registry.
pub fn discover() -> Vec<DiscoveredBackend> {
    GLOBAL.read().discover()
}

/// Run `f` with shared access to the process-wide registry.
pub fn with_registry<R>(f: impl FnOnce(&Registry) -> R) -> R {
    f(&GLOBAL.read())
}

#[cfg(test)]
#[path = "../../tests/unit/factory/registry.rs"]
mod tests;
