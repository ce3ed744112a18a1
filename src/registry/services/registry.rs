//! Thread-safe driver registry keyed by name and URL scheme.
//!
//! Provides [`DriverRegistry`], which stores drivers for a single connection
//! kind and dispatches repository opening to the driver named by a URL
//! scheme.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, warn};
use url::Url;

use crate::registry::{
    domain::{OpenError, RegistryError, RegistryResult},
    ports::Driver,
};

type DriverMap<D> = BTreeMap<String, Arc<D>>;

/// Named collection of drivers for one connection kind.
///
/// Entries are only ever added: a name, once registered, keeps its driver for
/// the lifetime of the registry. The registry is usually declared as a
/// `static` by the crate that owns the connection kind, and drivers register
/// against it while the application wires itself up.
///
/// # Examples
///
/// ```
/// use std::convert::Infallible;
/// use std::sync::Arc;
///
/// use soforo::registry::{
///     ports::{Driver, Repository},
///     services::DriverRegistry,
/// };
/// use url::Url;
///
/// struct MemoryStore {
///     root: String,
/// }
///
/// impl Repository for MemoryStore {
///     type Error = Infallible;
///
///     fn close(self) -> Result<(), Infallible> {
///         Ok(())
///     }
/// }
///
/// struct MemoryDriver;
///
/// impl Driver for MemoryDriver {
///     type Repository = MemoryStore;
///     type Context = ();
///     type Error = Infallible;
///
///     fn open(&self, url: &Url, _context: &()) -> Result<MemoryStore, Infallible> {
///         Ok(MemoryStore {
///             root: url.path().to_owned(),
///         })
///     }
/// }
///
/// type StorageDriver = dyn Driver<Repository = MemoryStore, Context = (), Error = Infallible>;
///
/// static STORAGE: DriverRegistry<StorageDriver> = DriverRegistry::new("storage");
///
/// STORAGE.register_or_panic("mem", Arc::new(MemoryDriver));
///
/// let store = STORAGE.open("mem:///scratch", &()).expect("mem driver is registered");
/// assert_eq!(store.root, "/scratch");
/// store.close().expect("closing a memory store cannot fail");
/// ```
pub struct DriverRegistry<D: ?Sized> {
    label: &'static str,
    drivers: RwLock<DriverMap<D>>,
}

impl<D: ?Sized> DriverRegistry<D> {
    /// Creates an empty registry.
    ///
    /// `label` names the connection kind (for example `"storage"`) and only
    /// appears in diagnostics.
    #[must_use]
    pub const fn new(label: &'static str) -> Self {
        Self {
            label,
            drivers: RwLock::new(BTreeMap::new()),
        }
    }

    /// Returns the label given at construction.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        self.label
    }

    /// Makes `driver` available under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateRegistration`] when `name` is already
    /// taken. The existing driver stays in place.
    pub fn register(&self, name: impl Into<String>, driver: Arc<D>) -> RegistryResult<()> {
        let driver_name = name.into();
        let mut drivers = self.write();
        match drivers.entry(driver_name) {
            Entry::Occupied(entry) => {
                warn!(
                    registry = self.label,
                    driver = %entry.key(),
                    "rejected duplicate driver registration"
                );
                Err(RegistryError::DuplicateRegistration {
                    label: self.label,
                    name: entry.key().clone(),
                })
            }
            Entry::Vacant(entry) => {
                debug!(registry = self.label, driver = %entry.key(), "registered driver");
                entry.insert(driver);
                Ok(())
            }
        }
    }

    /// Registers `driver` during application wiring.
    ///
    /// Two drivers claiming the same name is a wiring mistake rather than a
    /// runtime condition, so this variant does not return it.
    ///
    /// # Panics
    ///
    /// Panics with the duplicate-registration message when `name` is already
    /// registered.
    #[track_caller]
    pub fn register_or_panic(&self, name: impl Into<String>, driver: Arc<D>) {
        if let Err(err) = self.register(name, driver) {
            panic!("{err}");
        }
    }

    /// Returns the registered driver names in ascending order.
    #[must_use]
    pub fn drivers(&self) -> Vec<String> {
        self.read().keys().cloned().collect()
    }

    /// Returns `true` when a driver is registered under `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.read().contains_key(name)
    }

    /// Returns the number of registered drivers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Returns `true` when no driver has been registered yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Returns the driver registered under exactly `name`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownDriver`] when nothing is registered
    /// under `name`.
    pub fn driver_by_name(&self, name: &str) -> RegistryResult<Arc<D>> {
        let found = self.read().get(name).cloned();
        found.ok_or_else(|| {
            debug!(registry = self.label, driver = name, "no driver registered");
            RegistryError::UnknownDriver(name.to_owned())
        })
    }

    /// Returns the driver selected by the scheme of `descriptor`.
    ///
    /// Only the scheme is read; the rest of the descriptor is left to the
    /// driver. Schemes are compared in lowercase, as URL parsing reports them.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InvalidAddress`] when `descriptor` does not
    /// start with a scheme, or [`RegistryError::UnknownDriver`] when its
    /// scheme has no driver.
    pub fn driver(&self, descriptor: &str) -> RegistryResult<Arc<D>> {
        let scheme = descriptor_scheme(descriptor)?;
        self.driver_by_name(&scheme)
    }

    /// Returns the driver selected by the scheme of an already parsed URL.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownDriver`] when the scheme has no
    /// driver.
    pub fn driver_for_url(&self, url: &Url) -> RegistryResult<Arc<D>> {
        self.driver_by_name(url.scheme())
    }

    fn read(&self) -> RwLockReadGuard<'_, DriverMap<D>> {
        // Writers only insert a fully built entry, so a poisoned map is intact.
        self.drivers.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, DriverMap<D>> {
        self.drivers.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<D: Driver + ?Sized> DriverRegistry<D> {
    /// Opens a repository through the driver selected by the scheme of
    /// `descriptor`.
    ///
    /// The driver is resolved from the scheme before the descriptor is
    /// parsed. The driver then receives the WHATWG-normalised [`Url`]: dot
    /// segments are resolved and special-scheme hosts are lowercased, so
    /// `file:///tmp/../etc` arrives with path `/etc`. Use
    /// [`DriverRegistry::open_url`] to hand over an exact `Url` value.
    ///
    /// The caller owns the returned repository and must close it.
    ///
    /// # Errors
    ///
    /// Returns [`OpenError::Resolve`] when the descriptor has no scheme, its
    /// scheme has no driver, or the descriptor of a registered scheme is not
    /// a valid URL. Returns [`OpenError::Driver`] with the driver's own error
    /// when opening fails.
    pub fn open(
        &self,
        descriptor: &str,
        context: &D::Context,
    ) -> Result<D::Repository, OpenError<D::Error>> {
        let driver = self.driver(descriptor)?;
        let url = Url::parse(descriptor).map_err(|err| {
            debug!(descriptor, error = %err, "descriptor is not a valid URL");
            RegistryError::InvalidAddress(descriptor.to_owned())
        })?;
        self.dispatch(&driver, &url, context)
    }

    /// Opens a repository for an already parsed URL.
    ///
    /// `url` and `context` reach the driver as the very same references. The
    /// registry lock is released before the driver runs.
    ///
    /// # Errors
    ///
    /// Returns [`OpenError::Resolve`] when the scheme has no driver, and
    /// [`OpenError::Driver`] with the driver's own error when opening fails.
    pub fn open_url(
        &self,
        url: &Url,
        context: &D::Context,
    ) -> Result<D::Repository, OpenError<D::Error>> {
        let driver = self.driver_for_url(url)?;
        self.dispatch(&driver, url, context)
    }

    fn dispatch(
        &self,
        driver: &D,
        url: &Url,
        context: &D::Context,
    ) -> Result<D::Repository, OpenError<D::Error>> {
        debug!(
            registry = self.label,
            driver = url.scheme(),
            "opening repository"
        );
        driver.open(url, context).map_err(OpenError::Driver)
    }
}

impl<D: ?Sized> fmt::Debug for DriverRegistry<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DriverRegistry")
            .field("label", &self.label)
            .field("drivers", &self.drivers())
            .finish()
    }
}

/// Extracts the RFC 3986 scheme (`ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )`
/// followed by `:`) without looking at the rest of the descriptor.
fn descriptor_scheme(descriptor: &str) -> RegistryResult<String> {
    descriptor
        .split_once(':')
        .map(|(scheme, _)| scheme)
        .filter(|scheme| is_scheme(scheme))
        .map(str::to_ascii_lowercase)
        .ok_or_else(|| {
            debug!(descriptor, "descriptor has no scheme");
            RegistryError::InvalidAddress(descriptor.to_owned())
        })
}

fn is_scheme(candidate: &str) -> bool {
    let mut chars = candidate.chars();
    chars.next().is_some_and(|first| first.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}
