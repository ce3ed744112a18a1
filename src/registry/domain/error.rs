//! Error types for driver registration, resolution, and dispatch.

use thiserror::Error;

/// Result type for registry lookups and registration.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Errors raised by the registry itself.
///
/// Literal inputs are embedded in every variant so callers can match on the
/// offending name or descriptor. Quoted inputs use Rust string escapes, so a
/// control character renders as `\u{1}` rather than a `\x01` byte escape.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// The connection descriptor has no scheme, or its scheme is registered
    /// but the descriptor is not a valid URL.
    #[error("invalid database source name {0:?}")]
    InvalidAddress(String),

    /// No driver is registered under the requested name or scheme.
    #[error("unknown driver {0:?} (forgotten import?)")]
    UnknownDriver(String),

    /// A driver is already registered under the same name.
    ///
    /// Startup wiring treats this as fatal; see
    /// [`DriverRegistry::register_or_panic`](crate::registry::services::DriverRegistry::register_or_panic).
    #[error("Register called twice for {label} driver {name}")]
    DuplicateRegistration {
        /// Label of the registry that rejected the driver.
        label: &'static str,
        /// Name that was already taken.
        name: String,
    },
}

/// Failure of a resolve-and-open call.
///
/// Driver failures are carried as-is: [`OpenError::Driver`] holds the exact
/// value the driver returned and forwards both `Display` and `source` to it.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OpenError<E>
where
    E: std::error::Error + 'static,
{
    /// The descriptor could not be resolved to a registered driver.
    #[error(transparent)]
    Resolve(#[from] RegistryError),

    /// The resolved driver failed to open a repository.
    #[error(transparent)]
    Driver(E),
}

impl<E> OpenError<E>
where
    E: std::error::Error + 'static,
{
    /// Returns the driver's error when the failure came from the driver.
    #[must_use]
    pub const fn driver_error(&self) -> Option<&E> {
        match self {
            Self::Driver(err) => Some(err),
            Self::Resolve(_) => None,
        }
    }

    /// Consumes the error, yielding the driver's error if there is one.
    #[must_use]
    pub fn into_driver_error(self) -> Option<E> {
        match self {
            Self::Driver(err) => Some(err),
            Self::Resolve(_) => None,
        }
    }

    /// Returns the registry error when resolution failed before dispatch.
    #[must_use]
    pub const fn registry_error(&self) -> Option<&RegistryError> {
        match self {
            Self::Resolve(err) => Some(err),
            Self::Driver(_) => None,
        }
    }
}
