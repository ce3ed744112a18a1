//! Driver and repository contracts.

use url::Url;

/// An established connection handed back to the application.
///
/// Consuming crates extend this trait with the operations their repositories
/// provide. `close` takes the repository by value, so it can run at most once
/// and the repository cannot be used afterwards.
pub trait Repository: Sized {
    /// Error reported while releasing the repository.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Releases every resource held by the repository.
    ///
    /// # Errors
    ///
    /// Returns the implementation's error when resources could not be
    /// released cleanly.
    fn close(self) -> Result<(), Self::Error>;
}

/// A pluggable implementation that turns a connection URL into a
/// [`Repository`].
///
/// Drivers are registered once and invoked many times, possibly from several
/// threads at once.
///
/// The `Context` type carries whatever the driver needs from its caller. Use
/// a concrete type when every driver of a registry shares it, or
/// `dyn Any + Send + Sync` when drivers expect different shapes and downcast
/// it themselves.
pub trait Driver: Send + Sync {
    /// Repository produced by a successful [`Driver::open`].
    type Repository: Repository;

    /// Caller-supplied context forwarded untouched by the registry.
    type Context: ?Sized;

    /// Error reported when a repository cannot be opened.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Opens a new repository for `url`.
    ///
    /// The caller owns the returned repository and must close it once it is
    /// no longer needed.
    ///
    /// # Errors
    ///
    /// Returns the driver's error when the URL is unusable, the context does
    /// not have the expected shape, or the connection cannot be established.
    fn open(&self, url: &Url, context: &Self::Context) -> Result<Self::Repository, Self::Error>;
}
