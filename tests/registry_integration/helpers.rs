//! Storage drivers shared by the registry integration tests.

use std::path::PathBuf;

use rstest::fixture;
use soforo::registry::{
    ports::{Driver, Repository},
    services::DriverRegistry,
};
use thiserror::Error;
use url::Url;

/// Dependencies a storage driver may draw on.
#[derive(Debug, Clone, Default)]
pub struct StorageProvider {
    /// Directory that relative file locations resolve against.
    pub base_dir: PathBuf,
}

/// Errors raised by the test storage drivers.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StorageError {
    /// The URL does not name a location the driver understands.
    #[error("unsupported storage location: {0}")]
    UnsupportedLocation(String),
}

/// Repository handle returned by the storage drivers.
#[derive(Debug, PartialEq, Eq)]
pub struct Bucket {
    /// Driver that opened the bucket.
    pub driver: &'static str,
    /// Resolved location.
    pub location: PathBuf,
}

impl Repository for Bucket {
    type Error = StorageError;

    fn close(self) -> Result<(), StorageError> {
        Ok(())
    }
}

/// Driver trait object stored in storage registries.
pub type StorageDriver =
    dyn Driver<Repository = Bucket, Context = StorageProvider, Error = StorageError>;

/// Driver that maps `file://` URLs onto the provider's base directory.
#[derive(Debug, Default)]
pub struct FileDriver;

impl Driver for FileDriver {
    type Repository = Bucket;
    type Context = StorageProvider;
    type Error = StorageError;

    fn open(&self, url: &Url, context: &StorageProvider) -> Result<Bucket, StorageError> {
        if url.host_str().is_some_and(|host| !host.is_empty()) {
            return Err(StorageError::UnsupportedLocation(url.to_string()));
        }
        let relative = url.path().trim_start_matches('/');
        Ok(Bucket {
            driver: "file",
            location: context.base_dir.join(relative),
        })
    }
}

/// Driver that names buckets after the URL host.
#[derive(Debug, Default)]
pub struct ObjectStoreDriver;

impl Driver for ObjectStoreDriver {
    type Repository = Bucket;
    type Context = StorageProvider;
    type Error = StorageError;

    fn open(&self, url: &Url, _context: &StorageProvider) -> Result<Bucket, StorageError> {
        let bucket = url
            .host_str()
            .ok_or_else(|| StorageError::UnsupportedLocation(url.to_string()))?;
        Ok(Bucket {
            driver: "s3",
            location: PathBuf::from(bucket).join(url.path().trim_start_matches('/')),
        })
    }
}

/// Provides a fresh storage registry for each test.
#[fixture]
pub fn registry() -> DriverRegistry<StorageDriver> {
    DriverRegistry::new("storage")
}

/// Provides a storage provider rooted at `/srv/data`.
#[fixture]
pub fn provider() -> StorageProvider {
    StorageProvider {
        base_dir: PathBuf::from("/srv/data"),
    }
}
