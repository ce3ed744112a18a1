//! Error model for driver registration and resolution.

mod error;

pub use error::{OpenError, RegistryError, RegistryResult};
