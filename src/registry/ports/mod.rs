//! Port contracts implemented by pluggable drivers.
//!
//! Consuming crates usually extend these traits with their own domain
//! methods (a storage repository adds reads and writes, a database repository
//! adds queries) and register drivers against a registry of their own.

pub mod driver;

pub use driver::{Driver, Repository};
