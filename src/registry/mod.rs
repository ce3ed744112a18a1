//! Driver registration and URL-scheme dispatch.
//!
//! A [`services::DriverRegistry`] maps driver names to pluggable
//! [`ports::Driver`] implementations for one connection kind (storage,
//! database, queue). Application code hands the registry a connection URL; the
//! scheme picks the driver and the driver produces a [`ports::Repository`].
//!
//! - Error types in [`domain`]
//! - Driver and repository contracts in [`ports`]
//! - The registry itself in [`services`]

pub mod domain;
pub mod ports;
pub mod services;
