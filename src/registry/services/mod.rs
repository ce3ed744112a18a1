//! Registry service for driver registration, discovery, and dispatch.

mod registry;

pub use registry::DriverRegistry;
