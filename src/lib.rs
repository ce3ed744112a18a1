//! Soforo: pluggable connection drivers resolved by URL scheme.
//!
//! This crate provides a generic driver registry. Each connection kind
//! (storage, database, message queue) owns one registry; independently built
//! drivers register under a name, and application code opens repositories by
//! handing the registry a URL whose scheme names the driver.
//!
//! # Architecture
//!
//! Soforo follows hexagonal architecture principles:
//!
//! - **Domain**: Registry error model
//! - **Ports**: The [`Driver`](registry::ports::Driver) and
//!   [`Repository`](registry::ports::Repository) contracts drivers implement
//! - **Services**: The [`DriverRegistry`](registry::services::DriverRegistry)
//!   that stores drivers and dispatches to them
//!
//! # Modules
//!
//! - [`registry`]: Driver registration, lookup, and dispatch

pub mod registry;
