//! Delivery scheduling validation for the U-Engine ecosystem.
//!
//! Pure validators behind a fleet scheduler: can this vehicle take this
//! shipment in this slot, is the shipment's split across the trailer's
//! compartments legal, and how full does the trailer end up.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `Trailer`, `Compartment`,
//!   `CompartmentAllocation`, `Vehicle`, `Shipment`, `TimeWindow`
//! - **`allocation`**: Compartment allocation rules (capacity, partial fill, must-use)
//! - **`availability`**: Vehicle status, availability window, booking overlap
//! - **`utilization`**: Trailer fill and per-product remaining capacity
//! - **`validation`**: Registry integrity checks (duplicate IDs, dangling references)
//! - **`scheduler`**: Caller-owned `SchedulingBoard` and `FleetKpi`
//! - **`config`**: `SchedulingPolicy`
//!
//! # Flow
//!
//! A placement runs availability → allocation → utilization. The
//! validators are synchronous and side-effect free; they read their
//! arguments and return reports. Domain violations are data, never `Err`.

pub mod allocation;
pub mod availability;
pub mod config;
pub mod error;
pub mod models;
pub mod scheduler;
pub mod utilization;
pub mod validation;

pub use error::{ConfigError, ScheduleError};
