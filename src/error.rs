//! Error types for board operations and configuration loading.
//!
//! Domain violations found by the validators are returned as data
//! ([`AllocationReport`](crate::allocation::AllocationReport),
//! [`AvailabilityCheck`](crate::availability::AvailabilityCheck)).
//! These errors cover the operations that refuse to commit.

use thiserror::Error;

use crate::allocation::AllocationIssue;
use crate::validation::ValidationError;

/// Why the scheduling board refused an operation.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ScheduleError {
    #[error("shipment {0} not found")]
    UnknownShipment(String),

    #[error("vehicle {0} not found")]
    UnknownVehicle(String),

    #[error("trailer {trailer_id} of vehicle {vehicle_id} not found")]
    UnknownTrailer {
        vehicle_id: String,
        trailer_id: String,
    },

    #[error("shipment {0} already exists")]
    DuplicateShipment(String),

    #[error("shipment {0} is not assigned to a vehicle")]
    NotAssigned(String),

    #[error("invalid slot for {order_id}: start {start_ms} must be before end {end_ms}")]
    InvalidSlot {
        order_id: String,
        start_ms: i64,
        end_ms: i64,
    },

    #[error("vehicle {vehicle_id} unavailable: {reason}")]
    Unavailable { vehicle_id: String, reason: String },

    #[error("vehicle {vehicle_id} already booked: {}", order_ids.join(", "))]
    Conflict {
        vehicle_id: String,
        order_ids: Vec<String>,
    },

    #[error("invalid allocation for shipment {shipment_id}: {}", join_issues(issues))]
    InvalidAllocation {
        shipment_id: String,
        issues: Vec<AllocationIssue>,
    },

    #[error("fleet data invalid: {}", join_validation(.0))]
    InvalidFleet(Vec<ValidationError>),

    #[error("replacing {id} invalidates bookings: {}", order_ids.join(", "))]
    BookingsInvalidated { id: String, order_ids: Vec<String> },
}

/// Configuration loading failure.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse policy: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid policy field {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

fn join_issues(issues: &[AllocationIssue]) -> String {
    issues
        .iter()
        .map(|i| i.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

fn join_validation(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}
