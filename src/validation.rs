//! Input validation for fleet registries.
//!
//! Checks structural integrity of trailers, vehicles, and shipments
//! before they are loaded onto a scheduling board. Detects:
//! - Duplicate IDs
//! - Non-positive compartment capacities
//! - Inverted availability windows and empty shipment slots
//! - Negative quantities
//! - Dangling trailer and vehicle references

use crate::models::{Shipment, Trailer, Vehicle};
use std::collections::HashSet;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities share the same ID.
    DuplicateId,
    /// A compartment has capacity <= 0.
    InvalidCapacity,
    /// A window or slot has its end before (or at) its start.
    InvalidInterval,
    /// A shipment or allocation quantity is negative.
    NegativeQuantity,
    /// A vehicle references a trailer that doesn't exist.
    InvalidTrailerReference,
    /// A shipment references a vehicle that doesn't exist.
    InvalidVehicleReference,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates fleet registry data.
///
/// Checks:
/// 1. No duplicate trailer IDs, nor duplicate compartment IDs within a trailer
/// 2. Every compartment capacity is positive
/// 3. No duplicate vehicle IDs; availability start <= end
/// 4. Every vehicle's trailer exists
/// 5. No duplicate shipment IDs; slot start < end; quantities >= 0
/// 6. Every assigned shipment's vehicle exists
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_fleet(
    trailers: &[Trailer],
    vehicles: &[Vehicle],
    shipments: &[Shipment],
) -> ValidationResult {
    let mut errors = Vec::new();

    let mut trailer_ids = HashSet::new();
    for t in trailers {
        if !trailer_ids.insert(t.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate trailer ID: {}", t.id),
            ));
        }

        let mut compartment_ids = HashSet::new();
        for c in &t.compartments {
            if !compartment_ids.insert(c.id.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::DuplicateId,
                    format!("Duplicate compartment ID '{}' in trailer '{}'", c.id, t.id),
                ));
            }
            if c.capacity.is_nan() || c.capacity <= 0.0 {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidCapacity,
                    format!(
                        "Compartment '{}' in trailer '{}' has non-positive capacity {}",
                        c.id, t.id, c.capacity
                    ),
                ));
            }
        }
    }

    let mut vehicle_ids = HashSet::new();
    for v in vehicles {
        if !vehicle_ids.insert(v.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate vehicle ID: {}", v.id),
            ));
        }
        if v.availability_start_ms > v.availability_end_ms {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidInterval,
                format!("Vehicle '{}' availability ends before it starts", v.id),
            ));
        }
        if !trailer_ids.contains(v.trailer_id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidTrailerReference,
                format!(
                    "Vehicle '{}' references unknown trailer '{}'",
                    v.id, v.trailer_id
                ),
            ));
        }
    }

    let mut shipment_ids = HashSet::new();
    for s in shipments {
        if !shipment_ids.insert(s.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate shipment ID: {}", s.id),
            ));
        }
        if s.start_ms >= s.end_ms {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidInterval,
                format!("Shipment '{}' must start before it ends", s.id),
            ));
        }
        if s.quantity < 0.0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::NegativeQuantity,
                format!("Shipment '{}' has negative quantity {}", s.id, s.quantity),
            ));
        }
        for a in s.compartment_allocations.iter().filter(|a| a.quantity < 0.0) {
            errors.push(ValidationError::new(
                ValidationErrorKind::NegativeQuantity,
                format!(
                    "Shipment '{}' allocates negative quantity {} to compartment '{}'",
                    s.id, a.quantity, a.compartment_id
                ),
            ));
        }
        if let Some(vid) = &s.vehicle_id {
            if !vehicle_ids.contains(vid.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidVehicleReference,
                    format!("Shipment '{}' references unknown vehicle '{}'", s.id, vid),
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
