//! Compartment allocation validation.
//!
//! Checks a proposed split of a shipment's volume across a trailer's
//! compartments. Every violation is collected; the validator never stops
//! at the first problem.
//!
//! # Checks (in order)
//! 1. Trailer present (otherwise a single `TrailerNotFound` issue)
//! 2. Allocation sum equals the shipment quantity
//! 3. Per allocation: compartment exists, finite non-negative quantity, within capacity, full-or-empty
//!    for no-partial compartments, non-zero for must-use compartments
//! 4. Every must-use compartment received a non-zero allocation
//!
//! Checks 3 and 4 both catch a must-use compartment allocated exactly 0.
//! [`MustUsePolicy`] decides whether both messages are kept.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::config::{MustUsePolicy, SchedulingPolicy};
use crate::models::{allocated_quantity, CompartmentAllocation, Trailer};

/// Categories of allocation problems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AllocationIssueKind {
    /// No trailer was supplied.
    TrailerNotFound,
    /// Allocation sum differs from the shipment quantity.
    QuantityMismatch,
    /// An allocation references a compartment the trailer lacks.
    UnknownCompartment,
    /// An allocation quantity is negative, NaN, or infinite.
    InvalidQuantity,
    /// An allocation exceeds its compartment's capacity.
    OverCapacity,
    /// A no-partial compartment is neither empty nor full.
    PartialFill,
    /// A must-use compartment has an explicit zero allocation.
    MustUseEmpty,
    /// A must-use compartment has no (or a zero) allocation.
    MustUseUnallocated,
}

/// A single allocation problem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationIssue {
    /// Problem category.
    pub kind: AllocationIssueKind,
    /// Compartment involved, if any.
    pub compartment_id: Option<String>,
    /// Human-readable description.
    pub message: String,
}

/// Outcome of [`validate_allocation`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AllocationReport {
    /// All detected problems, in check order.
    pub errors: Vec<AllocationIssue>,
}

impl AllocationIssue {
    fn new(
        kind: AllocationIssueKind,
        compartment_id: Option<&str>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            compartment_id: compartment_id.map(str::to_owned),
            message: message.into(),
        }
    }
}

impl fmt::Display for AllocationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl AllocationReport {
    /// Whether the allocation passed every check.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// The error messages as plain strings.
    pub fn messages(&self) -> Vec<&str> {
        self.errors.iter().map(|e| e.message.as_str()).collect()
    }

    /// Whether any issue has the given kind.
    pub fn has(&self, kind: AllocationIssueKind) -> bool {
        self.errors.iter().any(|e| e.kind == kind)
    }

    fn push(&mut self, issue: AllocationIssue) {
        self.errors.push(issue);
    }
}

/// Validates an allocation with the default policy.
///
/// # Example
///
/// ```
/// use u_fleet::allocation::validate_allocation;
/// use u_fleet::models::{Compartment, CompartmentAllocation, Trailer};
///
/// let trailer = Trailer::from_compartments("T1", vec![
///     Compartment::new("A", 5000.0, "diesel").with_partial_allowed(false).with_must_use(true),
///     Compartment::new("B", 3000.0, "diesel"),
/// ]);
/// let allocations = vec![
///     CompartmentAllocation::new("A", 5000.0),
///     CompartmentAllocation::new("B", 2000.0),
/// ];
///
/// let report = validate_allocation(Some(&trailer), &allocations, 7000.0);
/// assert!(report.is_valid());
/// ```
pub fn validate_allocation(
    trailer: Option<&Trailer>,
    allocations: &[CompartmentAllocation],
    total_quantity: f64,
) -> AllocationReport {
    validate_allocation_with(&SchedulingPolicy::default(), trailer, allocations, total_quantity)
}

/// Validates an allocation under the given policy.
pub fn validate_allocation_with(
    policy: &SchedulingPolicy,
    trailer: Option<&Trailer>,
    allocations: &[CompartmentAllocation],
    total_quantity: f64,
) -> AllocationReport {
    let mut report = AllocationReport::default();

    let Some(trailer) = trailer else {
        report.push(AllocationIssue::new(
            AllocationIssueKind::TrailerNotFound,
            None,
            "Trailer not found",
        ));
        return report;
    };

    let allocated: f64 = allocations.iter().map(|a| a.quantity).sum();
    // Negated so that a NaN sum or total counts as a mismatch
    if !((allocated - total_quantity).abs() <= policy.quantity_tolerance) {
        report.push(AllocationIssue::new(
            AllocationIssueKind::QuantityMismatch,
            None,
            format!(
                "Total allocated quantity ({allocated}) doesn't match shipment quantity ({total_quantity})"
            ),
        ));
    }

    // Compartments already reported as explicitly empty must-use
    let mut reported_empty: HashSet<&str> = HashSet::new();

    for alloc in allocations {
        let Some(comp) = trailer.compartment(&alloc.compartment_id) else {
            report.push(AllocationIssue::new(
                AllocationIssueKind::UnknownCompartment,
                Some(&alloc.compartment_id),
                format!("Compartment {} not found", alloc.compartment_id),
            ));
            continue;
        };

        if !alloc.quantity.is_finite() || alloc.quantity < 0.0 {
            report.push(AllocationIssue::new(
                AllocationIssueKind::InvalidQuantity,
                Some(&comp.id),
                format!("Compartment {} has invalid quantity {}", comp.name, alloc.quantity),
            ));
            continue;
        }

        if alloc.quantity > comp.capacity {
            report.push(AllocationIssue::new(
                AllocationIssueKind::OverCapacity,
                Some(&comp.id),
                format!(
                    "Compartment {} exceeds capacity: requested {}, max {}",
                    comp.name, alloc.quantity, comp.capacity
                ),
            ));
        }

        if !comp.partial_allowed && alloc.quantity > 0.0 && alloc.quantity < comp.capacity {
            report.push(AllocationIssue::new(
                AllocationIssueKind::PartialFill,
                Some(&comp.id),
                format!("Compartment {} doesn't allow partial filling", comp.name),
            ));
        }

        if alloc.quantity == 0.0 && comp.must_use {
            report.push(AllocationIssue::new(
                AllocationIssueKind::MustUseEmpty,
                Some(&comp.id),
                format!("Compartment {} must be used", comp.name),
            ));
            reported_empty.insert(comp.id.as_str());
        }
    }

    for comp in trailer.compartments.iter().filter(|c| c.must_use) {
        if allocated_quantity(allocations, &comp.id) != 0.0 {
            continue;
        }
        if policy.must_use_policy == MustUsePolicy::Deduplicate
            && reported_empty.contains(comp.id.as_str())
        {
            continue;
        }
        report.push(AllocationIssue::new(
            AllocationIssueKind::MustUseUnallocated,
            Some(&comp.id),
            format!("Compartment {} must be used but not allocated", comp.name),
        ));
    }

    trace!(
        trailer_id = %trailer.id,
        allocations = allocations.len(),
        errors = report.errors.len(),
        "allocation validated"
    );

    report
}
