//! Trailer utilization and remaining capacity.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Utilization | used / total × 100, 2 decimals, half-up |
//! | Available for product | Σ (capacity − used) over matching compartments |
//! | Product breakdown | per product: total, used, available |
//!
//! Available capacity is not clamped: an over-allocated compartment
//! reduces the product total. Preventing over-allocation is the job of
//! [`validate_allocation`](crate::allocation::validate_allocation).

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::models::{allocated_quantity, CompartmentAllocation, Trailer};

/// Aggregate fill of a trailer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Utilization {
    /// Fill percentage (0–100 for valid allocations), rounded to 2 decimals.
    pub utilization: f64,
    /// Sum of allocated quantities.
    pub used_capacity: f64,
    /// Trailer's total capacity.
    pub total_capacity: f64,
}

/// Capacity figures for one product type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductCapacity {
    /// Product tag.
    pub product_type: String,
    /// Sum of capacities of compartments carrying this product.
    pub total_capacity: f64,
    /// Sum of allocations into those compartments.
    pub used_capacity: f64,
    /// `total_capacity - used_capacity` (may be negative).
    pub available_capacity: f64,
}

/// Computes the trailer's fill percentage.
///
/// Returns a utilization of exactly 0 when the total capacity is not
/// positive.
///
/// ```
/// use u_fleet::models::{Compartment, CompartmentAllocation, Trailer};
/// use u_fleet::utilization::calculate_utilization;
///
/// let trailer = Trailer::from_compartments("T1", vec![Compartment::new("A", 3000.0, "diesel")]);
/// let u = calculate_utilization(&trailer, &[CompartmentAllocation::new("A", 1000.0)]);
/// assert_eq!(u.utilization, 33.33);
/// ```
pub fn calculate_utilization(trailer: &Trailer, allocations: &[CompartmentAllocation]) -> Utilization {
    let used_capacity: f64 = allocations.iter().map(|a| a.quantity).sum();
    let total_capacity = trailer.total_capacity;

    let utilization = if total_capacity <= 0.0 {
        0.0
    } else {
        round_half_up_2(used_capacity / total_capacity * 100.0)
    };

    Utilization {
        utilization,
        used_capacity,
        total_capacity,
    }
}

/// Remaining volume for a product type across its compartments.
///
/// Compartments without an allocation count as empty.
pub fn available_capacity_for(
    trailer: &Trailer,
    existing: &[CompartmentAllocation],
    product_type: &str,
) -> f64 {
    trailer
        .compartments_for(product_type)
        .map(|c| c.capacity - allocated_quantity(existing, &c.id))
        .sum()
}

/// Per-product capacity breakdown, in order of first appearance.
pub fn capacity_by_product(
    trailer: &Trailer,
    allocations: &[CompartmentAllocation],
) -> Vec<ProductCapacity> {
    let mut out: Vec<ProductCapacity> = Vec::new();

    for comp in &trailer.compartments {
        let used = allocated_quantity(allocations, &comp.id);
        let entry = match out.iter().position(|p| p.product_type == comp.product_type) {
            Some(i) => &mut out[i],
            None => {
                out.push(ProductCapacity {
                    product_type: comp.product_type.clone(),
                    total_capacity: 0.0,
                    used_capacity: 0.0,
                    available_capacity: 0.0,
                });
                let last = out.len() - 1;
                &mut out[last]
            }
        };
        entry.total_capacity += comp.capacity;
        entry.used_capacity += used;
        entry.available_capacity += comp.capacity - used;
    }

    out
}

/// Rounds to 2 decimal places, ties away from zero (half-up for
/// non-negative values).
///
/// Rounds the shortest decimal form of `value`, so `1.005` becomes `1.01`
/// even though its binary value sits just below the tie.
fn round_half_up_2(value: f64) -> f64 {
    Decimal::from_str(&value.to_string())
        .ok()
        .map(|d| d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|d| d.to_string().parse::<f64>().ok())
        .unwrap_or_else(|| (value * 100.0).round() / 100.0)
}
