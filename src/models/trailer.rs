//! Trailer and compartment models.
//!
//! A trailer is a sequence of physically separate compartments, each
//! holding a single product type. A shipment's total volume is split
//! across the compartments by a list of [`CompartmentAllocation`]s.
//!
//! # Units
//! Capacities and quantities are volumes (e.g., liters) as `f64`.
//! The consumer defines the unit; it must be the same everywhere.

use serde::{Deserialize, Serialize};

/// A physical compartment within a trailer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Compartment {
    /// Unique compartment identifier (within its trailer).
    pub id: String,
    /// Human-readable name (e.g., "C1 front").
    pub name: String,
    /// Maximum volume. Expected to be positive.
    pub capacity: f64,
    /// Product tag restricting what may be loaded (e.g., "diesel").
    pub product_type: String,
    /// Whether the compartment may hold less than its full capacity.
    pub partial_allowed: bool,
    /// Whether the compartment must receive a non-zero allocation
    /// whenever the trailer is used.
    pub must_use: bool,
}

/// A trailer owned by the fleet registry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Trailer {
    /// Unique trailer identifier.
    pub id: String,
    /// Compartments in physical order (front to back).
    pub compartments: Vec<Compartment>,
    /// Total volume used as the utilization denominator.
    pub total_capacity: f64,
}

/// One slice of a shipment's volume loaded into one compartment.
///
/// References the compartment by ID; the allocation may point at a
/// compartment that the trailer does not have.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompartmentAllocation {
    /// Referenced compartment ID.
    pub compartment_id: String,
    /// Allocated volume (>= 0).
    pub quantity: f64,
}

impl Compartment {
    /// Creates a compartment that accepts partial fills and is optional.
    pub fn new(id: impl Into<String>, capacity: f64, product_type: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            capacity,
            product_type: product_type.into(),
            partial_allowed: true,
            must_use: false,
        }
    }

    /// Sets the compartment name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets whether partial fills are allowed.
    pub fn with_partial_allowed(mut self, allowed: bool) -> Self {
        self.partial_allowed = allowed;
        self
    }

    /// Sets the must-use flag.
    pub fn with_must_use(mut self, must_use: bool) -> Self {
        self.must_use = must_use;
        self
    }
}

impl Trailer {
    /// Creates an empty trailer with zero total capacity.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            compartments: Vec::new(),
            total_capacity: 0.0,
        }
    }

    /// Creates a trailer whose total capacity is the sum of its compartments.
    pub fn from_compartments(id: impl Into<String>, compartments: Vec<Compartment>) -> Self {
        let total_capacity = compartments.iter().map(|c| c.capacity).sum();
        Self {
            id: id.into(),
            compartments,
            total_capacity,
        }
    }

    /// Appends a compartment. Does not touch `total_capacity`.
    pub fn with_compartment(mut self, compartment: Compartment) -> Self {
        self.compartments.push(compartment);
        self
    }

    /// Overrides the total capacity.
    pub fn with_total_capacity(mut self, total_capacity: f64) -> Self {
        self.total_capacity = total_capacity;
        self
    }

    /// Looks up a compartment by ID.
    pub fn compartment(&self, compartment_id: &str) -> Option<&Compartment> {
        self.compartments.iter().find(|c| c.id == compartment_id)
    }

    /// Sum of the compartment capacities.
    ///
    /// May differ from `total_capacity` when the registry records a
    /// rated total separately.
    pub fn compartment_capacity_sum(&self) -> f64 {
        self.compartments.iter().map(|c| c.capacity).sum()
    }

    /// Compartments tagged with the given product type.
    pub fn compartments_for<'a>(
        &'a self,
        product_type: &'a str,
    ) -> impl Iterator<Item = &'a Compartment> + 'a {
        self.compartments
            .iter()
            .filter(move |c| c.product_type == product_type)
    }
}

impl CompartmentAllocation {
    /// Creates a new allocation.
    pub fn new(compartment_id: impl Into<String>, quantity: f64) -> Self {
        Self {
            compartment_id: compartment_id.into(),
            quantity,
        }
    }
}

/// Quantity allocated to a compartment: the first matching entry, or 0.
pub(crate) fn allocated_quantity(allocations: &[CompartmentAllocation], compartment_id: &str) -> f64 {
    allocations
        .iter()
        .find(|a| a.compartment_id == compartment_id)
        .map(|a| a.quantity)
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_trailer() -> Trailer {
        Trailer::from_compartments(
            "T1",
            vec![
                Compartment::new("A", 5000.0, "diesel")
                    .with_name("Front")
                    .with_partial_allowed(false)
                    .with_must_use(true),
                Compartment::new("B", 3000.0, "gasoline"),
                Compartment::new("C", 2000.0, "diesel"),
            ],
        )
    }

    #[test]
    fn test_trailer_builder() {
        let t = sample_trailer();
        assert_eq!(t.id, "T1");
        assert_eq!(t.compartments.len(), 3);
        assert!((t.total_capacity - 10_000.0).abs() < 1e-10);
        assert!((t.compartment_capacity_sum() - 10_000.0).abs() < 1e-10);

        let a = t.compartment("A").unwrap();
        assert_eq!(a.name, "Front");
        assert!(!a.partial_allowed);
        assert!(a.must_use);
        assert!(t.compartment("Z").is_none());
    }

    #[test]
    fn test_compartment_defaults() {
        let c = Compartment::new("B", 3000.0, "gasoline");
        assert_eq!(c.name, "B");
        assert!(c.partial_allowed);
        assert!(!c.must_use);
    }

    #[test]
    fn test_total_capacity_override() {
        let t = Trailer::new("T2")
            .with_compartment(Compartment::new("A", 1000.0, "diesel"))
            .with_total_capacity(1200.0);
        assert!((t.total_capacity - 1200.0).abs() < 1e-10);
        assert!((t.compartment_capacity_sum() - 1000.0).abs() < 1e-10);
    }

    #[test]
    fn test_compartments_for_product() {
        let t = sample_trailer();
        let ids: Vec<&str> = t.compartments_for("diesel").map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["A", "C"]);
        assert_eq!(t.compartments_for("kerosene").count(), 0);
    }

    #[test]
    fn test_allocated_quantity_first_match() {
        let allocs = vec![
            CompartmentAllocation::new("A", 100.0),
            CompartmentAllocation::new("A", 900.0),
        ];
        assert!((allocated_quantity(&allocs, "A") - 100.0).abs() < 1e-10);
        assert!((allocated_quantity(&allocs, "B") - 0.0).abs() < 1e-10);
    }

    #[test]
    fn test_trailer_json_shape() {
        let t = sample_trailer();
        let json = serde_json::to_value(&t).unwrap();
        assert_eq!(json["compartments"][0]["must_use"], true);
        assert_eq!(json["compartments"][1]["product_type"], "gasoline");
    }
}
