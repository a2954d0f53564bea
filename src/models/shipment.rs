//! Shipment model.
//!
//! A shipment is one delivery order: a total volume, a time slot, an
//! optional vehicle, and the split of its volume across compartments.
//!
//! # Lifecycle
//! `Unassigned → Assigned → Moved*`. Transitions happen only through the
//! scheduling board after availability and allocation checks pass.

use serde::{Deserialize, Serialize};

use super::{CompartmentAllocation, TimeWindow};

/// Lifecycle state of a shipment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShipmentState {
    /// Created, not yet on a vehicle.
    #[default]
    Unassigned,
    /// Placed on a vehicle and time slot.
    Assigned,
    /// Re-placed at least once after the first assignment.
    Moved,
}

/// A delivery shipment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Shipment {
    /// Unique shipment identifier.
    pub id: String,
    /// Display key shown in conflict messages.
    pub order_id: String,
    /// Slot start (ms, inclusive).
    pub start_ms: i64,
    /// Slot end (ms, exclusive).
    pub end_ms: i64,
    /// Total volume.
    pub quantity: f64,
    /// Assigned vehicle, if any.
    pub vehicle_id: Option<String>,
    /// Split of `quantity` across the vehicle's trailer compartments.
    pub compartment_allocations: Vec<CompartmentAllocation>,
    /// Lifecycle state.
    #[serde(default)]
    pub state: ShipmentState,
}

/// A proposed placement: the candidate interval checked against a vehicle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShipmentSlot {
    /// Order ID of the shipment being placed.
    pub order_id: String,
    /// Slot start (ms, inclusive).
    pub start_ms: i64,
    /// Slot end (ms, exclusive).
    pub end_ms: i64,
}

impl Shipment {
    /// Creates an unassigned shipment.
    pub fn new(
        id: impl Into<String>,
        order_id: impl Into<String>,
        start_ms: i64,
        end_ms: i64,
        quantity: f64,
    ) -> Self {
        Self {
            id: id.into(),
            order_id: order_id.into(),
            start_ms,
            end_ms,
            quantity,
            vehicle_id: None,
            compartment_allocations: Vec::new(),
            state: ShipmentState::Unassigned,
        }
    }

    /// Places the shipment on a vehicle (marks it assigned).
    pub fn with_vehicle(mut self, vehicle_id: impl Into<String>) -> Self {
        self.vehicle_id = Some(vehicle_id.into());
        self.state = ShipmentState::Assigned;
        self
    }

    /// Adds a compartment allocation.
    pub fn with_allocation(mut self, compartment_id: impl Into<String>, quantity: f64) -> Self {
        self.compartment_allocations
            .push(CompartmentAllocation::new(compartment_id, quantity));
        self
    }

    /// The booked interval.
    #[inline]
    pub fn window(&self) -> TimeWindow {
        TimeWindow::new(self.start_ms, self.end_ms)
    }

    /// The booked interval as a candidate slot.
    pub fn slot(&self) -> ShipmentSlot {
        ShipmentSlot::new(self.order_id.clone(), self.start_ms, self.end_ms)
    }

    /// Whether the shipment is on a vehicle.
    pub fn is_assigned(&self) -> bool {
        self.vehicle_id.is_some()
    }

    /// Whether the shipment is on the given vehicle.
    pub fn is_on(&self, vehicle_id: &str) -> bool {
        self.vehicle_id.as_deref() == Some(vehicle_id)
    }

    /// Sum of the compartment allocations.
    pub fn allocated_quantity(&self) -> f64 {
        self.compartment_allocations.iter().map(|a| a.quantity).sum()
    }
}

impl ShipmentSlot {
    /// Creates a new slot.
    pub fn new(order_id: impl Into<String>, start_ms: i64, end_ms: i64) -> Self {
        Self {
            order_id: order_id.into(),
            start_ms,
            end_ms,
        }
    }

    /// The slot interval.
    #[inline]
    pub fn window(&self) -> TimeWindow {
        TimeWindow::new(self.start_ms, self.end_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shipment_builder() {
        let s = Shipment::new("S1", "ORD-1", 1000, 2000, 7000.0)
            .with_allocation("A", 5000.0)
            .with_allocation("B", 2000.0);
        assert_eq!(s.state, ShipmentState::Unassigned);
        assert!(!s.is_assigned());
        assert!((s.allocated_quantity() - 7000.0).abs() < 1e-10);
        assert_eq!(s.window().duration_ms(), 1000);

        let s = s.with_vehicle("V1");
        assert!(s.is_on("V1"));
        assert!(!s.is_on("V2"));
        assert_eq!(s.state, ShipmentState::Assigned);
    }

    #[test]
    fn test_slot_from_shipment() {
        let s = Shipment::new("S1", "ORD-1", 1000, 2000, 10.0);
        let slot = s.slot();
        assert_eq!(slot.order_id, "ORD-1");
        assert_eq!(slot.window(), TimeWindow::new(1000, 2000));
    }

    #[test]
    fn test_state_defaults_when_missing() {
        let json = r#"{
            "id": "S1", "order_id": "ORD-1", "start_ms": 0, "end_ms": 10,
            "quantity": 5.0, "vehicle_id": null, "compartment_allocations": []
        }"#;
        let s: Shipment = serde_json::from_str(json).unwrap();
        assert_eq!(s.state, ShipmentState::Unassigned);
    }
}
