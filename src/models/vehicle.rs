//! Vehicle model.
//!
//! A vehicle pulls one trailer and may be scheduled only while active
//! and inside its availability window.

use serde::{Deserialize, Serialize};

use super::within_window;

/// Operational status of a vehicle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleStatus {
    /// Available for scheduling.
    #[default]
    Active,
    /// In the workshop; cannot accept shipments.
    Maintenance,
    /// Out of service; cannot accept shipments.
    Offline,
}

/// A vehicle in the fleet registry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Vehicle {
    /// Unique vehicle identifier.
    pub id: String,
    /// Human-readable name (plate, call sign).
    pub name: String,
    /// Operational status.
    pub status: VehicleStatus,
    /// Start of the availability window (ms, inclusive).
    pub availability_start_ms: i64,
    /// End of the availability window (ms, inclusive).
    pub availability_end_ms: i64,
    /// Associated trailer, by reference.
    pub trailer_id: String,
}

impl VehicleStatus {
    /// Whether the status blocks scheduling outright.
    pub fn is_blocked(self) -> bool {
        !matches!(self, VehicleStatus::Active)
    }
}

impl Vehicle {
    /// Creates an active vehicle with the given availability window.
    pub fn new(
        id: impl Into<String>,
        trailer_id: impl Into<String>,
        availability_start_ms: i64,
        availability_end_ms: i64,
    ) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            status: VehicleStatus::Active,
            availability_start_ms,
            availability_end_ms,
            trailer_id: trailer_id.into(),
        }
    }

    /// Sets the vehicle name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the operational status.
    pub fn with_status(mut self, status: VehicleStatus) -> Self {
        self.status = status;
        self
    }

    /// Length of the availability window (ms), 0 if inverted.
    pub fn availability_ms(&self) -> i64 {
        (self.availability_end_ms - self.availability_start_ms).max(0)
    }

    /// Whether an instant lies within the availability window (inclusive).
    pub fn is_available_at(&self, time_ms: i64) -> bool {
        within_window(time_ms, self.availability_start_ms, self.availability_end_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vehicle_builder() {
        let v = Vehicle::new("V1", "T1", 1000, 5000)
            .with_name("Truck 7")
            .with_status(VehicleStatus::Maintenance);
        assert_eq!(v.id, "V1");
        assert_eq!(v.trailer_id, "T1");
        assert_eq!(v.name, "Truck 7");
        assert_eq!(v.status, VehicleStatus::Maintenance);
        assert_eq!(v.availability_ms(), 4000);
    }

    #[test]
    fn test_status_blocking() {
        assert!(!VehicleStatus::Active.is_blocked());
        assert!(VehicleStatus::Maintenance.is_blocked());
        assert!(VehicleStatus::Offline.is_blocked());
    }

    #[test]
    fn test_availability_bounds_inclusive() {
        let v = Vehicle::new("V1", "T1", 1000, 5000);
        assert!(v.is_available_at(1000));
        assert!(v.is_available_at(5000));
        assert!(!v.is_available_at(999));
        assert!(!v.is_available_at(5001));
    }

    #[test]
    fn test_status_serde_lowercase() {
        let json = serde_json::to_string(&VehicleStatus::Offline).unwrap();
        assert_eq!(json, "\"offline\"");
        let status: VehicleStatus = serde_json::from_str("\"maintenance\"").unwrap();
        assert_eq!(status, VehicleStatus::Maintenance);
    }
}
