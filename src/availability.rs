//! Vehicle availability checking.
//!
//! Decides whether a vehicle can take a candidate slot, given its
//! operational status, its availability window, and the shipments already
//! booked on it.
//!
//! # Algorithm
//! 1. Offline or maintenance vehicles are rejected outright.
//! 2. Both slot endpoints must lie inside the closed availability window.
//!    Overlap checking is skipped when this fails.
//! 3. Every existing booking whose `[start, end)` overlaps the slot is
//!    reported by order ID. Overlaps are informational; the caller decides
//!    whether they block the booking.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::config::SchedulingPolicy;
use crate::models::{overlaps, within_window, Shipment, ShipmentSlot, Vehicle, VehicleStatus};

/// Outcome of [`check_availability`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityCheck {
    /// Whether the vehicle is active and the slot fits its window.
    pub within_availability: bool,
    /// Order IDs of existing bookings overlapping the slot.
    pub overlaps: Vec<String>,
    /// Why the slot is unavailable, or the conflicting order IDs.
    pub reason: Option<String>,
}

impl AvailabilityCheck {
    fn blocked(reason: impl Into<String>) -> Self {
        Self {
            within_availability: false,
            overlaps: Vec::new(),
            reason: Some(reason.into()),
        }
    }

    /// Whether the slot collides with any existing booking.
    pub fn has_conflicts(&self) -> bool {
        !self.overlaps.is_empty()
    }

    /// Available and conflict-free.
    pub fn is_clear(&self) -> bool {
        self.within_availability && !self.has_conflicts()
    }
}

/// Checks a candidate slot against a vehicle, rendering times in UTC.
///
/// `existing` is expected to hold only the vehicle's own bookings.
///
/// # Example
///
/// ```
/// use u_fleet::availability::check_availability;
/// use u_fleet::models::{Shipment, ShipmentSlot, Vehicle};
///
/// const HOUR: i64 = 3_600_000;
/// let vehicle = Vehicle::new("V1", "T1", 8 * HOUR, 18 * HOUR);
/// let booked = vec![Shipment::new("S1", "ORD-1", 9 * HOUR, 11 * HOUR, 1000.0).with_vehicle("V1")];
///
/// let check = check_availability(&vehicle, &booked, &ShipmentSlot::new("ORD-2", 10 * HOUR, 12 * HOUR));
/// assert!(check.within_availability);
/// assert_eq!(check.overlaps, vec!["ORD-1".to_string()]);
/// ```
pub fn check_availability(
    vehicle: &Vehicle,
    existing: &[Shipment],
    candidate: &ShipmentSlot,
) -> AvailabilityCheck {
    check_availability_with(&SchedulingPolicy::default(), vehicle, existing, candidate)
}

/// Checks a candidate slot against a vehicle under the given policy.
pub fn check_availability_with(
    policy: &SchedulingPolicy,
    vehicle: &Vehicle,
    existing: &[Shipment],
    candidate: &ShipmentSlot,
) -> AvailabilityCheck {
    check_availability_in(policy, vehicle, existing, candidate)
}

/// Same as [`check_availability_with`] over any iterator of bookings, so
/// the board can pass a filtered view without cloning.
pub(crate) fn check_availability_in<'a>(
    policy: &SchedulingPolicy,
    vehicle: &Vehicle,
    existing: impl IntoIterator<Item = &'a Shipment>,
    candidate: &ShipmentSlot,
) -> AvailabilityCheck {
    match vehicle.status {
        VehicleStatus::Offline => return AvailabilityCheck::blocked("Vehicle is offline"),
        VehicleStatus::Maintenance => {
            return AvailabilityCheck::blocked("Vehicle is under maintenance")
        }
        VehicleStatus::Active => {}
    }

    let (open, close) = (vehicle.availability_start_ms, vehicle.availability_end_ms);
    if !within_window(candidate.start_ms, open, close) || !within_window(candidate.end_ms, open, close)
    {
        let offset = policy.display_offset();
        return AvailabilityCheck::blocked(format!(
            "Vehicle only available {} – {}",
            format_clock(open, &offset),
            format_clock(close, &offset)
        ));
    }

    let conflicts: Vec<String> = existing
        .into_iter()
        .filter(|s| overlaps(candidate.start_ms, candidate.end_ms, s.start_ms, s.end_ms))
        .map(|s| s.order_id.clone())
        .collect();

    trace!(
        vehicle_id = %vehicle.id,
        order_id = %candidate.order_id,
        conflicts = conflicts.len(),
        "availability checked"
    );

    let reason = (!conflicts.is_empty()).then(|| conflicts.join(", "));
    AvailabilityCheck {
        within_availability: true,
        overlaps: conflicts,
        reason,
    }
}

/// Order IDs of bookings on `vehicle_id` overlapping `candidate`.
///
/// Pre-filters a full shipment list to one vehicle. `exclude` skips the
/// shipment being moved so it does not conflict with its own old slot.
pub fn find_conflicts(
    shipments: &[Shipment],
    vehicle_id: &str,
    candidate: &ShipmentSlot,
    exclude: Option<&str>,
) -> Vec<String> {
    shipments
        .iter()
        .filter(|s| s.is_on(vehicle_id))
        .filter(|s| exclude != Some(s.id.as_str()))
        .filter(|s| overlaps(candidate.start_ms, candidate.end_ms, s.start_ms, s.end_ms))
        .map(|s| s.order_id.clone())
        .collect()
}

/// Formats an epoch-ms instant as `HH:MM` in the given offset.
///
/// Falls back to the raw millisecond value for unrepresentable instants.
fn format_clock(time_ms: i64, offset: &FixedOffset) -> String {
    match DateTime::from_timestamp_millis(time_ms) {
        Some(dt) => dt.with_timezone(offset).format("%H:%M").to_string(),
        None => time_ms.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOUR: i64 = 3_600_000;

    fn vehicle() -> Vehicle {
        Vehicle::new("V1", "T1", 8 * HOUR, 18 * HOUR)
    }

    fn booked(id: &str, order: &str, start_h: i64, end_h: i64) -> Shipment {
        Shipment::new(id, order, start_h * HOUR, end_h * HOUR, 1000.0).with_vehicle("V1")
    }

    #[test]
    fn test_overlap_reported() {
        let existing = vec![booked("S1", "ORD-1", 9, 11)];
        let check = check_availability(
            &vehicle(),
            &existing,
            &ShipmentSlot::new("ORD-2", 10 * HOUR, 12 * HOUR),
        );
        assert!(check.within_availability);
        assert_eq!(check.overlaps, vec!["ORD-1".to_string()]);
        assert_eq!(check.reason.as_deref(), Some("ORD-1"));
        assert!(!check.is_clear());
    }

    #[test]
    fn test_outside_window() {
        let check = check_availability(
            &vehicle(),
            &[],
            &ShipmentSlot::new("ORD-2", 19 * HOUR, 20 * HOUR),
        );
        assert!(!check.within_availability);
        assert!(check.overlaps.is_empty());
        let reason = check.reason.unwrap();
        assert!(reason.contains("08:00"));
        assert!(reason.contains("18:00"));
    }

    #[test]
    fn test_window_failure_skips_overlaps() {
        let existing = vec![booked("S1", "ORD-1", 17, 19)];
        let check = check_availability(
            &vehicle(),
            &existing,
            &ShipmentSlot::new("ORD-2", 17 * HOUR, 19 * HOUR),
        );
        assert!(!check.within_availability);
        assert!(check.overlaps.is_empty());
    }

    #[test]
    fn test_offline_and_maintenance_block() {
        let existing = vec![booked("S1", "ORD-1", 9, 11)];
        let slot = ShipmentSlot::new("ORD-2", 9 * HOUR, 10 * HOUR);

        let offline = vehicle().with_status(VehicleStatus::Offline);
        let check = check_availability(&offline, &existing, &slot);
        assert!(!check.within_availability);
        assert!(check.overlaps.is_empty());
        assert_eq!(check.reason.as_deref(), Some("Vehicle is offline"));

        let maint = vehicle().with_status(VehicleStatus::Maintenance);
        let check = check_availability(&maint, &existing, &slot);
        assert!(!check.within_availability);
        assert!(check.overlaps.is_empty());
        assert!(check.reason.unwrap().contains("maintenance"));
    }

    #[test]
    fn test_status_reason_wins_over_window() {
        let existing = vec![booked("S1", "ORD-1", 19, 21)];
        let slot = ShipmentSlot::new("ORD-2", 19 * HOUR, 20 * HOUR);

        let offline = vehicle().with_status(VehicleStatus::Offline);
        let check = check_availability(&offline, &existing, &slot);
        assert!(!check.within_availability);
        assert!(check.overlaps.is_empty());
        assert_eq!(check.reason.as_deref(), Some("Vehicle is offline"));

        let maint = vehicle().with_status(VehicleStatus::Maintenance);
        let check = check_availability(&maint, &existing, &slot);
        assert!(!check.within_availability);
        assert!(check.overlaps.is_empty());
        assert_eq!(check.reason.as_deref(), Some("Vehicle is under maintenance"));
    }

    #[test]
    fn test_check_over_filtered_bookings() {
        let all = vec![
            booked("S1", "ORD-1", 9, 11),
            Shipment::new("S2", "ORD-9", 9 * HOUR, 11 * HOUR, 1.0).with_vehicle("V2"),
        ];
        let check = check_availability_in(
            &SchedulingPolicy::default(),
            &vehicle(),
            all.iter().filter(|s| s.is_on("V1")),
            &ShipmentSlot::new("ORD-2", 10 * HOUR, 12 * HOUR),
        );
        assert_eq!(check.overlaps, vec!["ORD-1".to_string()]);
    }

    #[test]
    fn test_slot_touching_window_edges() {
        let check = check_availability(
            &vehicle(),
            &[],
            &ShipmentSlot::new("ORD-2", 8 * HOUR, 18 * HOUR),
        );
        assert!(check.is_clear());
        assert!(check.reason.is_none());
    }

    #[test]
    fn test_back_to_back_is_clear() {
        let existing = vec![booked("S1", "ORD-1", 9, 10)];
        let check = check_availability(
            &vehicle(),
            &existing,
            &ShipmentSlot::new("ORD-2", 10 * HOUR, 11 * HOUR),
        );
        assert!(check.is_clear());
    }

    #[test]
    fn test_multiple_conflicts_joined() {
        let existing = vec![
            booked("S1", "ORD-1", 9, 11),
            booked("S2", "ORD-3", 11, 12),
            booked("S3", "ORD-4", 14, 15),
        ];
        let check = check_availability(
            &vehicle(),
            &existing,
            &ShipmentSlot::new("ORD-2", 10 * HOUR, 13 * HOUR),
        );
        assert_eq!(check.overlaps, vec!["ORD-1".to_string(), "ORD-3".to_string()]);
        assert_eq!(check.reason.as_deref(), Some("ORD-1, ORD-3"));
    }

    #[test]
    fn test_display_offset_applied() {
        let policy = SchedulingPolicy::default().with_display_offset_minutes(60);
        let check = check_availability_with(
            &policy,
            &vehicle(),
            &[],
            &ShipmentSlot::new("ORD-2", 19 * HOUR, 20 * HOUR),
        );
        let reason = check.reason.unwrap();
        assert!(reason.contains("09:00"));
        assert!(reason.contains("19:00"));
    }

    #[test]
    fn test_find_conflicts_filters_vehicle_and_self() {
        let shipments = vec![
            booked("S1", "ORD-1", 9, 11),
            Shipment::new("S2", "ORD-2", 9 * HOUR, 11 * HOUR, 1.0).with_vehicle("V2"),
            Shipment::new("S3", "ORD-3", 9 * HOUR, 11 * HOUR, 1.0),
        ];
        let slot = ShipmentSlot::new("ORD-1", 10 * HOUR, 12 * HOUR);
        assert_eq!(find_conflicts(&shipments, "V1", &slot, None), vec!["ORD-1".to_string()]);
        assert!(find_conflicts(&shipments, "V1", &slot, Some("S1")).is_empty());
    }

    #[test]
    fn test_format_clock_fallback() {
        let utc = FixedOffset::east_opt(0).unwrap();
        assert_eq!(format_clock(i64::MAX, &utc), i64::MAX.to_string());
        assert_eq!(format_clock(8 * HOUR + 30 * 60_000, &utc), "08:30");
    }
}
