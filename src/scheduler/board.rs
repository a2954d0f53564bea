//! Caller-owned scheduling board.
//!
//! Holds the trailers, vehicles, and shipments of one scheduling session
//! and gates every placement through the validators.
//!
//! # Placement
//!
//! 1. Availability check against the target vehicle's other bookings.
//! 2. Unless the policy allows overlapping bookings, any overlap rejects.
//! 3. Allocation validation against the vehicle's trailer.
//! 4. Commit. Nothing is written unless every step passes.
//!
//! Replacing a trailer or vehicle goes through the same gate: the new
//! registry must pass [`validate_fleet`], and every booking on an affected
//! vehicle must still fit its window and trailer.
//!
//! The board takes `&mut self` to commit, so moves on one board are
//! serialized by the borrow checker. Callers sharing a board across
//! threads wrap it in their own lock.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::allocation::validate_allocation_with;
use crate::availability::check_availability_in;
use crate::config::SchedulingPolicy;
use crate::error::ScheduleError;
use crate::models::{
    CompartmentAllocation, Shipment, ShipmentSlot, ShipmentState, Trailer, Vehicle,
};
use crate::utilization::{calculate_utilization, Utilization};
use crate::validation::{validate_fleet, ValidationError};

/// Result of a committed placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentOutcome {
    /// Placed shipment.
    pub shipment_id: String,
    /// Target vehicle.
    pub vehicle_id: String,
    /// Shipment state after the commit.
    pub state: ShipmentState,
    /// Trailer fill for this shipment's allocation.
    pub utilization: Utilization,
    /// Overlapping order IDs accepted under a permissive policy.
    pub overlaps: Vec<String>,
}

/// In-memory store of one scheduling session.
#[derive(Debug, Clone, Default)]
pub struct SchedulingBoard {
    policy: SchedulingPolicy,
    trailers: Vec<Trailer>,
    vehicles: Vec<Vehicle>,
    shipments: Vec<Shipment>,
}

impl SchedulingBoard {
    /// Creates an empty board.
    pub fn new(policy: SchedulingPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// Creates a board from registry data after integrity validation.
    ///
    /// Shipment states are derived from `vehicle_id`: shipments without a
    /// vehicle are `Unassigned`, shipments with one are at least `Assigned`.
    pub fn from_fleet(
        policy: SchedulingPolicy,
        trailers: Vec<Trailer>,
        vehicles: Vec<Vehicle>,
        mut shipments: Vec<Shipment>,
    ) -> Result<Self, Vec<ValidationError>> {
        validate_fleet(&trailers, &vehicles, &shipments)?;
        for s in &mut shipments {
            s.state = match (&s.vehicle_id, s.state) {
                (None, _) => ShipmentState::Unassigned,
                (Some(_), ShipmentState::Unassigned) => ShipmentState::Assigned,
                (Some(_), state) => state,
            };
        }
        debug!(
            trailers = trailers.len(),
            vehicles = vehicles.len(),
            shipments = shipments.len(),
            "board loaded"
        );
        Ok(Self {
            policy,
            trailers,
            vehicles,
            shipments,
        })
    }

    /// The active policy.
    pub fn policy(&self) -> &SchedulingPolicy {
        &self.policy
    }

    /// Adds or replaces a trailer (matched by ID).
    ///
    /// Rejected if the registry would fail integrity validation or if a
    /// booking on a vehicle pulling this trailer no longer fits it. On
    /// error the board is unchanged.
    pub fn add_trailer(&mut self, trailer: Trailer) -> Result<(), ScheduleError> {
        let mut trailers = self.trailers.clone();
        let id = trailer.id.clone();
        match trailers.iter_mut().find(|t| t.id == id) {
            Some(slot) => *slot = trailer,
            None => trailers.push(trailer),
        }
        self.check_registry(&id, &trailers, &self.vehicles, |v| v.trailer_id == id)?;
        self.trailers = trailers;
        debug!(trailer_id = %id, "trailer stored");
        Ok(())
    }

    /// Adds or replaces a vehicle (matched by ID).
    ///
    /// Rejected if the registry would fail integrity validation or if one
    /// of the vehicle's bookings no longer fits its status, window, or
    /// trailer. On error the board is unchanged.
    pub fn add_vehicle(&mut self, vehicle: Vehicle) -> Result<(), ScheduleError> {
        let mut vehicles = self.vehicles.clone();
        let id = vehicle.id.clone();
        match vehicles.iter_mut().find(|v| v.id == id) {
            Some(slot) => *slot = vehicle,
            None => vehicles.push(vehicle),
        }
        self.check_registry(&id, &self.trailers, &vehicles, |v| v.id == id)?;
        self.vehicles = vehicles;
        debug!(vehicle_id = %id, "vehicle stored");
        Ok(())
    }

    /// Adds an unassigned shipment.
    ///
    /// Any vehicle or allocations on the input are cleared; placement
    /// goes through [`assign`](Self::assign).
    pub fn add_shipment(&mut self, mut shipment: Shipment) -> Result<(), ScheduleError> {
        if self.shipment(&shipment.id).is_some() {
            return Err(ScheduleError::DuplicateShipment(shipment.id));
        }
        shipment.vehicle_id = None;
        shipment.compartment_allocations.clear();
        shipment.state = ShipmentState::Unassigned;
        self.shipments.push(shipment);
        Ok(())
    }

    /// All trailers.
    pub fn trailers(&self) -> &[Trailer] {
        &self.trailers
    }

    /// All vehicles.
    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    /// All shipments.
    pub fn shipments(&self) -> &[Shipment] {
        &self.shipments
    }

    /// Looks up a shipment.
    pub fn shipment(&self, shipment_id: &str) -> Option<&Shipment> {
        self.shipments.iter().find(|s| s.id == shipment_id)
    }

    /// Looks up a vehicle.
    pub fn vehicle(&self, vehicle_id: &str) -> Option<&Vehicle> {
        self.vehicles.iter().find(|v| v.id == vehicle_id)
    }

    /// Looks up a trailer.
    pub fn trailer(&self, trailer_id: &str) -> Option<&Trailer> {
        self.trailers.iter().find(|t| t.id == trailer_id)
    }

    /// The trailer pulled by a vehicle.
    pub fn trailer_for_vehicle(&self, vehicle_id: &str) -> Result<&Trailer, ScheduleError> {
        let vehicle = self
            .vehicle(vehicle_id)
            .ok_or_else(|| ScheduleError::UnknownVehicle(vehicle_id.to_string()))?;
        self.trailer(&vehicle.trailer_id)
            .ok_or_else(|| ScheduleError::UnknownTrailer {
                vehicle_id: vehicle.id.clone(),
                trailer_id: vehicle.trailer_id.clone(),
            })
    }

    /// Shipments booked on a vehicle.
    pub fn shipments_for_vehicle(&self, vehicle_id: &str) -> Vec<&Shipment> {
        self.shipments.iter().filter(|s| s.is_on(vehicle_id)).collect()
    }

    /// Shipments not on any vehicle.
    pub fn unassigned(&self) -> Vec<&Shipment> {
        self.shipments.iter().filter(|s| !s.is_assigned()).collect()
    }

    /// Runs every placement check without committing.
    pub fn preview(
        &self,
        shipment_id: &str,
        vehicle_id: &str,
        start_ms: i64,
        end_ms: i64,
        allocations: &[CompartmentAllocation],
    ) -> Result<AssignmentOutcome, ScheduleError> {
        let index = self.shipment_index(shipment_id)?;
        self.check_placement(index, vehicle_id, start_ms, end_ms, allocations)
    }

    /// Places a shipment on a vehicle and slot.
    ///
    /// An unassigned shipment becomes `Assigned`; an assigned one becomes
    /// `Moved`. On error the board is unchanged.
    pub fn assign(
        &mut self,
        shipment_id: &str,
        vehicle_id: &str,
        start_ms: i64,
        end_ms: i64,
        allocations: Vec<CompartmentAllocation>,
    ) -> Result<AssignmentOutcome, ScheduleError> {
        let index = self.shipment_index(shipment_id)?;
        let mut outcome = self.check_placement(index, vehicle_id, start_ms, end_ms, &allocations)?;

        let shipment = &mut self.shipments[index];
        shipment.state = match shipment.state {
            ShipmentState::Unassigned => ShipmentState::Assigned,
            ShipmentState::Assigned | ShipmentState::Moved => ShipmentState::Moved,
        };
        shipment.vehicle_id = Some(vehicle_id.to_string());
        shipment.start_ms = start_ms;
        shipment.end_ms = end_ms;
        shipment.compartment_allocations = allocations;
        outcome.state = shipment.state;

        info!(
            shipment_id,
            vehicle_id,
            state = ?outcome.state,
            utilization = outcome.utilization.utilization,
            "shipment placed"
        );
        Ok(outcome)
    }

    /// Moves an already-assigned shipment.
    pub fn move_shipment(
        &mut self,
        shipment_id: &str,
        vehicle_id: &str,
        start_ms: i64,
        end_ms: i64,
        allocations: Vec<CompartmentAllocation>,
    ) -> Result<AssignmentOutcome, ScheduleError> {
        let index = self.shipment_index(shipment_id)?;
        if !self.shipments[index].is_assigned() {
            return Err(ScheduleError::NotAssigned(shipment_id.to_string()));
        }
        self.assign(shipment_id, vehicle_id, start_ms, end_ms, allocations)
    }

    /// Takes a shipment off its vehicle and clears its allocations.
    pub fn unassign(&mut self, shipment_id: &str) -> Result<(), ScheduleError> {
        let index = self.shipment_index(shipment_id)?;
        let shipment = &mut self.shipments[index];
        if !shipment.is_assigned() {
            return Err(ScheduleError::NotAssigned(shipment_id.to_string()));
        }
        shipment.vehicle_id = None;
        shipment.compartment_allocations.clear();
        shipment.state = ShipmentState::Unassigned;
        debug!(shipment_id, "shipment unassigned");
        Ok(())
    }

    fn shipment_index(&self, shipment_id: &str) -> Result<usize, ScheduleError> {
        self.shipments
            .iter()
            .position(|s| s.id == shipment_id)
            .ok_or_else(|| ScheduleError::UnknownShipment(shipment_id.to_string()))
    }

    /// Validates a prospective registry against the current bookings.
    ///
    /// Only bookings on vehicles matching `affected` are re-checked; the
    /// others cannot have changed.
    fn check_registry(
        &self,
        id: &str,
        trailers: &[Trailer],
        vehicles: &[Vehicle],
        affected: impl Fn(&Vehicle) -> bool,
    ) -> Result<(), ScheduleError> {
        validate_fleet(trailers, vehicles, &self.shipments).map_err(ScheduleError::InvalidFleet)?;

        let order_ids: Vec<String> = self
            .shipments
            .iter()
            .filter_map(|s| {
                let vehicle = vehicles.iter().find(|v| s.is_on(&v.id) && affected(v))?;
                let trailer = trailers.iter().find(|t| t.id == vehicle.trailer_id);
                let fits = check_availability_in(
                    &self.policy,
                    vehicle,
                    std::iter::empty::<&Shipment>(),
                    &s.slot(),
                )
                .within_availability
                    && validate_allocation_with(
                        &self.policy,
                        trailer,
                        &s.compartment_allocations,
                        s.quantity,
                    )
                    .is_valid();
                (!fits).then(|| s.order_id.clone())
            })
            .collect();

        if order_ids.is_empty() {
            Ok(())
        } else {
            debug!(id, invalidated = order_ids.len(), "replacement rejected");
            Err(ScheduleError::BookingsInvalidated {
                id: id.to_string(),
                order_ids,
            })
        }
    }

    fn check_placement(
        &self,
        index: usize,
        vehicle_id: &str,
        start_ms: i64,
        end_ms: i64,
        allocations: &[CompartmentAllocation],
    ) -> Result<AssignmentOutcome, ScheduleError> {
        let shipment = &self.shipments[index];
        let slot = ShipmentSlot::new(shipment.order_id.clone(), start_ms, end_ms);
        if !slot.window().is_proper() {
            return Err(ScheduleError::InvalidSlot {
                order_id: slot.order_id,
                start_ms,
                end_ms,
            });
        }

        let vehicle = self
            .vehicle(vehicle_id)
            .ok_or_else(|| ScheduleError::UnknownVehicle(vehicle_id.to_string()))?;

        let existing = self
            .shipments
            .iter()
            .filter(|s| s.is_on(vehicle_id) && s.id != shipment.id);

        let check = check_availability_in(&self.policy, vehicle, existing, &slot);
        if !check.within_availability {
            let reason = check.reason.unwrap_or_default();
            debug!(shipment_id = %shipment.id, vehicle_id, %reason, "placement rejected");
            return Err(ScheduleError::Unavailable {
                vehicle_id: vehicle_id.to_string(),
                reason,
            });
        }
        if check.has_conflicts() && !self.policy.allow_overlapping_bookings {
            debug!(
                shipment_id = %shipment.id,
                vehicle_id,
                conflicts = check.overlaps.len(),
                "placement rejected"
            );
            return Err(ScheduleError::Conflict {
                vehicle_id: vehicle_id.to_string(),
                order_ids: check.overlaps,
            });
        }

        let trailer = self.trailer(&vehicle.trailer_id);
        let report = validate_allocation_with(&self.policy, trailer, allocations, shipment.quantity);
        let Some(trailer) = trailer else {
            return Err(ScheduleError::UnknownTrailer {
                vehicle_id: vehicle.id.clone(),
                trailer_id: vehicle.trailer_id.clone(),
            });
        };
        if !report.is_valid() {
            debug!(
                shipment_id = %shipment.id,
                vehicle_id,
                issues = report.errors.len(),
                "allocation rejected"
            );
            return Err(ScheduleError::InvalidAllocation {
                shipment_id: shipment.id.clone(),
                issues: report.errors,
            });
        }

        Ok(AssignmentOutcome {
            shipment_id: shipment.id.clone(),
            vehicle_id: vehicle_id.to_string(),
            state: shipment.state,
            utilization: calculate_utilization(trailer, allocations),
            overlaps: check.overlaps,
        })
    }
}
