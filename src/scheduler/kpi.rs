//! Fleet quality metrics (KPIs).
//!
//! Computes booking and fill indicators from a scheduling board.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Booked ratio | Booked time inside the availability window / window length |
//! | Fill | Mean trailer utilization (%) of a vehicle's shipments |
//! | Avg booked ratio | Mean over vehicles with a non-empty window |
//! | Avg fill | Mean over vehicles with at least one shipment |

use std::collections::HashMap;

use super::SchedulingBoard;
use crate::models::TimeWindow;
use crate::utilization::calculate_utilization;

/// Fleet performance indicators.
#[derive(Debug, Clone)]
pub struct FleetKpi {
    /// Per-vehicle booked ratio (0.0..1.0 without overlaps).
    pub booked_ratio_by_vehicle: HashMap<String, f64>,
    /// Per-vehicle mean fill percentage.
    pub fill_by_vehicle: HashMap<String, f64>,
    /// Mean booked ratio.
    pub avg_booked_ratio: f64,
    /// Mean fill percentage.
    pub avg_fill: f64,
    /// Shipments on a vehicle.
    pub assigned_count: usize,
    /// Shipments not on any vehicle.
    pub unassigned_count: usize,
}

impl FleetKpi {
    /// Computes KPIs from the board's current state.
    pub fn calculate(board: &SchedulingBoard) -> Self {
        let mut booked_ratio_by_vehicle = HashMap::new();
        let mut fill_by_vehicle = HashMap::new();

        for vehicle in board.vehicles() {
            let shipments = board.shipments_for_vehicle(&vehicle.id);

            let window_ms = vehicle.availability_ms();
            if window_ms > 0 {
                let window = TimeWindow::new(vehicle.availability_start_ms, vehicle.availability_end_ms);
                let booked: i64 = shipments.iter().map(|s| s.window().overlap_ms(&window)).sum();
                booked_ratio_by_vehicle.insert(vehicle.id.clone(), booked as f64 / window_ms as f64);
            }

            if shipments.is_empty() {
                continue;
            }
            // Vehicles without a known trailer contribute no fill
            if let Some(trailer) = board.trailer(&vehicle.trailer_id) {
                let total: f64 = shipments
                    .iter()
                    .map(|s| calculate_utilization(trailer, &s.compartment_allocations).utilization)
                    .sum();
                fill_by_vehicle.insert(vehicle.id.clone(), total / shipments.len() as f64);
            }
        }

        let assigned_count = board.shipments().iter().filter(|s| s.is_assigned()).count();

        Self {
            avg_booked_ratio: mean(booked_ratio_by_vehicle.values()),
            avg_fill: mean(fill_by_vehicle.values()),
            booked_ratio_by_vehicle,
            fill_by_vehicle,
            assigned_count,
            unassigned_count: board.shipments().len() - assigned_count,
        }
    }

    /// Whether the fleet meets the given quality thresholds.
    pub fn meets_thresholds(&self, min_booked_ratio: f64, min_fill: f64) -> bool {
        self.avg_booked_ratio >= min_booked_ratio && self.avg_fill >= min_fill
    }
}

fn mean<'a>(values: impl ExactSizeIterator<Item = &'a f64>) -> f64 {
    let n = values.len();
    if n == 0 {
        return 0.0;
    }
    values.sum::<f64>() / n as f64
}
