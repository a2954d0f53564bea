//! Scheduling board and fleet KPIs.
//!
//! # Board
//!
//! `SchedulingBoard` is the caller-owned store of one scheduling session.
//! Every placement runs availability → allocation checks and commits
//! all-or-nothing.
//!
//! # KPI
//!
//! `FleetKpi` computes booked-time ratios and trailer fill per vehicle.

mod board;
mod kpi;

pub use board::{AssignmentOutcome, SchedulingBoard};
pub use kpi::FleetKpi;
