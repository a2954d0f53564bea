//! Fleet scheduling domain models.
//!
//! Plain data supplied by the caller's fleet registry and scheduling
//! store. The validators read these and never retain them.
//!
//! # Domain Mappings
//!
//! | u-fleet | Fuel distribution | Generic scheduling |
//! |---------|-------------------|--------------------|
//! | Vehicle | Tractor unit | Resource |
//! | Trailer | Tank trailer | Resource capacity profile |
//! | Compartment | Tank cell | Capacity bucket |
//! | Shipment | Delivery order | Task |

mod interval;
mod shipment;
mod trailer;
mod vehicle;

pub use interval::{overlaps, within_window, TimeWindow};
pub use shipment::{Shipment, ShipmentSlot, ShipmentState};
pub use trailer::{Compartment, CompartmentAllocation, Trailer};
pub use vehicle::{Vehicle, VehicleStatus};

pub(crate) use trailer::allocated_quantity;
