//! Scheduling policy configuration.
//!
//! Tunables shared by the validators and the scheduling board. Every
//! field has a default, so a partial JSON document (or `{}`) is a valid
//! configuration.
//!
//! ```
//! use u_fleet::config::{MustUsePolicy, SchedulingPolicy};
//!
//! let policy = SchedulingPolicy::from_json_str(r#"{"must_use_policy": "deduplicate"}"#).unwrap();
//! assert_eq!(policy.must_use_policy, MustUsePolicy::Deduplicate);
//! assert!(!policy.allow_overlapping_bookings);
//! ```

use chrono::{FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Largest display offset accepted (UTC±14:00), in minutes.
const MAX_OFFSET_MINUTES: u32 = 14 * 60;

/// How a must-use compartment left empty is reported.
///
/// An explicit zero allocation is caught twice: once while checking the
/// allocation entries and once while sweeping the trailer's must-use
/// compartments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MustUsePolicy {
    /// Emit both messages.
    #[default]
    ReportBoth,
    /// Emit only the first message for a compartment.
    Deduplicate,
}

/// Policy knobs for validation and booking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulingPolicy {
    /// Must-use reporting mode.
    pub must_use_policy: MustUsePolicy,
    /// Largest accepted difference between the allocation sum and the
    /// shipment quantity.
    pub quantity_tolerance: f64,
    /// Whether the board commits bookings that overlap existing ones.
    pub allow_overlapping_bookings: bool,
    /// Offset from UTC used when rendering times in messages (minutes).
    pub display_offset_minutes: i32,
}

impl Default for SchedulingPolicy {
    fn default() -> Self {
        Self {
            must_use_policy: MustUsePolicy::ReportBoth,
            quantity_tolerance: 1e-6,
            allow_overlapping_bookings: false,
            display_offset_minutes: 0,
        }
    }
}

impl SchedulingPolicy {
    /// Parses and validates a JSON policy document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let policy: Self = serde_json::from_str(json)?;
        policy.validate()?;
        Ok(policy)
    }

    /// Checks value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.quantity_tolerance.is_finite() || self.quantity_tolerance < 0.0 {
            return Err(ConfigError::Invalid {
                field: "quantity_tolerance",
                reason: format!("must be finite and >= 0, got {}", self.quantity_tolerance),
            });
        }
        if self.display_offset_minutes.unsigned_abs() > MAX_OFFSET_MINUTES {
            return Err(ConfigError::Invalid {
                field: "display_offset_minutes",
                reason: format!(
                    "must be within ±{MAX_OFFSET_MINUTES}, got {}",
                    self.display_offset_minutes
                ),
            });
        }
        Ok(())
    }

    /// Sets the must-use reporting mode.
    pub fn with_must_use_policy(mut self, policy: MustUsePolicy) -> Self {
        self.must_use_policy = policy;
        self
    }

    /// Allows or forbids overlapping bookings on the board.
    pub fn with_overlapping_bookings(mut self, allow: bool) -> Self {
        self.allow_overlapping_bookings = allow;
        self
    }

    /// Sets the display offset (minutes east of UTC).
    pub fn with_display_offset_minutes(mut self, minutes: i32) -> Self {
        self.display_offset_minutes = minutes;
        self
    }

    /// The display offset as a chrono offset; UTC if out of range.
    pub fn display_offset(&self) -> FixedOffset {
        self.display_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .unwrap_or_else(|| Utc.fix())
    }
}
