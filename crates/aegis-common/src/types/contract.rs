//! Insurance contract record
//!
//! One active contract per ship at any time. Replacement is delete-then-insert,
//! never an in-place update; there is no stacking.

use serde::{Deserialize, Serialize};

use super::ShipId;

/// An active ship insurance contract.
///
/// The owner is not stored here: it is resolved transitively through the ship,
/// the same way the backing store resolves it when listing by owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsuranceContract {
    /// The insured ship. Unique key.
    pub ship_id: ShipId,

    /// Payout ratio of the ship's value, one of
    /// {0.5, 0.6, 0.7, 0.8, 0.9, 1.0}.
    pub fraction: f64,

    /// Purchase timestamp (Unix milliseconds).
    pub start_date: i64,
}

impl InsuranceContract {
    /// Create a contract starting now.
    pub fn new(ship_id: ShipId, fraction: f64) -> Self {
        Self {
            ship_id,
            fraction,
            start_date: chrono::Utc::now().timestamp_millis(),
        }
    }
}

impl std::fmt::Display for InsuranceContract {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "InsuranceContract(ship={}, fraction={})",
            self.ship_id, self.fraction
        )
    }
}
