//! Collaborator traits: contract persistence, catalog lookup, ledger
//!
//! These are the seams to the rest of the server. The insurance core only
//! needs narrow views: CRUD on contracts keyed by ship, type/ship resolution,
//! and a balance debit. In-memory implementations live in [`crate::memory`].

use async_trait::async_trait;
use thiserror::Error;

use aegis_common::{CallError, CharacterId, InsuranceContract, ShipId, TypeId};

/// Errors from contract store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("duplicate contract for ship {0}")]
    DuplicateContract(ShipId),

    #[error("storage backend error: {0}")]
    Backend(String),
}

impl From<StoreError> for CallError {
    fn from(err: StoreError) -> Self {
        CallError::Storage(err.to_string())
    }
}

/// Persistence boundary for insurance contracts, keyed by ship.
///
/// Replacement is expressed through this interface as delete-then-insert,
/// never as an update; serialization of concurrent replacements for one ship
/// is the caller's concern (see [`crate::domain::Underwriter`]).
#[async_trait]
pub trait ContractStore: Send + Sync {
    /// The active contract for a ship, if any.
    async fn get(&self, ship_id: ShipId) -> Result<Option<InsuranceContract>, StoreError>;

    /// Every contract whose insured ship belongs to `owner`, resolved
    /// transitively through ship ownership.
    async fn list_by_owner(
        &self,
        owner: CharacterId,
    ) -> Result<Vec<InsuranceContract>, StoreError>;

    /// Insert a new contract. The ship must not already be insured.
    async fn insert(&self, contract: InsuranceContract) -> Result<(), StoreError>;

    /// Delete the contract for a ship. Returns whether one existed.
    async fn delete(&self, ship_id: ShipId) -> Result<bool, StoreError>;
}

/// Minimal ship-entity projection the purchase path needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShipInfo {
    pub ship_id: ShipId,
    pub type_id: TypeId,
    pub owner_id: CharacterId,
}

/// Item/ship catalog lookup.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Base monetary value of a ship type, if the type exists.
    async fn type_base_price(&self, type_id: TypeId) -> Option<f64>;

    /// Resolve a ship entity, if it exists.
    async fn ship(&self, ship_id: ShipId) -> Option<ShipInfo>;
}

/// Player currency balances.
#[async_trait]
pub trait Ledger: Send + Sync {
    /// Debit `amount` from a character's balance. Assumed to never fail under
    /// normal operation; the balance may go negative.
    async fn debit(&self, character: CharacterId, amount: f64);
}
