//! Insurance domain logic: fraction tiers and the purchase transaction
//!
//! The tier table maps the premium paid, as a fraction of the ship's base
//! value, to the payout fraction written into the contract:
//!
//! ```text
//! Label    Pay   Fraction
//! -------- ----- --------
//! Basis    0.05  0.5
//! Standard 0.10  0.6
//! Bronze   0.15  0.7
//! Silver   0.20  0.8
//! Gold     0.25  0.9
//! Platinum 0.30  1.0
//! ```

use std::sync::Arc;

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info};

use aegis_common::{CharacterId, InsuranceContract, ShipId, TypeId};

use crate::store::{Catalog, ContractStore, Ledger, StoreError};

/// One row of the static fraction-tier table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FractionTier {
    /// Premium as a fraction of the ship type's base value.
    pub payment_fraction: f64,
    /// Payout fraction written into the contract.
    pub payout_fraction: f64,
}

/// The six defined tiers, cheapest first. Not persisted anywhere.
pub const FRACTION_TIERS: [FractionTier; 6] = [
    FractionTier { payment_fraction: 0.05, payout_fraction: 0.5 },
    FractionTier { payment_fraction: 0.10, payout_fraction: 0.6 },
    FractionTier { payment_fraction: 0.15, payout_fraction: 0.7 },
    FractionTier { payment_fraction: 0.20, payout_fraction: 0.8 },
    FractionTier { payment_fraction: 0.25, payout_fraction: 0.9 },
    FractionTier { payment_fraction: 0.30, payout_fraction: 1.0 },
];

/// How a computed payment fraction is matched against the tier table.
///
/// `Exact` compares binary floats for equality, which client behavior
/// depends on; a payment of `0.099999 * value` matches nothing. The
/// comparison is isolated here so a tolerance policy can be swapped in
/// through configuration without touching any dispatch code.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TierPolicy {
    /// Bit-exact equality against the tier constants.
    Exact,
    /// Match within an absolute tolerance of a tier constant.
    Tolerance(f64),
}

impl TierPolicy {
    /// Resolve a payment fraction to its payout fraction, if any tier matches.
    pub fn resolve(&self, payment_fraction: f64) -> Option<f64> {
        match *self {
            TierPolicy::Exact => FRACTION_TIERS
                .iter()
                .find(|t| t.payment_fraction == payment_fraction)
                .map(|t| t.payout_fraction),
            TierPolicy::Tolerance(eps) => FRACTION_TIERS
                .iter()
                .find(|t| (t.payment_fraction - payment_fraction).abs() <= eps)
                .map(|t| t.payout_fraction),
        }
    }
}

impl Default for TierPolicy {
    fn default() -> Self {
        TierPolicy::Exact
    }
}

/// Exact tier lookup under the default policy.
pub fn resolve_tier(payment_fraction: f64) -> Option<f64> {
    TierPolicy::Exact.resolve(payment_fraction)
}

/// Outcome of an insurance purchase attempt.
///
/// Every non-`Insured` variant is a quiet rejection on the call surface: the
/// caller receives the same empty reply either way. The variants exist so the
/// domain can log why and so tests can tell the cases apart.
#[derive(Debug, Clone, PartialEq)]
pub enum PurchaseOutcome {
    Insured(InsuranceContract),
    /// The ship could not be resolved.
    UnresolvedShip,
    /// The ship resolved but its type has no catalog price.
    UnpricedType,
    /// The payment matches no tier. Nothing was debited or written.
    TierMismatch,
}

impl PurchaseOutcome {
    pub fn is_insured(&self) -> bool {
        matches!(self, PurchaseOutcome::Insured(_))
    }
}

/// The purchase engine shared by the unbound service and every bound session.
///
/// Holds non-owning handles to the collaborators and the per-ship lock
/// registry that serializes contract replacement.
pub struct Underwriter {
    store: Arc<dyn ContractStore>,
    catalog: Arc<dyn Catalog>,
    ledger: Arc<dyn Ledger>,
    tier_policy: TierPolicy,
    /// One mutex per ship that has ever been purchased against, shared by
    /// replacements and reads of that ship. Entries are tiny and bounded by
    /// the ship population, so none are evicted.
    ship_locks: DashMap<ShipId, Arc<Mutex<()>>>,
}

impl Underwriter {
    pub fn new(
        store: Arc<dyn ContractStore>,
        catalog: Arc<dyn Catalog>,
        ledger: Arc<dyn Ledger>,
        tier_policy: TierPolicy,
    ) -> Self {
        Self {
            store,
            catalog,
            ledger,
            tier_policy,
            ship_locks: DashMap::new(),
        }
    }

    /// Quote the insurance price for a ship type.
    ///
    /// Returns the static catalog base value, which is what the quote has
    /// always been. TODO: quote from a trailing market-price history once a
    /// market service exists to provide one.
    pub async fn quote(&self, type_id: TypeId) -> Option<f64> {
        self.catalog.type_base_price(type_id).await
    }

    /// The active contract for a ship, if any. Keyed by ship, so no caller
    /// identity is involved.
    ///
    /// Takes the ship's lock: an insured ship must never read as uninsured
    /// while a replacement sits between its delete and its insert.
    pub async fn contract_for_ship(
        &self,
        ship_id: ShipId,
    ) -> Result<Option<InsuranceContract>, StoreError> {
        let lock = self.ship_lock(ship_id);
        let _guard = lock.lock().await;
        self.store.get(ship_id).await
    }

    /// Every contract on ships owned by `owner`.
    ///
    /// Holds every lock currently in the registry, in key order, while the
    /// store is listed; any ship mid-replacement has a registry entry, so
    /// the listing cannot land inside a delete-insert gap. Writers only ever
    /// hold one ship lock, so the ordered sweep cannot deadlock.
    pub async fn contracts_for_owner(
        &self,
        owner: CharacterId,
    ) -> Result<Vec<InsuranceContract>, StoreError> {
        let mut locks: Vec<(ShipId, Arc<Mutex<()>>)> = self
            .ship_locks
            .iter()
            .map(|entry| (*entry.key(), entry.value().clone()))
            .collect();
        locks.sort_unstable_by_key(|(ship_id, _)| *ship_id);

        let mut guards = Vec::with_capacity(locks.len());
        for (_, lock) in &locks {
            guards.push(lock.lock().await);
        }
        self.store.list_by_owner(owner).await
    }

    /// Purchase insurance for a ship, replacing any existing contract.
    ///
    /// The whole sequence runs under the ship's lock so that a concurrent
    /// purchase or read never observes the gap between the delete and the
    /// insert. Payment is debited before the store is touched and there is no
    /// compensating credit if a store write fails afterwards.
    ///
    /// TODO: remove the contract when the insured ship is destroyed; needs
    /// destruction events from the item system.
    pub async fn insure(
        &self,
        buyer: CharacterId,
        ship_id: ShipId,
        payment: f64,
    ) -> Result<PurchaseOutcome, StoreError> {
        let lock = self.ship_lock(ship_id);
        let _guard = lock.lock().await;

        let Some(ship) = self.catalog.ship(ship_id).await else {
            debug!(ship_id, "insure rejected: ship not resolved");
            return Ok(PurchaseOutcome::UnresolvedShip);
        };
        let Some(ship_value) = self.catalog.type_base_price(ship.type_id).await else {
            debug!(ship_id, type_id = ship.type_id, "insure rejected: type has no price");
            return Ok(PurchaseOutcome::UnpricedType);
        };

        let payment_fraction = payment / ship_value;
        let Some(fraction) = self.tier_policy.resolve(payment_fraction) else {
            debug!(
                ship_id,
                payment, payment_fraction, "insure rejected: no matching tier"
            );
            return Ok(PurchaseOutcome::TierMismatch);
        };

        self.ledger.debit(buyer, payment).await;

        self.store.delete(ship_id).await?;
        let contract = InsuranceContract::new(ship_id, fraction);
        self.store.insert(contract.clone()).await?;

        info!(buyer, ship_id, fraction, payment, "ship insured");
        Ok(PurchaseOutcome::Insured(contract))
    }

    fn ship_lock(&self, ship_id: ShipId) -> Arc<Mutex<()>> {
        self.ship_locks.entry(ship_id).or_default().clone()
    }
}
