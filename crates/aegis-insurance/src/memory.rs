//! In-memory collaborator implementations
//!
//! Reference backends for the [`crate::store`] traits, used for wiring and
//! tests. A deployment would put the database-backed equivalents behind the
//! same traits.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::RwLock;

use aegis_common::{CharacterId, InsuranceContract, ShipId, TypeId};

use crate::store::{Catalog, ContractStore, Ledger, ShipInfo, StoreError};

/// Contract store backed by a concurrent map.
///
/// Holds a catalog handle to resolve contract ownership through the ship,
/// the way a SQL backend would join against the entity table.
pub struct MemoryContractStore {
    contracts: DashMap<ShipId, InsuranceContract>,
    catalog: Arc<dyn Catalog>,
}

impl MemoryContractStore {
    pub fn new(catalog: Arc<dyn Catalog>) -> Self {
        Self {
            contracts: DashMap::new(),
            catalog,
        }
    }

    /// Number of active contracts.
    pub fn len(&self) -> usize {
        self.contracts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contracts.is_empty()
    }
}

#[async_trait]
impl ContractStore for MemoryContractStore {
    async fn get(&self, ship_id: ShipId) -> Result<Option<InsuranceContract>, StoreError> {
        Ok(self.contracts.get(&ship_id).map(|c| c.clone()))
    }

    async fn list_by_owner(
        &self,
        owner: CharacterId,
    ) -> Result<Vec<InsuranceContract>, StoreError> {
        // Snapshot first; ownership resolution awaits the catalog and must
        // not hold map shards across that.
        let snapshot: Vec<InsuranceContract> =
            self.contracts.iter().map(|c| c.clone()).collect();

        let mut owned = Vec::new();
        for contract in snapshot {
            if let Some(ship) = self.catalog.ship(contract.ship_id).await {
                if ship.owner_id == owner {
                    owned.push(contract);
                }
            }
        }
        Ok(owned)
    }

    async fn insert(&self, contract: InsuranceContract) -> Result<(), StoreError> {
        match self.contracts.entry(contract.ship_id) {
            Entry::Occupied(_) => Err(StoreError::DuplicateContract(contract.ship_id)),
            Entry::Vacant(slot) => {
                slot.insert(contract);
                Ok(())
            }
        }
    }

    async fn delete(&self, ship_id: ShipId) -> Result<bool, StoreError> {
        Ok(self.contracts.remove(&ship_id).is_some())
    }
}

/// Catalog with registrable types and ships.
#[derive(Default)]
pub struct MemoryCatalog {
    prices: RwLock<HashMap<TypeId, f64>>,
    ships: RwLock<HashMap<ShipId, ShipInfo>>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_type(&self, type_id: TypeId, base_price: f64) {
        self.prices.write().insert(type_id, base_price);
    }

    pub fn add_ship(&self, ship_id: ShipId, type_id: TypeId, owner_id: CharacterId) {
        self.ships.write().insert(
            ship_id,
            ShipInfo {
                ship_id,
                type_id,
                owner_id,
            },
        );
    }
}

#[async_trait]
impl Catalog for MemoryCatalog {
    async fn type_base_price(&self, type_id: TypeId) -> Option<f64> {
        self.prices.read().get(&type_id).copied()
    }

    async fn ship(&self, ship_id: ShipId) -> Option<ShipInfo> {
        self.ships.read().get(&ship_id).copied()
    }
}

/// Ledger keeping one balance per character.
#[derive(Default)]
pub struct MemoryLedger {
    balances: DashMap<CharacterId, f64>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn credit(&self, character: CharacterId, amount: f64) {
        *self.balances.entry(character).or_insert(0.0) += amount;
    }

    pub fn balance(&self, character: CharacterId) -> f64 {
        self.balances.get(&character).map(|b| *b).unwrap_or(0.0)
    }
}

#[async_trait]
impl Ledger for MemoryLedger {
    async fn debit(&self, character: CharacterId, amount: f64) {
        // Unconditional; the balance may go negative.
        *self.balances.entry(character).or_insert(0.0) -= amount;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Arc<MemoryCatalog> {
        let catalog = Arc::new(MemoryCatalog::new());
        catalog.add_type(606, 1125.0);
        catalog.add_ship(1, 606, 10);
        catalog.add_ship(2, 606, 10);
        catalog.add_ship(3, 606, 20);
        catalog
    }

    #[tokio::test]
    async fn test_insert_get_delete() {
        let store = MemoryContractStore::new(catalog());

        store.insert(InsuranceContract::new(1, 0.5)).await.unwrap();
        assert_eq!(store.get(1).await.unwrap().unwrap().fraction, 0.5);

        assert!(store.delete(1).await.unwrap());
        assert!(!store.delete(1).await.unwrap());
        assert!(store.get(1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_insert_rejected() {
        let store = MemoryContractStore::new(catalog());

        store.insert(InsuranceContract::new(1, 0.5)).await.unwrap();
        let err = store.insert(InsuranceContract::new(1, 0.6)).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateContract(1)));
    }

    #[tokio::test]
    async fn test_list_by_owner_resolves_through_ships() {
        let store = MemoryContractStore::new(catalog());

        store.insert(InsuranceContract::new(1, 0.5)).await.unwrap();
        store.insert(InsuranceContract::new(2, 0.6)).await.unwrap();
        store.insert(InsuranceContract::new(3, 0.7)).await.unwrap();

        let mut owned = store.list_by_owner(10).await.unwrap();
        owned.sort_by_key(|c| c.ship_id);
        assert_eq!(owned.len(), 2);
        assert_eq!(owned[0].ship_id, 1);
        assert_eq!(owned[1].ship_id, 2);

        assert!(store.list_by_owner(99).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_ledger_debit_can_go_negative() {
        let ledger = MemoryLedger::new();
        ledger.credit(10, 100.0);

        ledger.debit(10, 150.0).await;
        assert_eq!(ledger.balance(10), -50.0);
    }
}
