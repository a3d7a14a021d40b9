//! # Aegis Insurance
//!
//! Ship insurance for the Aegis server: price quoting, contract purchase and
//! replacement, and contract lookup, exposed as a session-bound call service.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  InsuranceService (unbound, process-lifetime)            │
//! │    GetInsurancePrice · GetContractForShip · bind()       │
//! │                         │                                │
//! │  InsuranceSession (bound, one per client)                │
//! │    GetContracts · GetInsurancePrice · InsureShip         │
//! │                         │                                │
//! │  Underwriter (shared domain logic)                       │
//! │    tier table · per-ship locks · purchase transaction    │
//! │                         │                                │
//! │  ContractStore ── Catalog ── Ledger  (collaborators)     │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Calls arrive pre-decoded (the wire codec is external) and are routed by
//! name through each object's [`aegis_common::Dispatcher`]. The purchase
//! transaction debits the buyer first, then replaces the contract under a
//! per-ship lock; rejections (unknown ship, payment matching no tier) reply
//! with the empty value rather than an error.

pub mod config;
pub mod domain;
pub mod memory;
pub mod service;
pub mod session;
pub mod store;

// Re-export core types
pub use config::InsuranceConfig;
pub use domain::{
    resolve_tier, FractionTier, PurchaseOutcome, TierPolicy, Underwriter, FRACTION_TIERS,
};
pub use memory::{MemoryCatalog, MemoryContractStore, MemoryLedger};
pub use service::InsuranceService;
pub use session::InsuranceSession;
pub use store::{Catalog, ContractStore, Ledger, ShipInfo, StoreError};
