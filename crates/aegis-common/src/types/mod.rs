//! Shared domain types

pub mod contract;

/// Item/ship type identifier, as carried on the wire.
pub type TypeId = u32;

/// Ship entity identifier; unique key for insurance contracts.
pub type ShipId = u32;

/// Character identifier of the player that owns a session or a ship.
pub type CharacterId = u32;
