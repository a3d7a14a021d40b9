//! # Aegis Common
//!
//! Shared call plumbing and domain types for the Aegis server.
//!
//! ## Core Types
//!
//! - [`CallValue`]/[`CallArgs`]: decoded call arguments (ordered tuple plus
//!   named options) as handed over by the external wire codec
//! - [`CallReply`]: typed handler results, encoded back by the same codec
//! - [`Dispatcher`]: immutable name → handler routing table, owned by both
//!   unbound services and bound sessions
//! - [`InsuranceContract`]: one active contract per ship
//! - [`CallError`]: infrastructure failures of the call layer

pub mod call;
pub mod dispatch;
pub mod error;
pub mod types;

// Re-export commonly used types at crate root
pub use call::{CallArgs, CallReply, CallValue};
pub use dispatch::{Dispatcher, Handler};
pub use error::{CallError, CallResult};
pub use types::{contract::InsuranceContract, CharacterId, ShipId, TypeId};

/// Aegis version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
