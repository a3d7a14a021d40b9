//! Decoded call arguments and typed replies
//!
//! The wire envelope and its binary codec live outside this crate. By the time
//! a call reaches a dispatcher it has already been decoded into an ordered
//! tuple of [`CallValue`]s plus a named-option mapping. Replies leave as typed
//! values and are encoded by the same external codec.

use std::collections::HashMap;

use crate::error::{CallError, CallResult};
use crate::types::contract::InsuranceContract;

/// A single decoded argument value.
#[derive(Debug, Clone, PartialEq)]
pub enum CallValue {
    Int(i64),
    Float(f64),
    Str(String),
    None,
}

/// Decoded arguments for one call: the positional tuple plus named options.
///
/// Named options carry protocol tags such as `machoVersion`; handlers ignore
/// them, but they ride along so the codec boundary stays symmetric.
#[derive(Debug, Clone, Default)]
pub struct CallArgs {
    pub tuple: Vec<CallValue>,
    pub named: HashMap<String, CallValue>,
}

impl CallArgs {
    /// Build args from a positional tuple only.
    pub fn positional(tuple: Vec<CallValue>) -> Self {
        Self {
            tuple,
            named: HashMap::new(),
        }
    }

    /// Attach a named option (builder style).
    pub fn with_named(mut self, key: &str, value: CallValue) -> Self {
        self.named.insert(key.to_string(), value);
        self
    }

    /// Fail unless the tuple holds exactly `n` values.
    pub fn expect_arity(&self, n: usize) -> CallResult<()> {
        if self.tuple.len() != n {
            return Err(CallError::MalformedArguments(format!(
                "expected {} arguments, got {}",
                n,
                self.tuple.len()
            )));
        }
        Ok(())
    }

    /// Integer at position `idx`, as an unsigned identifier.
    pub fn uint(&self, idx: usize) -> CallResult<u32> {
        match self.get(idx)? {
            CallValue::Int(v) if *v >= 0 && *v <= u32::MAX as i64 => Ok(*v as u32),
            other => Err(Self::type_mismatch(idx, "unsigned integer", other)),
        }
    }

    /// Integer at position `idx`.
    pub fn int(&self, idx: usize) -> CallResult<i64> {
        match self.get(idx)? {
            CallValue::Int(v) => Ok(*v),
            other => Err(Self::type_mismatch(idx, "integer", other)),
        }
    }

    /// Float at position `idx`. Integers are not coerced.
    pub fn float(&self, idx: usize) -> CallResult<f64> {
        match self.get(idx)? {
            CallValue::Float(v) => Ok(*v),
            other => Err(Self::type_mismatch(idx, "float", other)),
        }
    }

    fn get(&self, idx: usize) -> CallResult<&CallValue> {
        self.tuple.get(idx).ok_or_else(|| {
            CallError::MalformedArguments(format!(
                "argument {} missing (tuple has {} values)",
                idx,
                self.tuple.len()
            ))
        })
    }

    fn type_mismatch(idx: usize, expected: &str, got: &CallValue) -> CallError {
        CallError::MalformedArguments(format!(
            "argument {}: expected {}, got {:?}",
            idx, expected, got
        ))
    }
}

/// Typed reply of a handled call.
///
/// `None` doubles as the acknowledgment for `InsureShip`: the call surface
/// carries no distinct success/rejection signal, so callers cannot tell a
/// quiet rejection from a bare success.
#[derive(Debug, Clone, PartialEq)]
pub enum CallReply {
    None,
    Quote(f64),
    Contract(InsuranceContract),
    Contracts(Vec<InsuranceContract>),
}
