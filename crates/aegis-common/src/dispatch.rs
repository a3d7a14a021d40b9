//! Name-to-handler call dispatch
//!
//! Both the unbound service and every bound session own a [`Dispatcher`] over
//! themselves. Registration happens once, when the owning object is
//! constructed, and the table is immutable afterwards; the finite set of
//! operations is known statically, so no reflection is involved.

use std::collections::HashMap;

use futures::future::BoxFuture;
use tracing::debug;

use crate::call::{CallArgs, CallReply};
use crate::error::{CallError, CallResult};

/// An async call handler on the owning object `S`.
pub type Handler<S> = for<'a> fn(&'a S, CallArgs) -> BoxFuture<'a, CallResult<CallReply>>;

/// Immutable name → handler routing table.
pub struct Dispatcher<S> {
    handlers: HashMap<&'static str, Handler<S>>,
}

impl<S> Dispatcher<S> {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Register a handler. Construction-time only; the last registration for
    /// a name wins, but duplicate names indicate a wiring bug.
    pub fn register(&mut self, name: &'static str, handler: Handler<S>) {
        self.handlers.insert(name, handler);
    }

    /// Route one call to its handler. Exactly one handler runs per call;
    /// an unregistered name fails without side effects.
    pub async fn dispatch(
        &self,
        target: &S,
        name: &str,
        args: CallArgs,
    ) -> CallResult<CallReply> {
        let handler = self
            .handlers
            .get(name)
            .ok_or_else(|| CallError::UnknownOperation(name.to_string()))?;

        debug!(operation = name, arity = args.tuple.len(), "dispatching call");
        handler(target, args).await
    }

    /// Registered operation names, for diagnostics.
    pub fn operations(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.handlers.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

impl<S> Default for Dispatcher<S> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::call::CallValue;

    struct Echo;

    impl Echo {
        async fn handle_ping(&self, args: CallArgs) -> CallResult<CallReply> {
            args.expect_arity(1)?;
            Ok(CallReply::Quote(args.float(0)?))
        }
    }

    fn dispatcher() -> Dispatcher<Echo> {
        let mut d = Dispatcher::new();
        d.register("Ping", |t: &Echo, args| Box::pin(t.handle_ping(args)));
        d
    }

    #[tokio::test]
    async fn test_dispatch_routes_to_handler() {
        let d = dispatcher();
        let reply = d
            .dispatch(&Echo, "Ping", CallArgs::positional(vec![CallValue::Float(1.5)]))
            .await
            .unwrap();
        assert_eq!(reply, CallReply::Quote(1.5));
    }

    #[tokio::test]
    async fn test_unknown_operation() {
        let d = dispatcher();
        let err = d
            .dispatch(&Echo, "Pong", CallArgs::default())
            .await
            .unwrap_err();
        assert!(matches!(err, CallError::UnknownOperation(name) if name == "Pong"));
    }

    #[tokio::test]
    async fn test_malformed_arguments_surface() {
        let d = dispatcher();
        let err = d
            .dispatch(&Echo, "Ping", CallArgs::default())
            .await
            .unwrap_err();
        assert!(matches!(err, CallError::MalformedArguments(_)));
    }

    #[test]
    fn test_operations_listing() {
        let d = dispatcher();
        assert_eq!(d.operations(), vec!["Ping"]);
    }
}
