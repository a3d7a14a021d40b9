//! Bound insurance session
//!
//! One per client bind request, owned by the session/connection layer and
//! torn down with it. The caller identity is captured at bind time and never
//! changes; the underwriter handle is shared with the unbound service.

use std::sync::Arc;

use tracing::debug;

use aegis_common::{CallArgs, CallReply, CallResult, CharacterId, Dispatcher};

use crate::domain::Underwriter;

/// Session-scoped call surface: list own contracts, quote, purchase.
pub struct InsuranceSession {
    caller: CharacterId,
    underwriter: Arc<Underwriter>,
    dispatcher: Dispatcher<Self>,
}

impl InsuranceSession {
    pub(crate) fn new(caller: CharacterId, underwriter: Arc<Underwriter>) -> Self {
        let mut dispatcher = Dispatcher::new();
        dispatcher.register("GetContracts", |s: &Self, args| {
            Box::pin(s.handle_get_contracts(args))
        });
        dispatcher.register("GetInsurancePrice", |s: &Self, args| {
            Box::pin(s.handle_get_insurance_price(args))
        });
        dispatcher.register("InsureShip", |s: &Self, args| {
            Box::pin(s.handle_insure_ship(args))
        });

        Self {
            caller,
            underwriter,
            dispatcher,
        }
    }

    /// The identity captured at bind time.
    pub fn caller(&self) -> CharacterId {
        self.caller
    }

    /// Route a named call through this session's dispatcher.
    pub async fn call(&self, name: &str, args: CallArgs) -> CallResult<CallReply> {
        self.dispatcher.dispatch(self, name, args).await
    }

    /// `GetContracts()` - every contract on ships the caller owns.
    /// Empty sequence, not an error, when the caller owns no insured ships.
    async fn handle_get_contracts(&self, args: CallArgs) -> CallResult<CallReply> {
        args.expect_arity(0)?;
        let contracts = self.underwriter.contracts_for_owner(self.caller).await?;
        Ok(CallReply::Contracts(contracts))
    }

    /// `GetInsurancePrice(type_id)` - same contract as the unbound variant,
    /// exposed on the session for client convenience.
    async fn handle_get_insurance_price(&self, args: CallArgs) -> CallResult<CallReply> {
        args.expect_arity(1)?;
        let type_id = args.uint(0)?;
        Ok(match self.underwriter.quote(type_id).await {
            Some(price) => CallReply::Quote(price),
            None => CallReply::None,
        })
    }

    /// `InsureShip(ship_id, payment, reserved)` - purchase or replace the
    /// ship's contract. Success and rejection both reply with the empty
    /// value; the wire surface carries no distinct signal.
    async fn handle_insure_ship(&self, args: CallArgs) -> CallResult<CallReply> {
        args.expect_arity(3)?;
        let ship_id = args.uint(0)?;
        let payment = args.float(1)?;
        // Third field is present on the wire but carries nothing we use.
        let _reserved = args.int(2)?;

        let outcome = self
            .underwriter
            .insure(self.caller, ship_id, payment)
            .await?;
        if !outcome.is_insured() {
            debug!(caller = self.caller, ship_id, ?outcome, "InsureShip rejected");
        }
        Ok(CallReply::None)
    }
}
