//! Unbound insurance service
//!
//! Process-lifetime object shared by every connection. Handles the calls that
//! need no session binding (quote by type, contract lookup by ship) and
//! constructs a bound [`InsuranceSession`] per client bind request.

use std::sync::Arc;

use tracing::debug;

use aegis_common::{CallArgs, CallReply, CallResult, CharacterId, Dispatcher};

use crate::domain::Underwriter;
use crate::session::InsuranceSession;

/// The unbound service. One per process.
pub struct InsuranceService {
    underwriter: Arc<Underwriter>,
    dispatcher: Dispatcher<Self>,
}

impl InsuranceService {
    /// Service name on the call surface.
    pub const NAME: &'static str = "insuranceSvc";

    pub fn new(underwriter: Arc<Underwriter>) -> Self {
        let mut dispatcher = Dispatcher::new();
        dispatcher.register("GetInsurancePrice", |s: &Self, args| {
            Box::pin(s.handle_get_insurance_price(args))
        });
        dispatcher.register("GetContractForShip", |s: &Self, args| {
            Box::pin(s.handle_get_contract_for_ship(args))
        });

        Self {
            underwriter,
            dispatcher,
        }
    }

    /// Route a named call through the service dispatcher.
    pub async fn call(&self, name: &str, args: CallArgs) -> CallResult<CallReply> {
        self.dispatcher.dispatch(self, name, args).await
    }

    /// Construct a session bound to `caller`. Fails only on resource
    /// exhaustion, which surfaces as `BindFailure` to the connection layer.
    pub fn bind(&self, caller: CharacterId) -> CallResult<InsuranceSession> {
        debug!(caller, "insurance bind request");
        Ok(InsuranceSession::new(caller, self.underwriter.clone()))
    }

    /// `GetInsurancePrice(type_id)` - the static catalog base value, or the
    /// empty reply when the type is unknown.
    async fn handle_get_insurance_price(&self, args: CallArgs) -> CallResult<CallReply> {
        args.expect_arity(1)?;
        let type_id = args.uint(0)?;
        Ok(match self.underwriter.quote(type_id).await {
            Some(price) => CallReply::Quote(price),
            None => CallReply::None,
        })
    }

    /// `GetContractForShip(ship_id)` - keyed by ship, not by caller, so no
    /// binding is required.
    async fn handle_get_contract_for_ship(&self, args: CallArgs) -> CallResult<CallReply> {
        args.expect_arity(1)?;
        let ship_id = args.uint(0)?;
        Ok(match self.underwriter.contract_for_ship(ship_id).await? {
            Some(contract) => CallReply::Contract(contract),
            None => CallReply::None,
        })
    }
}
