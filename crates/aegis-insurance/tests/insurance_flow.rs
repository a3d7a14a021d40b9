//! End-to-end insurance flow: bind a session against the shared service and
//! drive every operation by name through the dispatchers, the way the
//! connection layer would after decoding the wire envelope.

use std::sync::Arc;

use aegis_common::{CallArgs, CallError, CallReply, CallValue};
use aegis_insurance::{
    InsuranceConfig, InsuranceService, MemoryCatalog, MemoryContractStore, MemoryLedger,
    Underwriter,
};

const TYPE_RIFTER: u32 = 587;
const SHIP_ID: u32 = 140_000_078;
const CALLER: u32 = 90_001;
const SHIP_VALUE: f64 = 1125.0;

struct Harness {
    service: InsuranceService,
    ledger: Arc<MemoryLedger>,
    store: Arc<MemoryContractStore>,
}

fn trace_init() {
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    });
}

fn harness() -> Harness {
    trace_init();
    let catalog = Arc::new(MemoryCatalog::new());
    catalog.add_type(TYPE_RIFTER, SHIP_VALUE);
    catalog.add_ship(SHIP_ID, TYPE_RIFTER, CALLER);

    let ledger = Arc::new(MemoryLedger::new());
    ledger.credit(CALLER, 1_000.0);

    let store = Arc::new(MemoryContractStore::new(catalog.clone()));
    let config = InsuranceConfig::default();
    let underwriter = Arc::new(Underwriter::new(
        store.clone(),
        catalog,
        ledger.clone(),
        config.tier_policy,
    ));

    Harness {
        service: InsuranceService::new(underwriter),
        ledger,
        store,
    }
}

fn insure_args(ship_id: u32, payment: f64) -> CallArgs {
    CallArgs::positional(vec![
        CallValue::Int(ship_id as i64),
        CallValue::Float(payment),
        CallValue::Int(0),
    ])
    .with_named("machoVersion", CallValue::Int(1))
}

#[tokio::test]
async fn full_purchase_and_replacement_flow() {
    let h = harness();

    // Unbound quote.
    let reply = h
        .service
        .call(
            "GetInsurancePrice",
            CallArgs::positional(vec![CallValue::Int(TYPE_RIFTER as i64)])
                .with_named("machoVersion", CallValue::Int(1)),
        )
        .await
        .unwrap();
    assert_eq!(reply, CallReply::Quote(SHIP_VALUE));

    // Bind and start with no contracts.
    let session = h.service.bind(CALLER).unwrap();
    let reply = session.call("GetContracts", CallArgs::default()).await.unwrap();
    assert_eq!(reply, CallReply::Contracts(vec![]));

    // Purchase at the 10% tier.
    let reply = session
        .call("InsureShip", insure_args(SHIP_ID, SHIP_VALUE * 0.10))
        .await
        .unwrap();
    assert_eq!(reply, CallReply::None);
    assert_eq!(h.ledger.balance(CALLER), 1_000.0 - 112.5);

    let CallReply::Contracts(contracts) = session
        .call("GetContracts", CallArgs::default())
        .await
        .unwrap()
    else {
        panic!("expected contract sequence");
    };
    assert_eq!(contracts.len(), 1);
    assert_eq!(contracts[0].fraction, 0.6);

    // The unbound lookup sees the same contract.
    let reply = h
        .service
        .call(
            "GetContractForShip",
            CallArgs::positional(vec![CallValue::Int(SHIP_ID as i64)]),
        )
        .await
        .unwrap();
    let CallReply::Contract(contract) = reply else {
        panic!("expected a contract row");
    };
    assert_eq!(contract.fraction, 0.6);

    // A payment off every tier is quietly rejected and changes nothing.
    let reply = session
        .call("InsureShip", insure_args(SHIP_ID, SHIP_VALUE * 0.22))
        .await
        .unwrap();
    assert_eq!(reply, CallReply::None);
    assert_eq!(h.ledger.balance(CALLER), 1_000.0 - 112.5);
    assert_eq!(h.store.len(), 1);

    // Re-insuring at the 30% tier replaces, never stacks.
    session
        .call("InsureShip", insure_args(SHIP_ID, SHIP_VALUE * 0.30))
        .await
        .unwrap();
    let CallReply::Contracts(contracts) = session
        .call("GetContracts", CallArgs::default())
        .await
        .unwrap()
    else {
        panic!("expected contract sequence");
    };
    assert_eq!(contracts.len(), 1);
    assert_eq!(contracts[0].fraction, 1.0);
    assert_eq!(h.ledger.balance(CALLER), 1_000.0 - 112.5 - 337.5);
}

#[tokio::test]
async fn dispatch_failures_are_explicit() {
    let h = harness();
    let session = h.service.bind(CALLER).unwrap();

    let err = session
        .call("GetQuoteHistory", CallArgs::default())
        .await
        .unwrap_err();
    assert!(matches!(err, CallError::UnknownOperation(_)));

    // Float where the ship id belongs.
    let args = CallArgs::positional(vec![
        CallValue::Float(140_000_078.0),
        CallValue::Float(112.5),
        CallValue::Int(0),
    ]);
    let err = session.call("InsureShip", args).await.unwrap_err();
    assert!(matches!(err, CallError::MalformedArguments(_)));

    // Nothing happened on either failure.
    assert!(h.store.is_empty());
    assert_eq!(h.ledger.balance(CALLER), 1_000.0);
}

#[tokio::test]
async fn sessions_are_scoped_to_their_caller() {
    let catalog = Arc::new(MemoryCatalog::new());
    catalog.add_type(TYPE_RIFTER, SHIP_VALUE);
    catalog.add_ship(1_001, TYPE_RIFTER, 90_001);
    catalog.add_ship(1_002, TYPE_RIFTER, 90_002);

    let ledger = Arc::new(MemoryLedger::new());
    ledger.credit(90_001, 1_000.0);
    ledger.credit(90_002, 1_000.0);

    let store = Arc::new(MemoryContractStore::new(catalog.clone()));
    let underwriter = Arc::new(Underwriter::new(
        store,
        catalog,
        ledger.clone(),
        InsuranceConfig::default().tier_policy,
    ));
    let service = InsuranceService::new(underwriter);

    let alice = service.bind(90_001).unwrap();
    let bob = service.bind(90_002).unwrap();

    alice
        .call("InsureShip", insure_args(1_001, SHIP_VALUE * 0.05))
        .await
        .unwrap();
    bob.call("InsureShip", insure_args(1_002, SHIP_VALUE * 0.30))
        .await
        .unwrap();

    let CallReply::Contracts(alices) =
        alice.call("GetContracts", CallArgs::default()).await.unwrap()
    else {
        panic!("expected contract sequence");
    };
    assert_eq!(alices.len(), 1);
    assert_eq!(alices[0].ship_id, 1_001);
    assert_eq!(alices[0].fraction, 0.5);

    let CallReply::Contracts(bobs) =
        bob.call("GetContracts", CallArgs::default()).await.unwrap()
    else {
        panic!("expected contract sequence");
    };
    assert_eq!(bobs.len(), 1);
    assert_eq!(bobs[0].ship_id, 1_002);
    assert_eq!(bobs[0].fraction, 1.0);

    // Each caller paid for their own purchase only.
    assert_eq!(ledger.balance(90_001), 1_000.0 - SHIP_VALUE * 0.05);
    assert_eq!(ledger.balance(90_002), 1_000.0 - SHIP_VALUE * 0.30);
}
