//! Reference Scenario Integration Tests
//!
//! Runs the operator session end to end through the container, and checks
//! that the local registry and the ledger agree under concurrent load.

// Allow unwrap/expect in tests - tests should panic on unexpected errors
#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use counterparty_registry::application::commands::{CommandOutcome, OperatorCommand};
use counterparty_registry::application::dto::{RegisterCounterpartyDto, UpdateExposureDto};
use counterparty_registry::application::ports::LedgerMutation;
use counterparty_registry::config::load_config_from_string;
use counterparty_registry::domain::counterparty::value_objects::CoverageRatio;
use counterparty_registry::domain::shared::CounterpartyId;
use counterparty_registry::error::ErrorCode;
use counterparty_registry::infrastructure::config::InMemoryContainer;

fn register(identity: &str) -> RegisterCounterpartyDto {
    RegisterCounterpartyDto {
        identity: identity.to_string(),
        credit_score: 100,
        exposure_limit: 1000,
        default_probability: 10,
        loss_given_default: 50,
        collateral: 500,
    }
}

fn update(identity: &str, new_exposure: i64) -> UpdateExposureDto {
    UpdateExposureDto {
        identity: identity.to_string(),
        new_exposure,
    }
}

#[tokio::test]
async fn reference_session() {
    let container = InMemoryContainer::from_config(&load_config_from_string("").unwrap());
    let dispatcher = container.dispatcher();
    let id = CounterpartyId::parse("acme").unwrap();

    dispatcher
        .dispatch(OperatorCommand::Register(register("acme")))
        .await
        .unwrap();
    container
        .update_exposure_use_case()
        .execute(update("acme", 800))
        .await
        .unwrap();

    let risk = container.compute_risk_use_case();
    assert_eq!(risk.risk_score(&id).await.unwrap(), 80);
    assert_eq!(
        risk.coverage_ratio(&id).await.unwrap(),
        CoverageRatio::Covered(62)
    );
    assert_eq!(risk.expected_loss(&id).await.unwrap(), 40);

    let err = dispatcher
        .dispatch(OperatorCommand::UpdateExposure(update("acme", 1200)))
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::ExceedsLimit);
    assert_eq!(err.context_value("limit"), Some("1000"));

    let outcome = dispatcher
        .dispatch(OperatorCommand::ShowRecord {
            identity: "acme".to_string(),
        })
        .await
        .unwrap();
    let CommandOutcome::Record(record) = outcome else {
        panic!("expected record outcome");
    };
    assert_eq!(record.current_exposure, 800);
    assert_eq!(record.version, 1);
}

#[tokio::test]
async fn net_of_collateral_configuration() {
    let config =
        load_config_from_string("risk:\n  expected_loss_net_of_collateral: true\n").unwrap();
    let container = InMemoryContainer::from_config(&config);
    let id = CounterpartyId::parse("acme").unwrap();

    container
        .register_counterparty_use_case()
        .execute(register("acme"))
        .await
        .unwrap();
    container
        .update_exposure_use_case()
        .execute(update("acme", 800))
        .await
        .unwrap();

    let risk = container.compute_risk_use_case();
    assert_eq!(risk.expected_loss(&id).await.unwrap(), 15);
    assert_eq!(risk.risk_score(&id).await.unwrap(), 80);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_updates_keep_ledger_and_registry_in_step() {
    let container = Arc::new(InMemoryContainer::from_config(
        &load_config_from_string("gateway:\n  confirmation_latency_ms: 2\n").unwrap(),
    ));
    let identities = ["alpha", "beta", "gamma"];
    for identity in identities {
        container
            .register_counterparty_use_case()
            .execute(register(identity))
            .await
            .unwrap();
    }

    let mut handles = Vec::new();
    for identity in identities {
        for exposure in 1..=10_i64 {
            let container = Arc::clone(&container);
            handles.push(tokio::spawn(async move {
                container
                    .update_exposure_use_case()
                    .execute(update(identity, exposure * 50))
                    .await
            }));
        }
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let gateway = container.gateway();
    let query = container.query_record_use_case();
    for identity in identities {
        let id = CounterpartyId::parse(identity).unwrap();
        let record = query.get(&id).await.unwrap();
        assert_eq!(record.version(), 10);
        assert_eq!(gateway.exposure_of(&id), Some(record.current_exposure()));

        let sequences: Vec<u64> = gateway
            .submissions()
            .iter()
            .filter(|m| m.identity() == &id)
            .filter(|m| matches!(m, LedgerMutation::SetExposure { .. }))
            .map(LedgerMutation::sequence)
            .collect();
        assert_eq!(sequences, (1..=10).collect::<Vec<u64>>());
    }
    assert_eq!(container.sequencer().active_lanes(), 0);
}
