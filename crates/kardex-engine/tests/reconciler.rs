//! Behavioral tests for the stock reconciler: guard rules, compensation
//! on partial failure, bounded retries and racing writers.

mod support;

use std::sync::Arc;
use std::time::Duration;

use kardex_core::{MovementDraft, MovementType};
use kardex_engine::{EngineConfig, EngineError, StockReconciler, StoreError};

use support::MemoryStore;

fn reconciler(store: &Arc<MemoryStore>) -> StockReconciler {
    reconciler_with(store, EngineConfig::default())
}

fn reconciler_with(store: &Arc<MemoryStore>, config: EngineConfig) -> StockReconciler {
    StockReconciler::new(
        Arc::clone(store) as Arc<_>,
        Arc::clone(store) as Arc<_>,
        config,
    )
}

fn exit(product_id: i64, quantity: i64) -> MovementDraft {
    MovementDraft::new(MovementType::Exit, product_id, 1, quantity)
}

fn entry(product_id: i64, quantity: i64) -> MovementDraft {
    MovementDraft::new(MovementType::Entry, product_id, 1, quantity)
}

#[tokio::test]
async fn entry_increases_stock_and_records_movement() {
    let store = MemoryStore::new();
    store.seed_product(1, "FLT-0042", 10);
    let engine = reconciler(&store);

    let outcome = engine.register_movement(entry(1, 5)).await.unwrap();

    assert_eq!(outcome.new_quantity, 15);
    assert_eq!(store.product_quantity(1), 15);

    let movements = store.movements();
    assert_eq!(movements.len(), 1);
    assert_eq!(movements[0].id, outcome.movement_id);
    assert!(movements[0].is_active);
}

#[tokio::test]
async fn exit_decreases_stock() {
    let store = MemoryStore::new();
    store.seed_product(1, "FLT-0042", 10);
    let engine = reconciler(&store);

    let outcome = engine.register_movement(exit(1, 4)).await.unwrap();

    assert_eq!(outcome.new_quantity, 6);
    assert_eq!(store.product_quantity(1), 6);
}

#[tokio::test]
async fn exit_to_exactly_zero_is_allowed() {
    let store = MemoryStore::new();
    store.seed_product(1, "FLT-0042", 7);
    let engine = reconciler(&store);

    let outcome = engine.register_movement(exit(1, 7)).await.unwrap();

    assert_eq!(outcome.new_quantity, 0);
    assert_eq!(store.product_quantity(1), 0);

    // One more unit is now one too many.
    let err = engine.register_movement(exit(1, 1)).await.unwrap_err();
    assert!(matches!(
        err,
        EngineError::InsufficientStock { available: 0, .. }
    ));
}

#[tokio::test]
async fn insufficient_stock_reports_available_and_writes_nothing() {
    let store = MemoryStore::new();
    store.seed_product(1, "FLT-0042", 4);
    let engine = reconciler(&store);

    let err = engine.register_movement(exit(1, 6)).await.unwrap_err();

    match err {
        EngineError::InsufficientStock {
            available,
            requested,
            ..
        } => {
            assert_eq!(available, 4);
            assert_eq!(requested, 6);
        }
        other => panic!("expected InsufficientStock, got {other:?}"),
    }

    assert_eq!(store.product_quantity(1), 4);
    assert!(store.movements().is_empty());
}

#[tokio::test]
async fn zero_and_negative_quantities_are_rejected() {
    let store = MemoryStore::new();
    store.seed_product(1, "FLT-0042", 10);
    let engine = reconciler(&store);

    for quantity in [0, -3] {
        let err = engine
            .register_movement(entry(1, quantity))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidQuantity(q) if q == quantity));
    }

    assert!(store.movements().is_empty());
}

#[tokio::test]
async fn unknown_product_is_rejected() {
    let store = MemoryStore::new();
    let engine = reconciler(&store);

    let err = engine.register_movement(entry(99, 1)).await.unwrap_err();
    assert!(matches!(err, EngineError::ProductNotFound(99)));
}

#[tokio::test]
async fn inactive_product_is_rejected() {
    let store = MemoryStore::new();
    store.seed_product(1, "FLT-0042", 10);
    store.deactivate_product(1);
    let engine = reconciler(&store);

    let err = engine.register_movement(exit(1, 1)).await.unwrap_err();
    assert!(matches!(err, EngineError::ProductInactive(1)));
    assert!(store.movements().is_empty());
}

#[tokio::test]
async fn failed_stock_write_deactivates_the_appended_movement() {
    let store = MemoryStore::new();
    store.seed_product(1, "FLT-0042", 10);
    let engine = reconciler(&store);

    // One Applied would be needed; instead the write keeps answering
    // Stale until the attempt budget is gone.
    store.force_stale_writes(EngineConfig::default().max_write_attempts);

    let err = engine.register_movement(exit(1, 2)).await.unwrap_err();
    assert!(matches!(err, EngineError::Conflict { attempts: 3, .. }));

    // The attempt is auditable but carries no effect.
    let movements = store.movements();
    assert_eq!(movements.len(), 1);
    assert!(!movements[0].is_active);
    assert_eq!(store.product_quantity(1), 10);
}

#[tokio::test]
async fn single_attempt_budget_still_compensates_on_conflict() {
    let store = MemoryStore::new();
    store.seed_product(1, "FLT-0042", 10);
    let engine = reconciler_with(
        &store,
        EngineConfig {
            max_write_attempts: 1,
            ..EngineConfig::default()
        },
    );

    store.force_stale_writes(1);

    let err = engine.register_movement(exit(1, 2)).await.unwrap_err();
    assert!(matches!(err, EngineError::Conflict { attempts: 1, .. }));
    assert!(!store.movements()[0].is_active);
    assert_eq!(store.product_quantity(1), 10);
}

#[tokio::test]
async fn zero_attempt_budget_is_clamped_to_one_write() {
    let store = MemoryStore::new();
    store.seed_product(1, "FLT-0042", 10);
    let engine = reconciler_with(
        &store,
        EngineConfig {
            max_write_attempts: 0,
            ..EngineConfig::default()
        },
    );

    let outcome = engine.register_movement(exit(1, 2)).await.unwrap();
    assert_eq!(outcome.new_quantity, 8);
    assert_eq!(store.product_quantity(1), 8);
}

#[tokio::test]
async fn transient_staleness_is_retried_to_success() {
    let store = MemoryStore::new();
    store.seed_product(1, "FLT-0042", 10);
    let engine = reconciler(&store);

    store.force_stale_writes(1);

    let outcome = engine.register_movement(exit(1, 3)).await.unwrap();
    assert_eq!(outcome.new_quantity, 7);
    assert_eq!(store.product_quantity(1), 7);
}

#[tokio::test(start_paused = true)]
async fn slow_stock_write_times_out_and_rolls_back() {
    let store = MemoryStore::new();
    store.seed_product(1, "FLT-0042", 10);
    let engine = reconciler(&store);

    store.delay_quantity_writes(Duration::from_secs(30));

    let err = engine.register_movement(exit(1, 2)).await.unwrap_err();

    match err {
        EngineError::StockUpdateFailed {
            rolled_back,
            source,
            ..
        } => {
            assert!(rolled_back);
            assert!(matches!(source, StoreError::Timeout(_)));
        }
        other => panic!("expected StockUpdateFailed, got {other:?}"),
    }

    let movements = store.movements();
    assert_eq!(movements.len(), 1);
    assert!(!movements[0].is_active);
    assert_eq!(store.product_quantity(1), 10);
}

#[tokio::test(start_paused = true)]
async fn failed_rollback_is_reported_not_hidden() {
    let store = MemoryStore::new();
    store.seed_product(1, "FLT-0042", 10);
    let engine = reconciler(&store);

    store.delay_quantity_writes(Duration::from_secs(30));
    store.fail_movement_deactivations();

    let err = engine.register_movement(exit(1, 2)).await.unwrap_err();

    match err {
        EngineError::StockUpdateFailed { rolled_back, .. } => assert!(!rolled_back),
        other => panic!("expected StockUpdateFailed, got {other:?}"),
    }

    // The orphaned movement stays active, flagged for reconciliation.
    assert!(store.movements()[0].is_active);
}

#[tokio::test]
async fn retry_after_compensated_failure_converges() {
    let store = MemoryStore::new();
    store.seed_product(1, "FLT-0042", 10);
    let engine = reconciler(&store);

    store.force_stale_writes(EngineConfig::default().max_write_attempts);
    let err = engine.register_movement(exit(1, 2)).await.unwrap_err();
    assert!(matches!(err, EngineError::Conflict { .. }));

    // Same logical movement again, stores healthy now.
    let outcome = engine.register_movement(exit(1, 2)).await.unwrap();

    // Exactly one effective exit: the compensated attempt contributes
    // nothing to stock or to the audit total.
    assert_eq!(outcome.new_quantity, 8);
    assert_eq!(store.product_quantity(1), 8);
    assert_eq!(engine.ledger().recorded_delta(1).await.unwrap(), -2);
    assert_eq!(store.movements().len(), 2);
}

#[tokio::test]
async fn audit_total_matches_materialized_quantity() {
    let store = MemoryStore::new();
    store.seed_product(1, "FLT-0042", 20);
    let engine = reconciler(&store);

    engine.register_movement(entry(1, 5)).await.unwrap();
    engine.register_movement(exit(1, 8)).await.unwrap();
    engine.register_movement(exit(1, 2)).await.unwrap();

    let delta = engine.ledger().recorded_delta(1).await.unwrap();
    assert_eq!(delta, -5);
    assert_eq!(store.product_quantity(1), 20 + delta);
}

#[tokio::test]
async fn racing_exits_never_oversell() {
    let store = MemoryStore::new();
    store.seed_product(1, "FLT-0042", 10);
    let engine = Arc::new(reconciler(&store));

    // Both tasks rendezvous inside their first product read, so both
    // observe quantity 10 before either writes.
    store.arm_read_barrier(2, 2);

    let a = tokio::spawn({
        let engine = Arc::clone(&engine);
        async move { engine.register_movement(exit(1, 6)).await }
    });
    let b = tokio::spawn({
        let engine = Arc::clone(&engine);
        async move { engine.register_movement(exit(1, 6)).await }
    });

    let results = [a.await.unwrap(), b.await.unwrap()];

    let wins = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(wins, 1, "exactly one racing exit may succeed");

    let loser = results.iter().find(|r| r.is_err()).unwrap();
    match loser.as_ref().unwrap_err() {
        EngineError::InsufficientStock { available, .. } => assert_eq!(*available, 4),
        other => panic!("expected InsufficientStock for the loser, got {other:?}"),
    }

    // One applied exit, one compensated attempt, stock intact.
    assert_eq!(store.product_quantity(1), 4);
    let active: Vec<_> = store.movements().into_iter().filter(|m| m.is_active).collect();
    assert_eq!(active.len(), 1);
    assert_eq!(engine.ledger().recorded_delta(1).await.unwrap(), -6);
}
