//! End-to-end tests: the reconciliation engine wired over a real SQLite
//! database (in-memory, migrations applied).

use std::sync::Arc;

use kardex_core::{MovementDraft, MovementType, PaymentMethod, ReceiptType, SaleDraft};
use kardex_engine::{
    EngineConfig, EngineError, QuantityUpdate, SaleCoordinator, StockReconciler,
};
use kardex_store::{Database, DbConfig, DbError};

async fn database() -> Arc<Database> {
    Arc::new(Database::new(DbConfig::in_memory()).await.unwrap())
}

fn reconciler(db: &Arc<Database>) -> StockReconciler {
    StockReconciler::new(db.clone(), db.clone(), EngineConfig::default())
}

fn coordinator(db: &Arc<Database>) -> SaleCoordinator {
    SaleCoordinator::new(db.clone(), Arc::new(reconciler(db)))
}

fn sale(tax_id: &str, product_id: i64, quantity: i64) -> SaleDraft {
    SaleDraft {
        tax_id: tax_id.to_string(),
        customer_name: "Taller Mendoza".to_string(),
        address: "Jr. Los Mecanicos 456".to_string(),
        email: "taller@example.com".to_string(),
        product_id,
        unit_price_cents: 24_50,
        quantity,
        payment_method: PaymentMethod::Card,
        observations: Some("counter sale".to_string()),
        employee_id: 2,
    }
}

#[tokio::test]
async fn movement_round_trip_over_sqlite() {
    let db = database().await;
    let product = db.products().create("FLT-0042", "Oil Filter", 10_99, 10).await.unwrap();
    let engine = reconciler(&db);

    let outcome = engine
        .register_movement(MovementDraft::new(MovementType::Entry, product.id, 1, 5))
        .await
        .unwrap();
    assert_eq!(outcome.new_quantity, 15);

    let outcome = engine
        .register_movement(MovementDraft::new(MovementType::Exit, product.id, 1, 7))
        .await
        .unwrap();
    assert_eq!(outcome.new_quantity, 8);

    // The stored row agrees with the engine's answer.
    let stored = db.products().get_by_id(product.id).await.unwrap().unwrap();
    assert_eq!(stored.quantity, 8);

    // Ledger is newest first and sums to the net change.
    let movements = engine.ledger().movements_for_product(product.id).await.unwrap();
    assert_eq!(movements.len(), 2);
    assert_eq!(movements[0].movement_type, MovementType::Exit);
    assert_eq!(engine.ledger().recorded_delta(product.id).await.unwrap(), -2);
}

#[tokio::test]
async fn insufficient_stock_is_enforced_over_sqlite() {
    let db = database().await;
    let product = db.products().create("BRK-0010", "Brake Disc", 55_00, 3).await.unwrap();
    let engine = reconciler(&db);

    let err = engine
        .register_movement(MovementDraft::new(MovementType::Exit, product.id, 1, 5))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        EngineError::InsufficientStock { available: 3, .. }
    ));

    let stored = db.products().get_by_id(product.id).await.unwrap().unwrap();
    assert_eq!(stored.quantity, 3);
    assert!(engine.ledger().movements_for_product(product.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn inactive_product_is_rejected_over_sqlite() {
    let db = database().await;
    let product = db.products().create("SUS-0003", "Ball Joint", 18_00, 9).await.unwrap();
    db.products().deactivate(product.id).await.unwrap();
    let engine = reconciler(&db);

    let err = engine
        .register_movement(MovementDraft::new(MovementType::Exit, product.id, 1, 1))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::ProductInactive(_)));
}

#[tokio::test]
async fn full_sale_issues_receipt_and_adjusts_stock() {
    let db = database().await;
    let product = db.products().create("ELC-0007", "Spark Plug", 8_50, 10).await.unwrap();
    let sales = coordinator(&db);

    let outcome = sales.register_sale(sale("12345678", product.id, 2)).await.unwrap();

    assert_eq!(outcome.receipt_type, ReceiptType::Receipt);
    assert_eq!(outcome.new_quantity, 8);

    // Transaction persisted with the frozen unit price.
    let stored = db
        .transactions()
        .get_by_id(outcome.transaction_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.unit_price_cents, 24_50);
    assert_eq!(stored.receipt_type, ReceiptType::Receipt);
    assert_eq!(stored.total().cents(), 49_00);

    // Movement linked back to the sale.
    let movements = db.movements().list_for_product(product.id).await.unwrap();
    assert_eq!(movements.len(), 1);
    assert_eq!(movements[0].transaction_id, Some(outcome.transaction_id));
    assert_eq!(movements[0].movement_type, MovementType::Exit);
}

#[tokio::test]
async fn ruc_sale_is_classified_as_invoice() {
    let db = database().await;
    let product = db.products().create("FLD-0001", "Coolant Green", 12_00, 6).await.unwrap();
    let sales = coordinator(&db);

    let outcome = sales
        .register_sale(sale("20123456789", product.id, 1))
        .await
        .unwrap();
    assert_eq!(outcome.receipt_type, ReceiptType::Invoice);
}

#[tokio::test]
async fn oversold_sale_keeps_the_receipt_over_sqlite() {
    let db = database().await;
    let product = db.products().create("BRK-0020", "Brake Drum", 70_00, 1).await.unwrap();
    let sales = coordinator(&db);

    let err = sales.register_sale(sale("12345678", product.id, 4)).await.unwrap_err();

    let transaction_id = match err {
        EngineError::SaleRecordedButStockNotAdjusted { transaction_id, .. } => transaction_id,
        other => panic!("expected SaleRecordedButStockNotAdjusted, got {other:?}"),
    };

    let stored = db.transactions().get_by_id(transaction_id).await.unwrap().unwrap();
    assert!(stored.is_active);

    let product = db.products().get_by_id(product.id).await.unwrap().unwrap();
    assert_eq!(product.quantity, 1);
}

#[tokio::test]
async fn conditional_update_rejects_stale_expectations() {
    let db = database().await;
    let product = db.products().create("FLT-0001", "Air Filter", 9_99, 10).await.unwrap();

    // Matching guard applies.
    assert!(db.products().update_quantity_if(product.id, 10, 7).await.unwrap());

    // Stale guard does not.
    assert!(!db.products().update_quantity_if(product.id, 10, 4).await.unwrap());

    let stored = db.products().get_by_id(product.id).await.unwrap().unwrap();
    assert_eq!(stored.quantity, 7);
}

#[tokio::test]
async fn port_adapter_reports_staleness() {
    use kardex_engine::ProductStore;

    let db = database().await;
    let product = db.products().create("FLT-0002", "Fuel Filter", 14_99, 5).await.unwrap();

    let update = db.update_quantity(product.id, 99, 4).await.unwrap();
    assert_eq!(update, QuantityUpdate::Stale);

    let update = db.update_quantity(product.id, 5, 4).await.unwrap();
    assert_eq!(update, QuantityUpdate::Applied);
}

#[tokio::test]
async fn schema_backstop_rejects_invalid_movement_rows() {
    let db = database().await;
    let product = db.products().create("SUS-0001", "Coil Spring", 33_00, 5).await.unwrap();

    // The engine validates first, but the schema CHECK also refuses a
    // non-positive quantity if something bypasses it.
    let draft = MovementDraft::new(MovementType::Entry, product.id, 1, 0);
    let err = db.movements().insert(&draft).await.unwrap_err();
    assert!(matches!(err, DbError::CheckViolation { .. }));
}

#[tokio::test]
async fn duplicate_product_code_is_a_unique_violation() {
    let db = database().await;
    db.products().create("FLT-0042", "Oil Filter", 10_99, 10).await.unwrap();

    let err = db.products().create("FLT-0042", "Oil Filter Again", 11_99, 5).await.unwrap_err();
    assert!(matches!(err, DbError::UniqueViolation { .. }));
}

#[tokio::test]
async fn compensated_movement_is_visible_but_inert() {
    let db = database().await;
    let product = db.products().create("ELC-0001", "Alternator", 180_00, 10).await.unwrap();
    let engine = reconciler(&db);

    let outcome = engine
        .register_movement(MovementDraft::new(MovementType::Exit, product.id, 1, 4))
        .await
        .unwrap();

    // Simulate a compensation: the movement row stays, its effect doesn't
    // count.
    db.movements().deactivate(outcome.movement_id).await.unwrap();

    let movements = db.movements().list_for_product(product.id).await.unwrap();
    assert_eq!(movements.len(), 1);
    assert!(!movements[0].is_active);
    assert_eq!(engine.ledger().recorded_delta(product.id).await.unwrap(), 0);
}
