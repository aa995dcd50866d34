//! Shared test utilities for the booking ledger.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    config::{LedgerConfig, database},
    core::{
        booking, ledger,
        validation::{NewPaymentRequest, PaymentDetailsInput},
    },
    entities,
    errors::Result,
};
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = database::create_connection("sqlite::memory:").await?;
    database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a test booking for `client_name` on unit `A-101`.
pub async fn create_test_booking(
    db: &DatabaseConnection,
    client_name: &str,
) -> Result<entities::booking::Model> {
    booking::create_booking(db, client_name.to_string(), "A-101".to_string()).await
}

/// Sets up a complete test environment with a booking.
/// Returns (db, booking) for common test scenarios.
pub async fn setup_with_booking() -> Result<(DatabaseConnection, entities::booking::Model)> {
    let db = setup_test_db().await?;
    let booking = create_test_booking(&db, "Test Client").await?;
    Ok((db, booking))
}

/// A valid cash schedule payment request.
///
/// # Defaults
/// * `demand`: same as `amount`
/// * `description`: `"Test payment"`
/// * `toAccount`: `"HDFC-CURRENT-001"`
pub fn cash_payment_request(booking_id: i64, amount: f64) -> NewPaymentRequest {
    NewPaymentRequest {
        booking_id: Some(booking_id),
        amount: Some(amount),
        demand: Some(amount),
        description: Some("Test payment".to_string()),
        payment_type: Some("schedule-payment".to_string()),
        method: Some("cash".to_string()),
        to_account: Some("HDFC-CURRENT-001".to_string()),
        ..NewPaymentRequest::default()
    }
}

/// A valid cheque schedule payment request: SBI cheque `000123`, dated
/// 2024-01-01 and due 2024-01-15.
pub fn cheque_payment_request(booking_id: i64, amount: f64) -> NewPaymentRequest {
    NewPaymentRequest {
        method: Some("cheque".to_string()),
        payment_details: PaymentDetailsInput {
            cheque_number: Some("000123".to_string()),
            bank_name: Some("SBI".to_string()),
            cheque_date: Some("2024-01-01".to_string()),
            due_date: Some("2024-01-15".to_string()),
            ..PaymentDetailsInput::default()
        },
        ..cash_payment_request(booking_id, amount)
    }
}

/// Records a cash schedule payment with default settings.
pub async fn create_test_payment(
    db: &DatabaseConnection,
    booking_id: i64,
    amount: f64,
) -> Result<entities::ledger_entry::Model> {
    ledger::create_payment(
        db,
        &cash_payment_request(booking_id, amount),
        "test_user",
        &LedgerConfig::default(),
    )
    .await
}

/// Records a cash payment with a custom type and optional transaction date.
pub async fn create_custom_payment(
    db: &DatabaseConnection,
    booking_id: i64,
    amount: f64,
    payment_type: &str,
    date: Option<&str>,
) -> Result<entities::ledger_entry::Model> {
    let request = NewPaymentRequest {
        payment_type: Some(payment_type.to_string()),
        date: date.map(ToString::to_string),
        ..cash_payment_request(booking_id, amount)
    };
    ledger::create_payment(db, &request, "test_user", &LedgerConfig::default()).await
}
