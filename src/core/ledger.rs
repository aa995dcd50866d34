//! Ledger business logic - Recording, soft-deleting, and restoring payments.
//!
//! A payment is only written after the whole request validates and its booking
//! resolves. After creation the only mutations are soft delete and restore, and
//! both are conditional updates on the current `is_deleted` value, so a concurrent
//! delete/restore pair cannot both succeed from the same starting state.

use crate::{
    config::LedgerConfig,
    core::{
        booking,
        validation::{NewPaymentRequest, validate_new_payment},
    },
    entities::{LedgerEntry, ledger_entry},
    errors::{Error, Result},
};
use rand::{Rng, distributions::Alphanumeric};
use sea_orm::{Set, TransactionTrait, prelude::*, sea_query::Expr};

const TRANSACTION_ID_SUFFIX_LEN: usize = 6;

/// Generates a transaction identifier of the form `TXN-<unix millis>-<6 alphanumerics>`.
///
/// Uniqueness is backed by the unique index on `transaction_id`.
#[must_use]
pub fn generate_transaction_id() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TRANSACTION_ID_SUFFIX_LEN)
        .map(char::from)
        .collect();
    format!(
        "TXN-{}-{}",
        chrono::Utc::now().timestamp_millis(),
        suffix.to_uppercase()
    )
}

/// Validates and records a payment, then appends it to the booking's payment list.
///
/// Validation covers every field before the database is touched. The entry insert
/// and the payment list append commit together.
///
/// # Arguments
/// * `request` - Raw creation request
/// * `created_by` - Authenticated actor recording the payment
/// * `limits` - Amount ceiling and description length from configuration
pub async fn create_payment(
    db: &DatabaseConnection,
    request: &NewPaymentRequest,
    created_by: &str,
    limits: &LedgerConfig,
) -> Result<ledger_entry::Model> {
    let payment = validate_new_payment(request, limits)?;

    let txn = db.begin().await?;

    booking::get_booking_by_id(&txn, payment.booking_id)
        .await?
        .ok_or(Error::BookingNotFound {
            id: payment.booking_id,
        })?;

    let now = chrono::Utc::now();
    let method = payment.instrument.method();
    let entry = ledger_entry::ActiveModel {
        transaction_id: Set(generate_transaction_id()),
        booking_id: Set(payment.booking_id),
        amount: Set(payment.amount),
        demand: Set(payment.demand),
        stage_percentage: Set(payment.stage_percentage),
        payment_type: Set(payment.payment_type),
        method: Set(method),
        payment_details: Set(payment.instrument.into_details(payment.notes)),
        description: Set(payment.description),
        transaction_date: Set(payment.transaction_date.unwrap_or(now)),
        to_account: Set(payment.to_account),
        from_account: Set(payment.from_account),
        created_by: Set(created_by.to_string()),
        created_at: Set(now),
        is_deleted: Set(false),
        deleted_by: Set(None),
        deleted_date: Set(None),
        deletion_reason: Set(None),
        ..Default::default()
    };

    let result = entry.insert(&txn).await?;
    booking::append_payment(&txn, result.booking_id, result.id).await?;

    txn.commit().await?;

    tracing::info!(
        "Recorded {} {} payment {} of {} against booking {}",
        result.payment_type,
        result.method,
        result.transaction_id,
        result.amount,
        result.booking_id
    );
    Ok(result)
}

/// Retrieves a ledger entry by id, deleted or not.
pub async fn get_payment_by_id(
    db: &DatabaseConnection,
    payment_id: i64,
) -> Result<Option<ledger_entry::Model>> {
    LedgerEntry::find_by_id(payment_id)
        .one(db)
        .await
        .map_err(Into::into)
}

async fn require_payment(db: &DatabaseConnection, payment_id: i64) -> Result<ledger_entry::Model> {
    get_payment_by_id(db, payment_id)
        .await?
        .ok_or(Error::PaymentNotFound { id: payment_id })
}

/// Soft-deletes a payment, recording who deleted it, when, and why.
///
/// The entry stays retrievable but drops out of default listings and summaries.
/// Fails with [`Error::AlreadyDeleted`] if the entry is already deleted.
pub async fn soft_delete_payment(
    db: &DatabaseConnection,
    payment_id: i64,
    deleted_by: &str,
    reason: Option<String>,
) -> Result<ledger_entry::Model> {
    let entry = require_payment(db, payment_id).await?;
    if entry.is_deleted {
        return Err(Error::AlreadyDeleted { id: payment_id });
    }

    let reason = reason
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty());
    let deleted_date = chrono::Utc::now();

    let updated = LedgerEntry::update_many()
        .col_expr(ledger_entry::Column::IsDeleted, Expr::value(true))
        .col_expr(
            ledger_entry::Column::DeletedBy,
            Expr::value(Some(deleted_by.to_string())),
        )
        .col_expr(ledger_entry::Column::DeletedDate, Expr::value(Some(deleted_date)))
        .col_expr(ledger_entry::Column::DeletionReason, Expr::value(reason))
        .filter(ledger_entry::Column::Id.eq(payment_id))
        .filter(ledger_entry::Column::IsDeleted.eq(false))
        .exec(db)
        .await?;

    // Lost a race with another delete
    if updated.rows_affected == 0 {
        return Err(Error::AlreadyDeleted { id: payment_id });
    }

    tracing::info!(
        "Payment {} ({}) soft-deleted by {}",
        payment_id,
        entry.transaction_id,
        deleted_by
    );
    require_payment(db, payment_id).await
}

/// Restores a soft-deleted payment, clearing all deletion fields together.
///
/// Fails with [`Error::NotDeleted`] if the entry is not deleted.
pub async fn restore_payment(
    db: &DatabaseConnection,
    payment_id: i64,
) -> Result<ledger_entry::Model> {
    let entry = require_payment(db, payment_id).await?;
    if !entry.is_deleted {
        return Err(Error::NotDeleted { id: payment_id });
    }

    let updated = LedgerEntry::update_many()
        .col_expr(ledger_entry::Column::IsDeleted, Expr::value(false))
        .col_expr(ledger_entry::Column::DeletedBy, Expr::value(None::<String>))
        .col_expr(
            ledger_entry::Column::DeletedDate,
            Expr::value(None::<DateTimeUtc>),
        )
        .col_expr(
            ledger_entry::Column::DeletionReason,
            Expr::value(None::<String>),
        )
        .filter(ledger_entry::Column::Id.eq(payment_id))
        .filter(ledger_entry::Column::IsDeleted.eq(true))
        .exec(db)
        .await?;

    if updated.rows_affected == 0 {
        return Err(Error::NotDeleted { id: payment_id });
    }

    tracing::info!("Payment {} ({}) restored", payment_id, entry.transaction_id);
    require_payment(db, payment_id).await
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::{
        core::payment::{PaymentMethod, PaymentType},
        entities::ledger_entry::Lifecycle,
        test_utils::*,
    };
    use std::collections::HashSet;

    #[test]
    fn test_transaction_id_format() {
        let id = generate_transaction_id();
        let parts: Vec<&str> = id.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "TXN");
        assert!(parts[1].parse::<i64>().is_ok());
        assert_eq!(parts[2].len(), TRANSACTION_ID_SUFFIX_LEN);
        assert!(
            parts[2]
                .chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        );
    }

    #[tokio::test]
    async fn test_create_payment_validation_runs_before_storage() -> Result<()> {
        let (db, booking) = setup_with_booking().await?;

        let request = NewPaymentRequest {
            amount: Some(-10.0),
            ..cash_payment_request(booking.id, 10.0)
        };
        let result = create_payment(&db, &request, "agent-7", &LedgerConfig::default()).await;
        assert!(matches!(result, Err(Error::Validation { .. })));

        // Nothing was written
        assert_eq!(LedgerEntry::find().count(&db).await?, 0);
        let linked = booking::get_booking_payment_ids(&db, booking.id).await?;
        assert!(linked.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_create_payment_booking_not_found() -> Result<()> {
        let db = setup_test_db().await?;

        let result = create_payment(
            &db,
            &cash_payment_request(999, 50.0),
            "agent-7",
            &LedgerConfig::default(),
        )
        .await;
        assert!(matches!(result, Err(Error::BookingNotFound { id: 999 })));
        assert_eq!(LedgerEntry::find().count(&db).await?, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_create_payment_persists_entry() -> Result<()> {
        let (db, booking) = setup_with_booking().await?;

        let before = chrono::Utc::now();
        let entry = create_payment(
            &db,
            &cheque_payment_request(booking.id, 50_000.0),
            "agent-7",
            &LedgerConfig::default(),
        )
        .await?;
        let after = chrono::Utc::now();

        assert_eq!(entry.booking_id, booking.id);
        assert_eq!(entry.amount, 50_000.0);
        assert_eq!(entry.demand, 50_000.0);
        assert_eq!(entry.method, PaymentMethod::Cheque);
        assert_eq!(entry.payment_type, PaymentType::SchedulePayment);
        assert_eq!(entry.created_by, "agent-7");
        assert!(entry.created_at >= before && entry.created_at <= after);
        assert_eq!(entry.transaction_date, entry.created_at);
        assert_eq!(entry.lifecycle(), Lifecycle::Active);
        assert_eq!(entry.payment_details.cheque_number.as_deref(), Some("000123"));
        assert_eq!(entry.payment_details.bank_name.as_deref(), Some("SBI"));
        assert!(entry.payment_details.transaction_id.is_none());

        let stored = get_payment_by_id(&db, entry.id).await?.unwrap();
        assert_eq!(stored, entry);

        let list = booking::get_booking_payment_ids(&db, booking.id).await?;
        assert_eq!(list, vec![entry.id]);
        Ok(())
    }

    #[tokio::test]
    async fn test_transaction_ids_are_unique() -> Result<()> {
        let (db, booking) = setup_with_booking().await?;

        let mut ids = HashSet::new();
        for i in 0..20 {
            let entry = create_test_payment(&db, booking.id, 100.0 + f64::from(i)).await?;
            assert!(ids.insert(entry.transaction_id));
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_soft_delete_sets_audit_fields() -> Result<()> {
        let (db, booking) = setup_with_booking().await?;
        let entry = create_test_payment(&db, booking.id, 1_000.0).await?;

        let deleted = soft_delete_payment(
            &db,
            entry.id,
            "auditor-1",
            Some("  duplicate entry ".to_string()),
        )
        .await?;

        assert!(deleted.is_deleted);
        assert_eq!(deleted.deleted_by.as_deref(), Some("auditor-1"));
        assert!(deleted.deleted_date.is_some());
        assert_eq!(deleted.deletion_reason.as_deref(), Some("duplicate entry"));
        assert!(matches!(deleted.lifecycle(), Lifecycle::Deleted { .. }));

        // Everything else is untouched
        assert_eq!(deleted.amount, entry.amount);
        assert_eq!(deleted.transaction_id, entry.transaction_id);
        Ok(())
    }

    #[tokio::test]
    async fn test_soft_delete_twice_conflicts() -> Result<()> {
        let (db, booking) = setup_with_booking().await?;
        let entry = create_test_payment(&db, booking.id, 1_000.0).await?;

        soft_delete_payment(&db, entry.id, "auditor-1", None).await?;
        let result = soft_delete_payment(&db, entry.id, "auditor-2", None).await;
        assert!(matches!(result, Err(Error::AlreadyDeleted { id }) if id == entry.id));

        // First deletion's audit fields survive
        let stored = get_payment_by_id(&db, entry.id).await?.unwrap();
        assert_eq!(stored.deleted_by.as_deref(), Some("auditor-1"));
        Ok(())
    }

    #[tokio::test]
    async fn test_restore_clears_deletion_fields() -> Result<()> {
        let (db, booking) = setup_with_booking().await?;
        let entry = create_test_payment(&db, booking.id, 1_000.0).await?;

        soft_delete_payment(&db, entry.id, "auditor-1", Some("typo".to_string())).await?;
        let restored = restore_payment(&db, entry.id).await?;

        assert!(!restored.is_deleted);
        assert_eq!(restored.deleted_by, None);
        assert_eq!(restored.deleted_date, None);
        assert_eq!(restored.deletion_reason, None);
        assert_eq!(restored, entry);
        Ok(())
    }

    #[tokio::test]
    async fn test_restore_active_entry_conflicts() -> Result<()> {
        let (db, booking) = setup_with_booking().await?;
        let entry = create_test_payment(&db, booking.id, 1_000.0).await?;

        let result = restore_payment(&db, entry.id).await;
        assert!(matches!(result, Err(Error::NotDeleted { id }) if id == entry.id));
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_and_restore_unknown_payment() -> Result<()> {
        let db = setup_test_db().await?;

        let result = soft_delete_payment(&db, 404, "auditor-1", None).await;
        assert!(matches!(result, Err(Error::PaymentNotFound { id: 404 })));

        let result = restore_payment(&db, 404).await;
        assert!(matches!(result, Err(Error::PaymentNotFound { id: 404 })));
        Ok(())
    }
}
