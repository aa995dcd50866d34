//! Booking lookups used by the ledger.
//!
//! Bookings themselves are managed by the sales side of the back office. The
//! ledger resolves them before recording a payment and maintains their payment list.

use crate::{
    entities::{Booking, BookingPayment, booking, booking_payment},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, QuerySelect, Set, prelude::*};

/// Creates a booking record.
pub async fn create_booking(
    db: &DatabaseConnection,
    client_name: String,
    unit_number: String,
) -> Result<booking::Model> {
    if client_name.trim().is_empty() {
        return Err(Error::invalid_field("clientName", "Client name cannot be empty"));
    }

    let booking = booking::ActiveModel {
        client_name: Set(client_name.trim().to_string()),
        unit_number: Set(unit_number.trim().to_string()),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    booking.insert(db).await.map_err(Into::into)
}

/// Finds a booking by id.
pub async fn get_booking_by_id<C>(db: &C, booking_id: i64) -> Result<Option<booking::Model>>
where
    C: ConnectionTrait,
{
    Booking::find_by_id(booking_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Appends a ledger entry to the booking's payment list.
pub(crate) async fn append_payment<C>(
    db: &C,
    booking_id: i64,
    ledger_entry_id: i64,
) -> Result<booking_payment::Model>
where
    C: ConnectionTrait,
{
    let link = booking_payment::ActiveModel {
        booking_id: Set(booking_id),
        ledger_entry_id: Set(ledger_entry_id),
        ..Default::default()
    };
    link.insert(db).await.map_err(Into::into)
}

/// Returns the ledger entry ids in the booking's payment list, in append order.
pub async fn get_booking_payment_ids(db: &DatabaseConnection, booking_id: i64) -> Result<Vec<i64>> {
    BookingPayment::find()
        .select_only()
        .column(booking_payment::Column::LedgerEntryId)
        .filter(booking_payment::Column::BookingId.eq(booking_id))
        .order_by_asc(booking_payment::Column::Id)
        .into_tuple::<i64>()
        .all(db)
        .await
        .map_err(Into::into)
}
