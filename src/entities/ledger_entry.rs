//! Ledger entry entity - One row per financial transaction recorded against a booking.
//!
//! Entries are never physically removed. `is_deleted` together with `deleted_by`,
//! `deleted_date` and `deletion_reason` carries the soft-delete state; see [`Lifecycle`].
use crate::core::payment::{PaymentDetails, PaymentMethod, PaymentType};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Ledger entry database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "ledger_entries")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Storage primary key
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Generated transaction identifier, unique across deleted and live rows
    #[sea_orm(unique)]
    pub transaction_id: String,
    /// Booking this payment is credited against
    pub booking_id: i64,
    /// Paid amount, always positive
    pub amount: f64,
    /// Amount due at the time of payment
    pub demand: f64,
    /// Construction stage the payment belongs to, as a percentage
    pub stage_percentage: Option<f64>,
    /// What the money is for
    #[serde(rename = "type")]
    pub payment_type: PaymentType,
    /// How the money was paid
    pub method: PaymentMethod,
    /// Fields specific to `method`
    pub payment_details: PaymentDetails,
    /// Free-text description
    pub description: String,
    /// When the money moved
    pub transaction_date: DateTimeUtc,
    /// Destination bank account
    pub to_account: String,
    /// Source account, free text
    pub from_account: Option<String>,
    /// Actor who recorded the entry
    pub created_by: String,
    /// When the entry was recorded
    pub created_at: DateTimeUtc,
    /// Soft delete flag
    pub is_deleted: bool,
    /// Actor who soft-deleted the entry
    pub deleted_by: Option<String>,
    /// When the entry was soft-deleted
    pub deleted_date: Option<DateTimeUtc>,
    /// Why the entry was soft-deleted
    pub deletion_reason: Option<String>,
}

/// Defines relationships between ledger entries and bookings
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each entry belongs to one booking
    #[sea_orm(
        belongs_to = "super::booking::Entity",
        from = "Column::BookingId",
        to = "super::booking::Column::Id"
    )]
    Booking,
}

impl Related<super::booking::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Booking.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Soft-delete state of an entry. `Active -> Deleted -> Active` are the only transitions.
#[derive(Debug, Clone, PartialEq)]
pub enum Lifecycle {
    /// Visible in default listings and counted in summaries
    Active,
    /// Hidden from default listings and excluded from summaries
    Deleted {
        /// Who deleted it
        by: Option<String>,
        /// When it was deleted
        at: Option<DateTimeUtc>,
        /// Why it was deleted
        reason: Option<String>,
    },
}

impl Model {
    /// Reads the lifecycle state out of the flag and audit columns.
    #[must_use]
    pub fn lifecycle(&self) -> Lifecycle {
        if self.is_deleted {
            Lifecycle::Deleted {
                by: self.deleted_by.clone(),
                at: self.deleted_date,
                reason: self.deletion_reason.clone(),
            }
        } else {
            Lifecycle::Active
        }
    }
}
