//! Booking payment link - The booking's payment list, one row per recorded entry.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Booking payment link database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "booking_payments")]
pub struct Model {
    /// Append order within the list
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning booking
    pub booking_id: i64,
    /// Linked ledger entry
    pub ledger_entry_id: i64,
}

/// Defines relationships for the link table
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each link belongs to one booking
    #[sea_orm(
        belongs_to = "super::booking::Entity",
        from = "Column::BookingId",
        to = "super::booking::Column::Id"
    )]
    Booking,
    /// Each link points at one ledger entry
    #[sea_orm(
        belongs_to = "super::ledger_entry::Entity",
        from = "Column::LedgerEntryId",
        to = "super::ledger_entry::Column::Id"
    )]
    LedgerEntry,
}

impl Related<super::booking::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Booking.def()
    }
}

impl Related<super::ledger_entry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LedgerEntry.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
