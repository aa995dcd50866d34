//! Payment vocabulary shared by validation, persistence, and reporting.
//!
//! `PaymentMethod` and `PaymentType` are stored as string columns. The detail bag
//! is modelled twice: [`Instrument`] is the tagged union that validation produces,
//! where each variant carries exactly the fields its method requires, and
//! [`PaymentDetails`] is the flat JSON shape persisted alongside the entry.

use chrono::NaiveDate;
use sea_orm::{FromJsonQueryResult, Iterable, entity::prelude::*};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// How the money was paid.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "kebab-case")]
pub enum PaymentMethod {
    /// Cash handed over at the site office
    #[sea_orm(string_value = "cash")]
    Cash,
    /// Cheque, tracked until it clears
    #[sea_orm(string_value = "cheque")]
    Cheque,
    /// Generic bank transfer
    #[sea_orm(string_value = "bank-transfer")]
    BankTransfer,
    /// Payment gateway / card
    #[sea_orm(string_value = "online-payment")]
    OnlinePayment,
    /// UPI
    #[sea_orm(string_value = "upi")]
    Upi,
    /// Demand draft
    #[sea_orm(string_value = "demand-draft")]
    DemandDraft,
    /// NEFT
    #[sea_orm(string_value = "neft")]
    Neft,
    /// RTGS
    #[sea_orm(string_value = "rtgs")]
    Rtgs,
    /// IMPS
    #[sea_orm(string_value = "imps")]
    Imps,
}

impl PaymentMethod {
    /// Wire name, as accepted in requests and stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Cheque => "cheque",
            Self::BankTransfer => "bank-transfer",
            Self::OnlinePayment => "online-payment",
            Self::Upi => "upi",
            Self::DemandDraft => "demand-draft",
            Self::Neft => "neft",
            Self::Rtgs => "rtgs",
            Self::Imps => "imps",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::iter()
            .find(|method| method.as_str() == s)
            .ok_or_else(|| {
                let allowed: Vec<&str> = Self::iter().map(Self::as_str).collect();
                format!("Invalid method '{s}', expected one of: {}", allowed.join(", "))
            })
    }
}

/// What the money is for.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "kebab-case")]
pub enum PaymentType {
    /// Installment from the booking's payment schedule
    #[sea_orm(string_value = "schedule-payment")]
    SchedulePayment,
    /// Paid ahead of schedule
    #[sea_orm(string_value = "advance")]
    Advance,
    /// Late-payment or other penalty
    #[sea_orm(string_value = "penalty")]
    Penalty,
    /// Manual correction
    #[sea_orm(string_value = "adjustment")]
    Adjustment,
    /// Money returned to the client
    #[sea_orm(string_value = "refund")]
    Refund,
}

/// Summary bucket a payment type contributes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryBucket {
    /// Counted in `totalPayments`
    Payments,
    /// Counted in `totalRefunds`
    Refunds,
    /// Counted in `totalPenalties`
    Penalties,
}

impl PaymentType {
    /// Wire name, as accepted in requests and stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SchedulePayment => "schedule-payment",
            Self::Advance => "advance",
            Self::Penalty => "penalty",
            Self::Adjustment => "adjustment",
            Self::Refund => "refund",
        }
    }

    /// Which summary total this type counts towards. Every type lands in exactly one bucket.
    #[must_use]
    pub const fn bucket(self) -> SummaryBucket {
        match self {
            Self::SchedulePayment | Self::Advance | Self::Adjustment => SummaryBucket::Payments,
            Self::Refund => SummaryBucket::Refunds,
            Self::Penalty => SummaryBucket::Penalties,
        }
    }
}

impl fmt::Display for PaymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| {
                let allowed: Vec<&str> = Self::iter().map(Self::as_str).collect();
                format!("Invalid type '{s}', expected one of: {}", allowed.join(", "))
            })
    }
}

/// Clearing state of a cheque.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChequeStatus {
    /// Received, not yet presented
    Pending,
    /// Funds received
    Cleared,
    /// Returned unpaid
    Bounced,
    /// Withdrawn by the drawer
    Cancelled,
}

impl FromStr for ChequeStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "cleared" => Ok(Self::Cleared),
            "bounced" => Ok(Self::Bounced),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(format!(
                "Invalid cheque status '{other}', expected pending, cleared, bounced or cancelled"
            )),
        }
    }
}

/// Persisted method-specific detail bag. Only the fields of the entry's method are set.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDetails {
    /// Demand draft or transfer reference (UTR)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_number: Option<String>,
    /// Issuing or sending bank
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank_name: Option<String>,
    /// Cheque leaf number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cheque_number: Option<String>,
    /// Date written on the cheque
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cheque_date: Option<NaiveDate>,
    /// Date the cheque may be presented
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    /// Clearing state, if tracked
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cheque_status: Option<ChequeStatus>,
    /// Gateway or UPI transaction id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    /// Day the digital payment or transfer went through
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_date: Option<NaiveDate>,
    /// Free-form remarks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Cheque fields. Validation guarantees `due_date >= cheque_date`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChequeDetails {
    /// Cheque leaf number
    pub cheque_number: String,
    /// Drawee bank
    pub bank_name: String,
    /// Date written on the cheque
    pub cheque_date: NaiveDate,
    /// Date the cheque may be presented
    pub due_date: NaiveDate,
    /// Clearing state, if known at entry time
    pub status: Option<ChequeStatus>,
}

/// UPI and online-payment share the same required fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigitalChannel {
    /// UPI
    Upi,
    /// Payment gateway / card
    OnlinePayment,
}

/// The bank-transfer family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferRail {
    /// Unspecified bank transfer
    BankTransfer,
    /// NEFT
    Neft,
    /// RTGS
    Rtgs,
    /// IMPS
    Imps,
}

/// A validated payment instrument: the method together with exactly the detail
/// fields that method declares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instrument {
    /// Cash, no details
    Cash,
    /// Demand draft; both details optional
    DemandDraft {
        /// Draft number
        reference_number: Option<String>,
        /// Issuing bank
        bank_name: Option<String>,
    },
    /// Cheque
    Cheque(ChequeDetails),
    /// UPI or online payment
    Digital {
        /// Which digital method
        channel: DigitalChannel,
        /// Gateway or UPI transaction id
        transaction_id: String,
        /// Day the payment went through
        transaction_date: NaiveDate,
    },
    /// Bank transfer family
    Transfer {
        /// Which transfer method
        rail: TransferRail,
        /// UTR or bank reference
        reference_number: String,
        /// Sending bank
        bank_name: String,
        /// Day the transfer went through
        transaction_date: NaiveDate,
    },
}

impl Instrument {
    /// The stored method for this instrument.
    #[must_use]
    pub const fn method(&self) -> PaymentMethod {
        match self {
            Self::Cash => PaymentMethod::Cash,
            Self::DemandDraft { .. } => PaymentMethod::DemandDraft,
            Self::Cheque(_) => PaymentMethod::Cheque,
            Self::Digital { channel, .. } => match channel {
                DigitalChannel::Upi => PaymentMethod::Upi,
                DigitalChannel::OnlinePayment => PaymentMethod::OnlinePayment,
            },
            Self::Transfer { rail, .. } => match rail {
                TransferRail::BankTransfer => PaymentMethod::BankTransfer,
                TransferRail::Neft => PaymentMethod::Neft,
                TransferRail::Rtgs => PaymentMethod::Rtgs,
                TransferRail::Imps => PaymentMethod::Imps,
            },
        }
    }

    /// Flattens the instrument into the persisted detail bag, dropping nothing it
    /// declares and carrying nothing it does not.
    #[must_use]
    pub fn into_details(self, notes: Option<String>) -> PaymentDetails {
        let base = PaymentDetails {
            notes,
            ..PaymentDetails::default()
        };
        match self {
            Self::Cash => base,
            Self::DemandDraft {
                reference_number,
                bank_name,
            } => PaymentDetails {
                reference_number,
                bank_name,
                ..base
            },
            Self::Cheque(cheque) => PaymentDetails {
                cheque_number: Some(cheque.cheque_number),
                bank_name: Some(cheque.bank_name),
                cheque_date: Some(cheque.cheque_date),
                due_date: Some(cheque.due_date),
                cheque_status: cheque.status,
                ..base
            },
            Self::Digital {
                transaction_id,
                transaction_date,
                ..
            } => PaymentDetails {
                transaction_id: Some(transaction_id),
                transaction_date: Some(transaction_date),
                ..base
            },
            Self::Transfer {
                reference_number,
                bank_name,
                transaction_date,
                ..
            } => PaymentDetails {
                reference_number: Some(reference_number),
                bank_name: Some(bank_name),
                transaction_date: Some(transaction_date),
                ..base
            },
        }
    }
}
