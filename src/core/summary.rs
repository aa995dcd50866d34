//! Ledger listing and summary aggregation.
//!
//! A listing returns one page of a booking's entries plus totals. The totals are
//! computed over the same filter as the page, except that soft-deleted rows are
//! always left out of them, even when the page itself includes deleted rows.

use crate::{
    config::LedgerConfig,
    core::payment::{PaymentMethod, PaymentType, SummaryBucket},
    entities::{LedgerEntry, ledger_entry},
    errors::{Error, FieldError, Result},
};
use chrono::{NaiveDate, NaiveTime};
use sea_orm::{Condition, QueryOrder, QuerySelect, prelude::*, sea_query::Expr};
use serde::{Deserialize, Serialize};

/// Raw listing query parameters, as sent on the URL.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerQuery {
    /// 1-based page number
    pub page: Option<String>,
    /// Page size
    pub limit: Option<String>,
    /// `YYYY-MM-DD`, inclusive
    pub from_date: Option<String>,
    /// `YYYY-MM-DD`, inclusive
    pub to_date: Option<String>,
    /// Payment type name
    #[serde(rename = "type")]
    pub payment_type: Option<String>,
    /// Payment method name
    pub method: Option<String>,
    /// `true` to list soft-deleted entries too
    pub include_deleted: Option<String>,
}

/// Which entries of a booking a listing covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerFilter {
    /// Booking whose entries are listed
    pub booking_id: i64,
    /// Inclusive, from the start of this day (UTC)
    pub from_date: Option<NaiveDate>,
    /// Inclusive, to the end of this day (UTC)
    pub to_date: Option<NaiveDate>,
    /// Only this type
    pub payment_type: Option<PaymentType>,
    /// Only this method
    pub method: Option<PaymentMethod>,
    /// Only affects the page; summaries never include deleted rows
    pub include_deleted: bool,
}

impl LedgerFilter {
    /// Every live entry of a booking.
    #[must_use]
    pub const fn for_booking(booking_id: i64) -> Self {
        Self {
            booking_id,
            from_date: None,
            to_date: None,
            payment_type: None,
            method: None,
            include_deleted: false,
        }
    }

    /// Everything except the deleted-visibility toggle.
    fn condition(&self) -> Condition {
        let mut condition =
            Condition::all().add(ledger_entry::Column::BookingId.eq(self.booking_id));

        if let Some(from) = self.from_date {
            condition = condition.add(
                ledger_entry::Column::TransactionDate.gte(from.and_time(NaiveTime::MIN).and_utc()),
            );
        }
        if let Some(next_day) = self.to_date.and_then(|to| to.succ_opt()) {
            condition = condition.add(
                ledger_entry::Column::TransactionDate
                    .lt(next_day.and_time(NaiveTime::MIN).and_utc()),
            );
        }
        if let Some(payment_type) = self.payment_type {
            condition = condition.add(ledger_entry::Column::PaymentType.eq(payment_type));
        }
        if let Some(method) = self.method {
            condition = condition.add(ledger_entry::Column::Method.eq(method));
        }
        condition
    }
}

/// A normalised page request: `page` is 1-based and `limit` within the configured bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based page number
    pub page: u64,
    /// Rows per page
    pub limit: u64,
}

impl PageRequest {
    /// Applies defaults and clamps `limit` to `1..=max_page_limit`.
    #[must_use]
    pub fn new(page: Option<u64>, limit: Option<u64>, limits: &LedgerConfig) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            limit: limit
                .unwrap_or(limits.default_page_limit)
                .clamp(1, limits.max_page_limit.max(1)),
        }
    }
}

fn parse_number(errors: &mut Vec<FieldError>, field: &str, value: Option<&String>) -> Option<u64> {
    let raw = value.map(|s| s.trim()).filter(|s| !s.is_empty())?;
    match raw.parse::<u64>() {
        Ok(n) => Some(n),
        Err(_) => {
            errors.push(FieldError::new(field, format!("'{raw}' is not a valid number")));
            None
        }
    }
}

fn parse_filter_date(
    errors: &mut Vec<FieldError>,
    field: &str,
    value: Option<&String>,
) -> Option<NaiveDate> {
    let raw = value.map(|s| s.trim()).filter(|s| !s.is_empty())?;
    let date = crate::core::validation::parse_date(raw);
    if date.is_none() {
        errors.push(FieldError::new(field, format!("'{raw}' is not a valid date")));
    }
    date
}

impl LedgerQuery {
    /// Converts raw query parameters into a filter and page request for `booking_id`.
    ///
    /// # Errors
    /// Returns [`Error::Validation`] naming every malformed parameter.
    pub fn into_filter(
        self,
        booking_id: i64,
        limits: &LedgerConfig,
    ) -> Result<(LedgerFilter, PageRequest)> {
        let mut errors = Vec::new();

        let page = parse_number(&mut errors, "page", self.page.as_ref());
        let limit = parse_number(&mut errors, "limit", self.limit.as_ref());
        let from_date = parse_filter_date(&mut errors, "fromDate", self.from_date.as_ref());
        let to_date = parse_filter_date(&mut errors, "toDate", self.to_date.as_ref());

        let payment_type = self
            .payment_type
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .and_then(|raw| {
                raw.parse::<PaymentType>()
                    .map_err(|message| errors.push(FieldError::new("type", message)))
                    .ok()
            });
        let method = self
            .method
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .and_then(|raw| {
                raw.parse::<PaymentMethod>()
                    .map_err(|message| errors.push(FieldError::new("method", message)))
                    .ok()
            });

        let include_deleted = match self.include_deleted.as_deref().map(str::trim) {
            None | Some("" | "false" | "0") => false,
            Some("true" | "1") => true,
            Some(other) => {
                errors.push(FieldError::new(
                    "includeDeleted",
                    format!("'{other}' is not a valid boolean"),
                ));
                false
            }
        };

        if let (Some(from), Some(to)) = (from_date, to_date) {
            if to < from {
                errors.push(FieldError::new("toDate", "toDate cannot be before fromDate"));
            }
        }

        // The row offset must fit the database's signed 64-bit OFFSET
        let page_request = PageRequest::new(page, limit, limits);
        let offset_fits = (page_request.page - 1)
            .checked_mul(page_request.limit)
            .is_some_and(|offset| i64::try_from(offset).is_ok());
        if !offset_fits {
            errors.push(FieldError::new(
                "page",
                format!("Page {} is out of range", page_request.page),
            ));
        }

        if !errors.is_empty() {
            return Err(Error::Validation { errors });
        }

        Ok((
            LedgerFilter {
                booking_id,
                from_date,
                to_date,
                payment_type,
                method,
                include_deleted,
            },
            page_request,
        ))
    }
}

/// Totals over the live entries matching a filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerSummary {
    /// Sum of the three bucket totals
    pub total_amount: f64,
    /// Schedule payments, advances, and adjustments
    pub total_payments: f64,
    /// Refunds
    pub total_refunds: f64,
    /// Penalties
    pub total_penalties: f64,
}

impl LedgerSummary {
    /// Folds per-type sums into the summary buckets.
    #[must_use]
    pub fn from_type_totals<I>(totals: I) -> Self
    where
        I: IntoIterator<Item = (PaymentType, f64)>,
    {
        let mut summary = totals.into_iter().fold(
            Self::default(),
            |mut summary, (payment_type, amount)| {
                match payment_type.bucket() {
                    SummaryBucket::Payments => summary.total_payments += amount,
                    SummaryBucket::Refunds => summary.total_refunds += amount,
                    SummaryBucket::Penalties => summary.total_penalties += amount,
                }
                summary
            },
        );
        summary.total_amount =
            summary.total_payments + summary.total_refunds + summary.total_penalties;
        summary
    }
}

/// One page of ledger entries with pagination metadata and the summary block.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerPage {
    /// Rows of the requested page
    pub entries: Vec<ledger_entry::Model>,
    /// Rows matching the filter, across all pages
    pub total: u64,
    /// Number of pages at this limit
    pub total_pages: u64,
    /// Page returned
    pub page: u64,
    /// Rows per page
    pub limit: u64,
    /// Totals over live matching rows
    pub summary: LedgerSummary,
}

/// Computes summary totals over the live entries matching `filter`.
///
/// Runs a single grouped sum per payment type and folds the groups in memory.
pub async fn summarize(db: &DatabaseConnection, filter: &LedgerFilter) -> Result<LedgerSummary> {
    let totals: Vec<(PaymentType, Option<f64>)> = LedgerEntry::find()
        .select_only()
        .column(ledger_entry::Column::PaymentType)
        .column_as(Expr::col(ledger_entry::Column::Amount).sum(), "total")
        .filter(filter.condition())
        .filter(ledger_entry::Column::IsDeleted.eq(false))
        .group_by(ledger_entry::Column::PaymentType)
        .into_tuple()
        .all(db)
        .await?;

    Ok(LedgerSummary::from_type_totals(
        totals
            .into_iter()
            .map(|(payment_type, total)| (payment_type, total.unwrap_or(0.0))),
    ))
}

/// Lists one page of a booking's entries, newest transaction first, with summary totals.
///
/// Rows are ordered by transaction date, then creation time, then id, all
/// descending, so identical requests return identical pages.
pub async fn list_payments(
    db: &DatabaseConnection,
    filter: &LedgerFilter,
    page: PageRequest,
) -> Result<LedgerPage> {
    let mut query = LedgerEntry::find().filter(filter.condition());
    if !filter.include_deleted {
        query = query.filter(ledger_entry::Column::IsDeleted.eq(false));
    }

    let paginator = query
        .order_by_desc(ledger_entry::Column::TransactionDate)
        .order_by_desc(ledger_entry::Column::CreatedAt)
        .order_by_desc(ledger_entry::Column::Id)
        .paginate(db, page.limit);

    let total = paginator.num_items().await?;
    let entries = paginator.fetch_page(page.page.saturating_sub(1)).await?;
    let summary = summarize(db, filter).await?;

    tracing::debug!(
        "Listed {} of {} ledger entries for booking {} (page {})",
        entries.len(),
        total,
        filter.booking_id,
        page.page
    );

    Ok(LedgerPage {
        entries,
        total,
        total_pages: total.div_ceil(page.limit),
        page: page.page,
        limit: page.limit,
        summary,
    })
}
