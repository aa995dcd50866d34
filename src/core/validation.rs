//! Payment creation validation.
//!
//! [`validate_new_payment`] is a pure function from the raw request body to a
//! [`ValidatedPayment`]. It runs every check and reports all violated fields at
//! once, so nothing reaches storage unless the whole payment is valid. Whether the
//! booking exists is checked later, against the database, by the ledger.

use crate::{
    config::LedgerConfig,
    core::payment::{
        ChequeDetails, ChequeStatus, DigitalChannel, Instrument, PaymentMethod, PaymentType,
        TransferRail,
    },
    errors::{Error, FieldError, Result},
};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Deserialize;

/// Raw creation request, as posted by the client.
///
/// Everything is optional here so that a missing field becomes a validation error
/// naming that field instead of a deserialization failure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPaymentRequest {
    /// Booking reference; clients send it as `clientId`
    #[serde(alias = "clientId")]
    pub booking_id: Option<i64>,
    /// Amount paid; must be positive
    pub amount: Option<f64>,
    /// Amount demanded for this stage
    pub demand: Option<f64>,
    /// Construction stage, 0 to 100
    pub stage_percentage: Option<f64>,
    /// What the payment is for
    pub description: Option<String>,
    /// Payment type name
    #[serde(rename = "type")]
    pub payment_type: Option<String>,
    /// Payment method name
    pub method: Option<String>,
    /// Method-specific details
    #[serde(default)]
    pub payment_details: PaymentDetailsInput,
    /// Receiving account
    pub to_account: Option<String>,
    /// Paying account, if known
    pub from_account: Option<String>,
    /// When the money moved; `YYYY-MM-DD` or RFC 3339. Defaults to now.
    pub date: Option<String>,
}

/// Raw detail bag. Which fields matter depends on the method.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDetailsInput {
    /// Draft or transfer reference
    pub reference_number: Option<String>,
    /// Bank name
    pub bank_name: Option<String>,
    /// Cheque leaf number
    pub cheque_number: Option<String>,
    /// Cheque date
    pub cheque_date: Option<String>,
    /// Cheque presentation date
    pub due_date: Option<String>,
    /// `pending`, `cleared`, `bounced` or `cancelled`
    pub cheque_status: Option<String>,
    /// Digital transaction id
    pub transaction_id: Option<String>,
    /// Digital or transfer date
    pub transaction_date: Option<String>,
    /// Free-form remarks
    pub notes: Option<String>,
}

/// A payment that passed every structural and method-specific check.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedPayment {
    /// Booking the payment belongs to (not yet resolved)
    pub booking_id: i64,
    /// Positive amount
    pub amount: f64,
    /// Non-negative demand
    pub demand: f64,
    /// Within `0..=100` when present
    pub stage_percentage: Option<f64>,
    /// Trimmed description
    pub description: String,
    /// Payment type
    pub payment_type: PaymentType,
    /// Method and its details
    pub instrument: Instrument,
    /// Remarks from the detail bag
    pub notes: Option<String>,
    /// Receiving account
    pub to_account: String,
    /// Paying account
    pub from_account: Option<String>,
    /// `None` means "use the creation instant"
    pub transaction_date: Option<DateTime<Utc>>,
}

/// Parses a calendar date given as `YYYY-MM-DD` or as an RFC 3339 timestamp.
#[must_use]
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|dt| dt.with_timezone(&Utc).date_naive())
        })
}

/// Parses an instant given as RFC 3339, or a bare date taken as midnight UTC.
#[must_use]
pub fn parse_instant(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .map(|date| date.and_time(NaiveTime::MIN).and_utc())
        })
}

fn trimmed(value: Option<&String>) -> Option<String> {
    value
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// Accumulates field errors so every problem is reported in one response.
#[derive(Debug, Default)]
struct Checks {
    errors: Vec<FieldError>,
}

impl Checks {
    fn fail(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(FieldError::new(field, message));
    }

    fn required_text(
        &mut self,
        field: &str,
        label: &str,
        value: Option<&String>,
    ) -> Option<String> {
        let text = trimmed(value);
        if text.is_none() {
            self.fail(field, format!("{label} is required"));
        }
        text
    }

    fn required_date(
        &mut self,
        field: &str,
        label: &str,
        value: Option<&String>,
    ) -> Option<NaiveDate> {
        let raw = self.required_text(field, label, value)?;
        let date = parse_date(&raw);
        if date.is_none() {
            self.fail(field, format!("{label} '{raw}' is not a valid date"));
        }
        date
    }

    fn amount(
        &mut self,
        field: &str,
        label: &str,
        value: Option<f64>,
        positive: bool,
        max: f64,
    ) -> Option<f64> {
        let Some(value) = value else {
            self.fail(field, format!("{label} is required"));
            return None;
        };
        if !value.is_finite() {
            self.fail(field, format!("{label} must be a valid number"));
            return None;
        }
        if positive && value <= 0.0 {
            self.fail(field, format!("{label} must be greater than zero"));
            return None;
        }
        if value < 0.0 {
            self.fail(field, format!("{label} cannot be negative"));
            return None;
        }
        if value > max {
            self.fail(field, format!("{label} must not exceed {max}"));
            return None;
        }
        Some(value)
    }

    fn instrument(
        &mut self,
        method: PaymentMethod,
        details: &PaymentDetailsInput,
    ) -> Option<Instrument> {
        match method {
            PaymentMethod::Cash => Some(Instrument::Cash),
            PaymentMethod::DemandDraft => Some(Instrument::DemandDraft {
                reference_number: trimmed(details.reference_number.as_ref()),
                bank_name: trimmed(details.bank_name.as_ref()),
            }),
            PaymentMethod::Cheque => self.cheque(details).map(Instrument::Cheque),
            PaymentMethod::Upi | PaymentMethod::OnlinePayment => {
                let channel = if method == PaymentMethod::Upi {
                    DigitalChannel::Upi
                } else {
                    DigitalChannel::OnlinePayment
                };
                let transaction_id = self.required_text(
                    "paymentDetails.transactionId",
                    "Transaction ID",
                    details.transaction_id.as_ref(),
                );
                let transaction_date = self.required_date(
                    "paymentDetails.transactionDate",
                    "Transaction date",
                    details.transaction_date.as_ref(),
                );
                Some(Instrument::Digital {
                    channel,
                    transaction_id: transaction_id?,
                    transaction_date: transaction_date?,
                })
            }
            PaymentMethod::BankTransfer
            | PaymentMethod::Neft
            | PaymentMethod::Rtgs
            | PaymentMethod::Imps => {
                let rail = match method {
                    PaymentMethod::Neft => TransferRail::Neft,
                    PaymentMethod::Rtgs => TransferRail::Rtgs,
                    PaymentMethod::Imps => TransferRail::Imps,
                    _ => TransferRail::BankTransfer,
                };
                let reference_number = self.required_text(
                    "paymentDetails.referenceNumber",
                    "Reference number",
                    details.reference_number.as_ref(),
                );
                let bank_name = self.required_text(
                    "paymentDetails.bankName",
                    "Bank name",
                    details.bank_name.as_ref(),
                );
                let transaction_date = self.required_date(
                    "paymentDetails.transactionDate",
                    "Transaction date",
                    details.transaction_date.as_ref(),
                );
                Some(Instrument::Transfer {
                    rail,
                    reference_number: reference_number?,
                    bank_name: bank_name?,
                    transaction_date: transaction_date?,
                })
            }
        }
    }

    fn cheque(&mut self, details: &PaymentDetailsInput) -> Option<ChequeDetails> {
        let cheque_number = self.required_text(
            "paymentDetails.chequeNumber",
            "Cheque number",
            details.cheque_number.as_ref(),
        );
        let bank_name = self.required_text(
            "paymentDetails.bankName",
            "Bank name",
            details.bank_name.as_ref(),
        );
        let cheque_date = self.required_date(
            "paymentDetails.chequeDate",
            "Cheque date",
            details.cheque_date.as_ref(),
        );
        let due_date = self.required_date(
            "paymentDetails.dueDate",
            "Due date",
            details.due_date.as_ref(),
        );
        if let (Some(cheque_date), Some(due_date)) = (cheque_date, due_date) {
            if due_date < cheque_date {
                self.fail(
                    "paymentDetails.dueDate",
                    "Due date cannot be before cheque date",
                );
                return None;
            }
        }

        let status = match trimmed(details.cheque_status.as_ref()) {
            None => None,
            Some(raw) => match raw.parse::<ChequeStatus>() {
                Ok(status) => Some(status),
                Err(message) => {
                    self.fail("paymentDetails.chequeStatus", message);
                    return None;
                }
            },
        };

        Some(ChequeDetails {
            cheque_number: cheque_number?,
            bank_name: bank_name?,
            cheque_date: cheque_date?,
            due_date: due_date?,
            status,
        })
    }
}

/// Validates a creation request against the configured limits.
///
/// # Errors
/// Returns [`Error::Validation`] listing every violated field.
pub fn validate_new_payment(
    request: &NewPaymentRequest,
    limits: &LedgerConfig,
) -> Result<ValidatedPayment> {
    let mut checks = Checks::default();

    let booking_id = request.booking_id;
    if booking_id.is_none() {
        checks.fail("clientId", "Booking reference is required");
    }

    let amount = checks.amount("amount", "Amount", request.amount, true, limits.max_amount);
    let demand = checks.amount("demand", "Demand", request.demand, false, limits.max_amount);

    if let Some(stage) = request.stage_percentage {
        if !(0.0..=100.0).contains(&stage) {
            checks.fail("stagePercentage", "Stage percentage must be between 0 and 100");
        }
    }

    let description =
        checks.required_text("description", "Description", request.description.as_ref());
    if let Some(text) = &description {
        if text.chars().count() > limits.max_description_length {
            checks.fail(
                "description",
                format!(
                    "Description must be at most {} characters",
                    limits.max_description_length
                ),
            );
        }
    }

    let payment_type = match trimmed(request.payment_type.as_ref()) {
        None => {
            checks.fail("type", "Payment type is required");
            None
        }
        Some(raw) => raw
            .parse::<PaymentType>()
            .map_err(|message| checks.fail("type", message))
            .ok(),
    };

    let method = match trimmed(request.method.as_ref()) {
        None => {
            checks.fail("method", "Payment method is required");
            None
        }
        Some(raw) => raw
            .parse::<PaymentMethod>()
            .map_err(|message| checks.fail("method", message))
            .ok(),
    };

    let to_account = checks.required_text(
        "toAccount",
        "Destination account",
        request.to_account.as_ref(),
    );

    let instrument =
        method.and_then(|method| checks.instrument(method, &request.payment_details));

    let transaction_date = match trimmed(request.date.as_ref()) {
        None => None,
        Some(raw) => {
            let parsed = parse_instant(&raw);
            if parsed.is_none() {
                checks.fail("date", format!("Date '{raw}' is not a valid date"));
            }
            parsed
        }
    };

    if !checks.errors.is_empty() {
        return Err(Error::Validation {
            errors: checks.errors,
        });
    }

    let (
        Some(booking_id),
        Some(amount),
        Some(demand),
        Some(description),
        Some(payment_type),
        Some(instrument),
        Some(to_account),
    ) = (
        booking_id,
        amount,
        demand,
        description,
        payment_type,
        instrument,
        to_account,
    )
    else {
        return Err(Error::invalid_field("body", "Incomplete payment"));
    };

    Ok(ValidatedPayment {
        booking_id,
        amount,
        demand,
        stage_percentage: request.stage_percentage,
        description,
        payment_type,
        instrument,
        notes: trimmed(request.payment_details.notes.as_ref()),
        to_account,
        from_account: trimmed(request.from_account.as_ref()),
        transaction_date,
    })
}
