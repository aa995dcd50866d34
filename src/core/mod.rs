//! Core business logic - framework-agnostic ledger operations.
//!
//! The HTTP layer in [`crate::api`] is a thin shell over these modules.

/// Booking lookups and the booking payment list
pub mod booking;
/// Recording, soft-deleting, and restoring payments
pub mod ledger;
/// Payment methods, types, and the method-specific detail bag
pub mod payment;
/// Listing with pagination and summary totals
pub mod summary;
/// Pure validation of creation requests
pub mod validation;
