//! Supplier payment vouchers.

pub mod error;
pub mod voucher;

pub use error::PaymentError;
pub use voucher::{PaymentAllocation, financial_year_start, payment_journal, validate_allocations, validate_posting_date};
