//! Sale pricing and posting rules.

pub mod error;
pub mod pricing;

pub use error::SaleError;
pub use pricing::{ExecutionType, SaleAccounts, SaleQuote, SaleTotals, price_after_discount, sale_journal};
