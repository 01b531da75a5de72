//! Repository abstractions for data access.
//!
//! Each mutating operation runs inside one database transaction and either
//! commits every row it touched or none of them.

pub mod idempotency;
pub mod invoice;
pub mod journal;
pub mod landed_cost;
pub mod lot;
pub mod payment;
pub mod purchasing;
pub mod transfer;

pub use idempotency::{IdempotencyRepository, RecordOutcome};
pub use invoice::{CreateInvoiceInput, InvoiceOutcome, InvoiceRepository, InvoiceWithLines};
pub use journal::JournalRepository;
pub use landed_cost::{AppliedLandedCost, ApplyLandedCostInput, LandedCostRepository};
pub use lot::LotRepository;
pub use payment::{PaySuppliersInput, PaymentRepository, PaymentVoucherRecorded};
pub use purchasing::{
    CreateGoodsReceivedNoteInput, CreatePurchaseOrderInput, GoodsReceivedNoteWithLines,
    PurchaseOrderLineInput, PurchaseOrderWithLines, PurchasingRepository, ReceivedLineInput,
};
pub use transfer::{
    CreateTransferInput, TransferActionInput, TransferActionOutcome, TransferRepository,
    TransferWithLines,
};
