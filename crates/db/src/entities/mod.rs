//! `SeaORM` entity definitions.
//!
//! Fields mirror the table columns one to one and are not documented
//! individually.

#![allow(missing_docs)]

pub mod account;
pub mod account_transaction;
pub mod business_partner;
pub mod business_partner_financial;
pub mod current_stock;
pub mod goods_received_note;
pub mod goods_received_note_item;
pub mod inventory_transfer;
pub mod inventory_transfer_item;
pub mod invoice;
pub mod invoice_item;
pub mod item;
pub mod landed_cost;
pub mod landed_cost_item;
pub mod landed_cost_type;
pub mod payment_voucher;
pub mod purchase_order;
pub mod purchase_order_item;
pub mod purchase_order_item_reconciliation;
pub mod sea_orm_active_enums;
pub mod transaction;
pub mod unique_requests;
pub mod users;
pub mod warehouse;
