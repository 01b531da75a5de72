//! `SeaORM` Entity for invoice table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "invoice")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub warehouse_id: Uuid,
    pub transaction_id: Option<Uuid>,
    /// Cost of the drawn units without landed costs.
    #[sea_orm(column_type = "Decimal(Some((18, 2)))")]
    pub cost_price: Decimal,
    #[sea_orm(column_type = "Decimal(Some((18, 2)))")]
    pub price_before_discount: Decimal,
    /// Discount percentage.
    #[sea_orm(column_type = "Decimal(Some((5, 2)))")]
    pub discount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((18, 2)))")]
    pub price_after_discount: Decimal,
    pub customer_name: Option<String>,
    pub customer_contact: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::invoice_item::Entity")]
    InvoiceItem,
}

impl Related<super::invoice_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InvoiceItem.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
