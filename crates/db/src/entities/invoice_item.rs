//! `SeaORM` Entity for invoice_item table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "invoice_item")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub invoice_id: Uuid,
    /// Lot drawn from.
    pub entry_specifier: Uuid,
    pub goods_received_note_id: Uuid,
    pub inventory_transfer_id: Option<Uuid>,
    pub item_id: Uuid,
    pub qty: i32,
    #[sea_orm(column_type = "Decimal(Some((18, 6)))")]
    pub cost_price: Decimal,
    #[sea_orm(column_type = "Decimal(Some((18, 6)))")]
    pub price: Decimal,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::invoice::Entity",
        from = "Column::InvoiceId",
        to = "super::invoice::Column::Id"
    )]
    Invoice,
}

impl Related<super::invoice::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Invoice.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
