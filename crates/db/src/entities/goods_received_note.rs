//! `SeaORM` Entity for goods_received_note table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "goods_received_note")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub purchase_order_id: Option<Uuid>,
    pub supplier_id: Uuid,
    pub warehouse_id: Uuid,
    pub discount_type: String,
    #[sea_orm(column_type = "Decimal(Some((18, 2)))")]
    pub discount_amount: Decimal,
    /// Sum of line totals; the base for landed cost shares.
    #[sea_orm(column_type = "Decimal(Some((18, 2)))")]
    pub price_before_discount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((18, 2)))")]
    pub total_price: Decimal,
    pub remarks: Option<String>,
    /// Set once, when landed costs are applied.
    pub landed_cost_id: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::goods_received_note_item::Entity")]
    GoodsReceivedNoteItem,
    #[sea_orm(has_many = "super::current_stock::Entity")]
    CurrentStock,
}

impl Related<super::goods_received_note_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GoodsReceivedNoteItem.def()
    }
}

impl Related<super::current_stock::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CurrentStock.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
