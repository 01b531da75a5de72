//! `SeaORM` Entity for current_stock table (one row per lot).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "current_stock")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub entry_specifier: Uuid,
    pub warehouse_id: Uuid,
    pub item_id: Uuid,
    pub goods_received_note_id: Uuid,
    pub inventory_transfer_id: Option<Uuid>,
    #[sea_orm(column_type = "Decimal(Some((18, 6)))")]
    pub cost_price: Decimal,
    #[sea_orm(column_type = "Decimal(Some((18, 6)))")]
    pub landed_costs: Decimal,
    #[sea_orm(column_type = "Decimal(Some((18, 6)))")]
    pub price: Decimal,
    pub qty: i32,
    pub float_qty: i32,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::goods_received_note::Entity",
        from = "Column::GoodsReceivedNoteId",
        to = "super::goods_received_note::Column::Id"
    )]
    GoodsReceivedNote,
}

impl Related<super::goods_received_note::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GoodsReceivedNote.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
