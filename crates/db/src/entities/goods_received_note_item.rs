//! `SeaORM` Entity for goods_received_note_item table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "goods_received_note_item")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub goods_received_note_id: Uuid,
    pub item_id: Uuid,
    #[sea_orm(column_type = "Decimal(Some((18, 6)))")]
    pub unit_price: Decimal,
    pub qty: i32,
    /// `unit_price * qty`.
    #[sea_orm(column_type = "Decimal(Some((18, 2)))")]
    pub total_price: Decimal,
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
