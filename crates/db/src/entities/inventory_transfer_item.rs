//! `SeaORM` Entity for inventory_transfer_item table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "inventory_transfer_item")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub inventory_transfer_id: Uuid,
    /// Source lot drawn from.
    pub entry_specifier: Uuid,
    /// Transfer that created the source lot, if any.
    pub prev_inventory_transfer_id: Option<Uuid>,
    pub goods_received_note_id: Uuid,
    pub item_id: Uuid,
    pub qty: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::inventory_transfer::Entity",
        from = "Column::InventoryTransferId",
        to = "super::inventory_transfer::Column::Id"
    )]
    InventoryTransfer,
}

impl Related<super::inventory_transfer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InventoryTransfer.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
