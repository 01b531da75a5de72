//! `SeaORM` Entity for inventory_transfer table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::TransferResolution;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "inventory_transfer")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub from_warehouse_id: Uuid,
    pub to_warehouse_id: Uuid,
    pub resolution: Option<TransferResolution>,
    /// Null while pending; the resolution guard.
    pub resolved_by: Option<Uuid>,
    pub resolved_on: Option<DateTimeWithTimeZone>,
    pub resolution_remarks: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::inventory_transfer_item::Entity")]
    InventoryTransferItem,
}

impl Related<super::inventory_transfer_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InventoryTransferItem.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
