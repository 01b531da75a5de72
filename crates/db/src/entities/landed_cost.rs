//! `SeaORM` Entity for landed_cost table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "landed_cost")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    #[sea_orm(unique)]
    pub goods_received_note_id: Uuid,
    pub transaction_id: Uuid,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::landed_cost_item::Entity")]
    LandedCostItem,
}

impl Related<super::landed_cost_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LandedCostItem.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
