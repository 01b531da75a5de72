//! `SeaORM` Entity for landed_cost_type table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "landed_cost_type")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub expense_account_id: Option<Uuid>,
    pub payable_account_id: Option<Uuid>,
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
