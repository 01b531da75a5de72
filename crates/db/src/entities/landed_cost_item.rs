//! `SeaORM` Entity for landed_cost_item table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "landed_cost_item")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub landed_cost_id: Uuid,
    pub landed_cost_type_id: Uuid,
    #[sea_orm(column_type = "Decimal(Some((18, 2)))")]
    pub amount: Decimal,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::landed_cost::Entity",
        from = "Column::LandedCostId",
        to = "super::landed_cost::Column::Id"
    )]
    LandedCost,
    #[sea_orm(
        belongs_to = "super::landed_cost_type::Entity",
        from = "Column::LandedCostTypeId",
        to = "super::landed_cost_type::Column::Id"
    )]
    LandedCostType,
}

impl Related<super::landed_cost::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LandedCost.def()
    }
}

impl Related<super::landed_cost_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LandedCostType.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
