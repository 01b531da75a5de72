//! `SeaORM` Entity for business_partner table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "business_partner")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    /// Supplier's accounts payable ledger account.
    pub payable_account_id: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::account::Entity",
        from = "Column::PayableAccountId",
        to = "super::account::Column::Id"
    )]
    PayableAccount,
}

impl Related<super::account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PayableAccount.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
