//! `SeaORM` Entity for business_partner_financial table (supplier sub-ledger).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::EntryType;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "business_partner_financial")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub business_partner_id: Uuid,
    pub transaction_id: Uuid,
    #[sea_orm(column_name = "type")]
    pub entry_type: EntryType,
    #[sea_orm(column_type = "Decimal(Some((18, 2)))")]
    pub amount: Decimal,
    pub effective_date: Option<Date>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::business_partner::Entity",
        from = "Column::BusinessPartnerId",
        to = "super::business_partner::Column::Id"
    )]
    BusinessPartner,
}

impl Related<super::business_partner::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BusinessPartner.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
