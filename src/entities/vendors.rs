use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "vendors")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub country: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::device_models::Entity")]
    DeviceModels,
}

impl Related<super::device_models::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DeviceModels.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
