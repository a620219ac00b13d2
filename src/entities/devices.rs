use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "devices")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub model_id: i32,
    pub location_id: Option<i32>,
    pub serial_number: Option<String>,
    pub inventory_number: Option<String>,
    pub status: String,
    /// Calendar date, `YYYY-MM-DD`
    pub installed_at: Option<String>,
    pub description: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::device_models::Entity",
        from = "Column::ModelId",
        to = "super::device_models::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    DeviceModels,
    #[sea_orm(
        belongs_to = "super::locations::Entity",
        from = "Column::LocationId",
        to = "super::locations::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Locations,
}

impl Related<super::device_models::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DeviceModels.def()
    }
}

impl Related<super::locations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Locations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
