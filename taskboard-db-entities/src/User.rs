use poem_openapi::Object;
use sea_orm::entity::prelude::*;
use serde::Serialize;
use taskboard_common::Role;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Object)]
#[sea_orm(table_name = "users")]
#[oai(rename = "User")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Display name, letters and spaces only.
    pub full_name: String,

    #[sea_orm(unique)]
    pub email: String,

    pub role: Role,

    /// Group membership; teachers have none.
    pub group_id: Option<Uuid>,

    /// Normalized job title (A-Z, underscore, hyphen).
    pub job: Option<String>,

    pub phone: Option<String>,

    #[serde(skip)]
    #[oai(skip)]
    pub password_hash: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::Group::Entity",
        from = "Column::GroupId",
        to = "super::Group::Column::Id"
    )]
    Group,
}

impl Related<super::Group::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Group.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
