use chrono::{DateTime, Utc};
use poem_openapi::Object;
use sea_orm::entity::prelude::*;
use serde::Serialize;
use taskboard_common::{Criticality, TaskStatus};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Object)]
#[sea_orm(table_name = "tasks")]
#[oai(rename = "Task")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub title: String,

    #[sea_orm(column_type = "Text")]
    pub description: String,

    /// Originating user; kept even if that user is later deleted.
    pub maker: Option<Uuid>,

    pub criticality: Criticality,

    pub group_id: Uuid,

    pub status: TaskStatus,

    pub start_time: DateTime<Utc>,

    pub end_time: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::Group::Entity",
        from = "Column::GroupId",
        to = "super::Group::Column::Id"
    )]
    Group,
    #[sea_orm(
        belongs_to = "super::User::Entity",
        from = "Column::Maker",
        to = "super::User::Column::Id"
    )]
    Maker,
}

impl Related<super::Group::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Group.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
