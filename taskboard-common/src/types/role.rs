use poem_openapi::Enum;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Closed role enumeration; stored as the upper-case strings the schema
/// check constraint allows.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Enum, EnumIter, DeriveActiveEnum,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum Role {
    #[sea_orm(string_value = "TEACHER")]
    #[serde(rename = "TEACHER")]
    #[oai(rename = "TEACHER")]
    Teacher,
    #[sea_orm(string_value = "LEADER")]
    #[serde(rename = "LEADER")]
    #[oai(rename = "LEADER")]
    Leader,
    #[sea_orm(string_value = "NORMAL")]
    #[serde(rename = "NORMAL")]
    #[oai(rename = "NORMAL")]
    Normal,
}

impl Role {
    /// Teachers administer users, groups and tasks; nobody else does.
    pub const fn is_teacher(&self) -> bool {
        matches!(self, Self::Teacher)
    }
}
