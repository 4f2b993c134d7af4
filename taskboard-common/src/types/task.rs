use poem_openapi::Enum;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Task lifecycle status. The string values mirror the legacy schema
/// verbatim, mixed case included.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Enum, EnumIter, DeriveActiveEnum,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum TaskStatus {
    #[sea_orm(string_value = "NOT_STARTED")]
    #[serde(rename = "NOT_STARTED")]
    #[oai(rename = "NOT_STARTED")]
    NotStarted,
    #[sea_orm(string_value = "in-progress")]
    #[serde(rename = "in-progress")]
    #[oai(rename = "in-progress")]
    InProgress,
    #[sea_orm(string_value = "completed")]
    #[serde(rename = "completed")]
    #[oai(rename = "completed")]
    Completed,
    #[sea_orm(string_value = "failed")]
    #[serde(rename = "failed")]
    #[oai(rename = "failed")]
    Failed,
}

impl TaskStatus {
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// Three-level priority classification driving the scoring weight.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Enum, EnumIter, DeriveActiveEnum,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(8))")]
pub enum Criticality {
    #[sea_orm(string_value = "high")]
    #[serde(rename = "high")]
    #[oai(rename = "high")]
    High,
    #[sea_orm(string_value = "med")]
    #[serde(rename = "med")]
    #[oai(rename = "med")]
    Med,
    #[sea_orm(string_value = "low")]
    #[serde(rename = "low")]
    #[oai(rename = "low")]
    Low,
}

impl Criticality {
    /// Points awarded to the owning group when a task of this criticality
    /// is completed.
    pub const fn points(&self) -> i32 {
        match self {
            Self::High => 10,
            Self::Med => 5,
            Self::Low => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_points_table() {
        assert_eq!(Criticality::High.points(), 10);
        assert_eq!(Criticality::Med.points(), 5);
        assert_eq!(Criticality::Low.points(), 1);
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(TaskStatus::Completed.is_terminal());
        assert!(TaskStatus::Failed.is_terminal());
        assert!(!TaskStatus::NotStarted.is_terminal());
        assert!(!TaskStatus::InProgress.is_terminal());
    }
}
