use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Outcome recorded for every login attempt in the audit ledger.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(8))")]
pub enum LoginOutcome {
    #[sea_orm(string_value = "LOGIN")]
    Login,
    #[sea_orm(string_value = "FAILED")]
    Failed,
    #[sea_orm(string_value = "BLOCKED")]
    Blocked,
}

impl LoginOutcome {
    /// Whether this outcome continues a failure chain for the throttle.
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failed | Self::Blocked)
    }
}
