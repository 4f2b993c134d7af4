use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use taskboard_common::LoginOutcome;
use uuid::Uuid;

/// Derived lockout state, one row per source address, upserted in the same
/// transaction as the ledger append. Block checks read this table only.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "throttle_state")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    #[sea_orm(unique)]
    pub ip_address: String,

    /// Consecutive failures since the last successful login.
    pub failure_count: i32,

    pub last_outcome: LoginOutcome,

    /// End of the active block window, if any.
    pub blocked_until: Option<DateTime<Utc>>,

    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
