use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use taskboard_common::LoginOutcome;
use uuid::Uuid;

/// Append-only audit ledger; one row per login attempt, never updated.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "login_attempts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Source address of the attempt.
    pub ip_address: String,

    /// Best-effort hardware address; absent for plain HTTP clients.
    pub mac_address: Option<String>,

    /// Snapshot of the consecutive-failure counter at append time.
    pub attempt_count: i32,

    pub outcome: LoginOutcome,

    pub block_start: Option<DateTime<Utc>>,
    pub block_end: Option<DateTime<Utc>>,

    pub timestamp: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
