use std::net::IpAddr;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;
use taskboard_common::{LoginOutcome, LoginThrottleConfig, TaskboardError};
use taskboard_db_entities::{LoginAttempt, ThrottleState};

/// An active block window on a source address.
#[derive(Clone, Debug)]
pub struct BlockInfo {
    pub blocked_until: DateTime<Utc>,
    pub minutes_left: i64,
}

/// What a recorded failure escalated to.
#[derive(Clone, Debug)]
pub struct FailureRecord {
    pub failure_count: i32,
    pub outcome: LoginOutcome,
    pub blocked_until: Option<DateTime<Utc>>,
}

/// Progressive per-address login throttle. Consecutive failures from one
/// address escalate into block windows that double on every further
/// failure; any successful login resets the chain.
pub struct LoginThrottleService {
    config: LoginThrottleConfig,
    db: Arc<Mutex<DatabaseConnection>>,
}

/// Block window earned by the Nth consecutive failure. Below the threshold
/// there is no window; at the threshold it is one minute, then it doubles
/// with each further failure. The exponent saturates at 20 to keep the
/// arithmetic in range, and an optional configured ceiling tightens it.
pub fn block_window(failure_count: u32, config: &LoginThrottleConfig) -> Option<Duration> {
    if failure_count < config.failure_threshold {
        return None;
    }
    let exponent = (failure_count - config.failure_threshold).min(20);
    let mut minutes = 1i64 << exponent;
    if let Some(cap) = config.max_block_minutes {
        minutes = minutes.min(cap.into());
    }
    Some(Duration::minutes(minutes))
}

/// Whole minutes remaining in a block, rounded up so a partially elapsed
/// minute still reads as one.
pub fn minutes_left(blocked_until: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let millis = (blocked_until - now).num_milliseconds();
    (millis + 59_999) / 60_000
}

impl LoginThrottleService {
    pub fn new(config: LoginThrottleConfig, db: Arc<Mutex<DatabaseConnection>>) -> Self {
        Self { config, db }
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Check whether the address sits inside an unexpired block window.
    pub async fn check_blocked(
        &self,
        ip: &IpAddr,
        now: DateTime<Utc>,
    ) -> Result<Option<BlockInfo>, TaskboardError> {
        if !self.config.enabled {
            return Ok(None);
        }

        let db = self.db.lock().await;
        let state = ThrottleState::Entity::find()
            .filter(ThrottleState::Column::IpAddress.eq(ip.to_string()))
            .one(&*db)
            .await?;

        if let Some(state) = state {
            if let Some(blocked_until) = state.blocked_until {
                if blocked_until > now {
                    debug!(ip = %ip, %blocked_until, "Address is blocked");
                    return Ok(Some(BlockInfo {
                        blocked_until,
                        minutes_left: minutes_left(blocked_until, now),
                    }));
                }
            }
        }

        Ok(None)
    }

    /// Record a successful login. Resets the failure chain for the address
    /// and appends a `LOGIN` row to the attempt ledger.
    pub async fn record_success(&self, ip: &IpAddr, now: DateTime<Utc>) -> Result<(), TaskboardError> {
        if !self.config.enabled {
            return Ok(());
        }

        let db = self.db.lock().await;
        let txn = db.begin().await?;

        let existing_id = ThrottleState::Entity::find()
            .filter(ThrottleState::Column::IpAddress.eq(ip.to_string()))
            .one(&txn)
            .await?
            .map(|state| state.id);

        let state = ThrottleState::ActiveModel {
            id: Set(existing_id.unwrap_or_else(Uuid::new_v4)),
            ip_address: Set(ip.to_string()),
            failure_count: Set(0),
            last_outcome: Set(LoginOutcome::Login),
            blocked_until: Set(None),
            updated_at: Set(now),
        };
        if existing_id.is_some() {
            state.update(&txn).await?;
        } else {
            state.insert(&txn).await?;
        }

        let values = LoginAttempt::ActiveModel {
            id: Set(Uuid::new_v4()),
            ip_address: Set(ip.to_string()),
            mac_address: Set(None),
            attempt_count: Set(0),
            outcome: Set(LoginOutcome::Login),
            block_start: Set(None),
            block_end: Set(None),
            timestamp: Set(now),
        };
        values.insert(&txn).await?;

        txn.commit().await?;
        Ok(())
    }

    /// Record a failed login. Extends the failure chain for the address,
    /// opens a block window once the chain reaches the threshold and
    /// appends a `FAILED` or `BLOCKED` row to the attempt ledger.
    pub async fn record_failure(
        &self,
        ip: &IpAddr,
        now: DateTime<Utc>,
    ) -> Result<FailureRecord, TaskboardError> {
        if !self.config.enabled {
            return Ok(FailureRecord {
                failure_count: 0,
                outcome: LoginOutcome::Failed,
                blocked_until: None,
            });
        }

        let db = self.db.lock().await;
        let txn = db.begin().await?;

        let previous = ThrottleState::Entity::find()
            .filter(ThrottleState::Column::IpAddress.eq(ip.to_string()))
            .one(&txn)
            .await?;

        let failure_count = match &previous {
            Some(state) if state.last_outcome.is_failure() => state.failure_count + 1,
            _ => 1,
        };
        let existing_id = previous.map(|state| state.id);

        let window = block_window(failure_count as u32, &self.config);
        let (outcome, block_start, block_end) = match window {
            Some(window) => (LoginOutcome::Blocked, Some(now), Some(now + window)),
            None => (LoginOutcome::Failed, None, None),
        };

        let state = ThrottleState::ActiveModel {
            id: Set(existing_id.unwrap_or_else(Uuid::new_v4)),
            ip_address: Set(ip.to_string()),
            failure_count: Set(failure_count),
            last_outcome: Set(outcome),
            blocked_until: Set(block_end),
            updated_at: Set(now),
        };
        if existing_id.is_some() {
            state.update(&txn).await?;
        } else {
            state.insert(&txn).await?;
        }

        let values = LoginAttempt::ActiveModel {
            id: Set(Uuid::new_v4()),
            ip_address: Set(ip.to_string()),
            mac_address: Set(None),
            attempt_count: Set(failure_count),
            outcome: Set(outcome),
            block_start: Set(block_start),
            block_end: Set(block_end),
            timestamp: Set(now),
        };
        values.insert(&txn).await?;

        txn.commit().await?;

        if outcome == LoginOutcome::Blocked {
            info!(ip = %ip, failure_count, until = ?block_end, "Blocked source address after repeated login failures");
        }

        Ok(FailureRecord {
            failure_count,
            outcome,
            blocked_until: block_end,
        })
    }
}
