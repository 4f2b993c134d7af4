use std::sync::Arc;

use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set, TransactionTrait};
use tokio::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;
use taskboard_common::validation::{validate_task_description, validate_task_title};
use taskboard_common::{Criticality, TaskStatus, TaskboardError};
use taskboard_db_entities::Task;

/// Fields shared by every row a single submission fans out to.
#[derive(Clone, Debug)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub criticality: Criticality,
    pub status: Option<TaskStatus>,
    pub start_time: Option<DateTime<Utc>>,
    pub deadline: DateTime<Utc>,
}

/// Per-group result of a fan-out. Successful rows and per-group failures
/// are reported side by side; a partial failure is not an error.
#[derive(Debug, Default)]
pub struct FanoutReport {
    pub task_ids: Vec<Uuid>,
    pub errors: Vec<String>,
}

/// Creates one independent task row per target group from a single
/// submission. Rows share their field values at creation time and nothing
/// afterwards.
pub struct TaskFanoutService {
    db: Arc<Mutex<DatabaseConnection>>,
}

impl TaskFanoutService {
    pub fn new(db: Arc<Mutex<DatabaseConnection>>) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        draft: &TaskDraft,
        group_ids: &[Uuid],
        maker: Uuid,
        now: DateTime<Utc>,
    ) -> Result<FanoutReport, TaskboardError> {
        validate_task_title(&draft.title)?;
        validate_task_description(&draft.description)?;
        if group_ids.is_empty() {
            return Err(TaskboardError::validation(
                "At least one target group is required.",
            ));
        }

        let db = self.db.lock().await;
        let txn = db.begin().await?;

        let mut report = FanoutReport::default();
        let start_time = draft.start_time.unwrap_or(now);
        let status = draft.status.unwrap_or(TaskStatus::NotStarted);

        for group_id in group_ids {
            let id = Uuid::new_v4();
            let values = Task::ActiveModel {
                id: Set(id),
                title: Set(draft.title.clone()),
                description: Set(draft.description.clone()),
                maker: Set(Some(maker)),
                criticality: Set(draft.criticality),
                group_id: Set(*group_id),
                status: Set(status),
                start_time: Set(start_time),
                end_time: Set(draft.deadline),
            };
            match values.insert(&txn).await {
                Ok(_) => report.task_ids.push(id),
                Err(error) => {
                    warn!(%group_id, %error, "Task insert failed for group");
                    report.errors.push(format!("group {group_id}: {error}"));
                }
            }
        }

        // Nothing to keep; dropping the transaction rolls it back.
        if report.task_ids.is_empty() {
            return Err(TaskboardError::FanoutFailed);
        }

        txn.commit().await?;
        info!(created = report.task_ids.len(), failed = report.errors.len(), "Fanned task out to groups");
        Ok(report)
    }

    /// Rewrites the addressed row in place, reassigning it to the first
    /// target group, and forks an independent copy for every further group
    /// with its start time reset to now. Resubmitting the same group list
    /// on a later edit forks again; callers rely on that contract.
    pub async fn edit(
        &self,
        task_id: Uuid,
        draft: &TaskDraft,
        group_ids: &[Uuid],
        maker: Uuid,
        now: DateTime<Utc>,
    ) -> Result<FanoutReport, TaskboardError> {
        validate_task_title(&draft.title)?;
        validate_task_description(&draft.description)?;

        let db = self.db.lock().await;
        let txn = db.begin().await?;

        let task = Task::Entity::find_by_id(task_id)
            .one(&txn)
            .await?
            .ok_or(TaskboardError::TaskNotFound(task_id))?;

        let (primary_group, extra_groups) = match group_ids.split_first() {
            Some((first, rest)) => (Some(*first), rest),
            None => (None, &[][..]),
        };

        let mut report = FanoutReport::default();

        let mut values: Task::ActiveModel = task.into();
        values.title = Set(draft.title.clone());
        values.description = Set(draft.description.clone());
        values.criticality = Set(draft.criticality);
        // An edit without an explicit status resets the row to NOT_STARTED,
        // same as the forked copies.
        values.status = Set(draft.status.unwrap_or(TaskStatus::NotStarted));
        if let Some(start_time) = draft.start_time {
            values.start_time = Set(start_time);
        }
        values.end_time = Set(draft.deadline);
        if let Some(group_id) = primary_group {
            values.group_id = Set(group_id);
        }
        values.update(&txn).await?;
        report.task_ids.push(task_id);

        for group_id in extra_groups {
            let id = Uuid::new_v4();
            let values = Task::ActiveModel {
                id: Set(id),
                title: Set(draft.title.clone()),
                description: Set(draft.description.clone()),
                maker: Set(Some(maker)),
                criticality: Set(draft.criticality),
                group_id: Set(*group_id),
                status: Set(draft.status.unwrap_or(TaskStatus::NotStarted)),
                start_time: Set(now),
                end_time: Set(draft.deadline),
            };
            match values.insert(&txn).await {
                Ok(_) => report.task_ids.push(id),
                Err(error) => {
                    warn!(%group_id, %error, "Task fork failed for group");
                    report.errors.push(format!("group {group_id}: {error}"));
                }
            }
        }

        txn.commit().await?;
        Ok(report)
    }
}
