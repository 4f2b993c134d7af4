use std::sync::Arc;

use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set, TransactionTrait};
use tokio::sync::Mutex;
use tracing::warn;
use uuid::Uuid;
use taskboard_common::consts::{MAX_GROUP_COUNTER, MAX_GROUP_SCORE};
use taskboard_common::{Criticality, Identity, TaskPolicyConfig, TaskStatus, TaskboardError};
use taskboard_db_entities::{Group, Task};

use crate::authz;

/// Applies status changes to tasks and awards completion points to the
/// owning group. The status write is authoritative; the score update is
/// best effort and never rolls the status back.
pub struct TaskTransitionService {
    config: TaskPolicyConfig,
    db: Arc<Mutex<DatabaseConnection>>,
}

impl TaskTransitionService {
    pub fn new(config: TaskPolicyConfig, db: Arc<Mutex<DatabaseConnection>>) -> Self {
        Self { config, db }
    }

    pub async fn set_status(
        &self,
        task_id: Uuid,
        requested: TaskStatus,
        actor: &Identity,
    ) -> Result<Task::Model, TaskboardError> {
        let db = self.db.lock().await;

        let task = Task::Entity::find_by_id(task_id)
            .one(&*db)
            .await?
            .ok_or(TaskboardError::TaskNotFound(task_id))?;

        authz::ensure_can_set_status(actor, task.group_id)?;

        if self.config.enforce_terminal_states && task.status.is_terminal() && requested != task.status
        {
            return Err(TaskboardError::validation(
                "Task is already in a terminal status.",
            ));
        }

        let previous = task.status;
        let mut values: Task::ActiveModel = task.into();
        values.status = Set(requested);
        let updated = values.update(&*db).await?;

        // Award exactly once per task: only on the edge into "completed".
        if requested == TaskStatus::Completed && previous != TaskStatus::Completed {
            if let Err(error) =
                award_completion(&db, updated.group_id, updated.criticality).await
            {
                warn!(%task_id, group_id = %updated.group_id, ?error, "Failed to award completion points");
            }
        }

        Ok(updated)
    }
}

async fn award_completion(
    db: &DatabaseConnection,
    group_id: Uuid,
    criticality: Criticality,
) -> Result<(), TaskboardError> {
    let txn = db.begin().await?;

    let group = Group::Entity::find_by_id(group_id)
        .one(&txn)
        .await?
        .ok_or(TaskboardError::GroupNotFound(group_id))?;

    let score = (group.score + criticality.points()).min(MAX_GROUP_SCORE);
    let completed_count = (group.completed_count + 1).min(MAX_GROUP_COUNTER);

    let mut values: Group::ActiveModel = group.into();
    values.score = Set(score);
    values.completed_count = Set(completed_count);
    values.update(&txn).await?;

    txn.commit().await?;
    Ok(())
}
