use std::collections::HashMap;

use poem::session::Session;
use poem::web::Data;
use poem_openapi::payload::Json;
use poem_openapi::{ApiResponse, Object, OpenApi};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set, TransactionTrait};
use tracing::info;
use uuid::Uuid;
use taskboard_common::validation::validate_group_name;
use taskboard_common::{TaskStatus, TaskboardError};
use taskboard_core::{authz, Services};
use taskboard_db_entities::{Group, Task, User};

use crate::common::require_identity;

pub struct Api;

#[derive(Object)]
struct GroupSummary {
    id: Uuid,
    name: String,
    score: i32,
    member_count: u64,
    not_started: u64,
    in_progress: u64,
    completed: u64,
    failed: u64,
}

#[derive(Object)]
struct CreateGroupsRequest {
    names: Vec<String>,
}

#[derive(Object)]
struct CreateGroupsReport {
    created: Vec<Group::Model>,
    errors: Vec<String>,
}

#[derive(Object)]
struct DeleteGroupsRequest {
    group_ids: Vec<Uuid>,
}

#[derive(ApiResponse)]
enum GetGroupsResponse {
    #[oai(status = 200)]
    Ok(Json<Vec<GroupSummary>>),
}

#[derive(ApiResponse)]
enum CreateGroupsResponse {
    #[oai(status = 201)]
    Created(Json<CreateGroupsReport>),
}

#[derive(ApiResponse)]
enum DeleteGroupsResponse {
    #[oai(status = 204)]
    Deleted,
}

#[OpenApi]
impl Api {
    #[oai(path = "/groups", method = "get", operation_id = "get_groups")]
    async fn api_get_groups(
        &self,
        session: &Session,
        services: Data<&Services>,
    ) -> Result<GetGroupsResponse, TaskboardError> {
        require_identity(session)?;

        let db = services.db.lock().await;
        let groups = Group::Entity::find().all(&*db).await?;
        let users = User::Entity::find().all(&*db).await?;
        let tasks = Task::Entity::find().all(&*db).await?;

        // The stored score is authoritative; status tallies are computed
        // live so they survive task edits and deletions.
        let mut members: HashMap<Uuid, u64> = HashMap::new();
        for user in users {
            if let Some(group_id) = user.group_id {
                *members.entry(group_id).or_default() += 1;
            }
        }
        let mut statuses: HashMap<(Uuid, TaskStatus), u64> = HashMap::new();
        for task in tasks {
            *statuses.entry((task.group_id, task.status)).or_default() += 1;
        }

        let summaries = groups
            .into_iter()
            .map(|group| GroupSummary {
                member_count: members.get(&group.id).copied().unwrap_or(0),
                not_started: statuses
                    .get(&(group.id, TaskStatus::NotStarted))
                    .copied()
                    .unwrap_or(0),
                in_progress: statuses
                    .get(&(group.id, TaskStatus::InProgress))
                    .copied()
                    .unwrap_or(0),
                completed: statuses
                    .get(&(group.id, TaskStatus::Completed))
                    .copied()
                    .unwrap_or(0),
                failed: statuses
                    .get(&(group.id, TaskStatus::Failed))
                    .copied()
                    .unwrap_or(0),
                id: group.id,
                name: group.name,
                score: group.score,
            })
            .collect();

        Ok(GetGroupsResponse::Ok(Json(summaries)))
    }

    #[oai(path = "/groups", method = "post", operation_id = "create_groups")]
    async fn api_create_groups(
        &self,
        session: &Session,
        services: Data<&Services>,
        body: Json<CreateGroupsRequest>,
    ) -> Result<CreateGroupsResponse, TaskboardError> {
        let identity = require_identity(session)?;
        authz::ensure_teacher(&identity)?;

        if body.names.is_empty() {
            return Err(TaskboardError::validation(
                "At least one group name is required.",
            ));
        }

        let db = services.db.lock().await;
        let mut report = CreateGroupsReport {
            created: vec![],
            errors: vec![],
        };

        for name in &body.names {
            if let Err(error) = validate_group_name(name) {
                report.errors.push(error.to_string());
                continue;
            }
            let values = Group::ActiveModel {
                id: Set(Uuid::new_v4()),
                name: Set(name.clone()),
                score: Set(0),
                failed_count: Set(0),
                completed_count: Set(0),
                in_progress_count: Set(0),
            };
            match values
                .insert(&*db)
                .await
                .map_err(|e| TaskboardError::unique(e, "Group name already exists."))
            {
                Ok(group) => report.created.push(group),
                Err(error) => report.errors.push(format!("{name}: {error}")),
            }
        }

        Ok(CreateGroupsResponse::Created(Json(report)))
    }

    #[oai(
        path = "/groups/delete",
        method = "post",
        operation_id = "delete_groups"
    )]
    async fn api_delete_groups(
        &self,
        session: &Session,
        services: Data<&Services>,
        body: Json<DeleteGroupsRequest>,
    ) -> Result<DeleteGroupsResponse, TaskboardError> {
        let identity = require_identity(session)?;
        authz::ensure_teacher(&identity)?;

        let db = services.db.lock().await;
        let txn = db.begin().await?;

        // Members and tasks go with their group.
        User::Entity::delete_many()
            .filter(User::Column::GroupId.is_in(body.group_ids.clone()))
            .exec(&txn)
            .await?;
        Task::Entity::delete_many()
            .filter(Task::Column::GroupId.is_in(body.group_ids.clone()))
            .exec(&txn)
            .await?;
        Group::Entity::delete_many()
            .filter(Group::Column::Id.is_in(body.group_ids.clone()))
            .exec(&txn)
            .await?;

        txn.commit().await?;
        info!(count = body.group_ids.len(), "Deleted groups");
        Ok(DeleteGroupsResponse::Deleted)
    }
}
