use chrono::{DateTime, Utc};
use poem::session::Session;
use poem::web::Data;
use poem_openapi::param::{Path, Query};
use poem_openapi::payload::Json;
use poem_openapi::{ApiResponse, Object, OpenApi};
use sea_orm::{ColumnTrait, EntityTrait, ModelTrait, QueryFilter, QueryOrder};
use uuid::Uuid;
use taskboard_common::{Criticality, TaskStatus, TaskboardError};
use taskboard_core::{authz, Services, TaskDraft};
use taskboard_db_entities::Task;

use crate::common::require_identity;

pub struct Api;

#[derive(Object)]
struct TaskDataRequest {
    title: String,
    description: String,
    criticality: Criticality,
    status: Option<TaskStatus>,
    start_time: Option<DateTime<Utc>>,
    deadline: DateTime<Utc>,
    group_ids: Vec<Uuid>,
}

#[derive(Object)]
struct SetStatusRequest {
    status: TaskStatus,
}

#[derive(Object)]
struct TaskFanoutResult {
    task_ids: Vec<Uuid>,
    errors: Vec<String>,
}

#[derive(ApiResponse)]
enum GetTasksResponse {
    #[oai(status = 200)]
    Ok(Json<Vec<Task::Model>>),
}

#[derive(ApiResponse)]
enum GetTaskResponse {
    #[oai(status = 200)]
    Ok(Json<Task::Model>),

    #[oai(status = 404)]
    NotFound,
}

#[derive(ApiResponse)]
enum CreateTasksResponse {
    #[oai(status = 201)]
    Created(Json<TaskFanoutResult>),
}

#[derive(ApiResponse)]
enum UpdateTasksResponse {
    #[oai(status = 200)]
    Ok(Json<TaskFanoutResult>),
}

#[derive(ApiResponse)]
enum DeleteTaskResponse {
    #[oai(status = 204)]
    Deleted,

    #[oai(status = 404)]
    NotFound,
}

#[derive(ApiResponse)]
enum SetStatusResponse {
    #[oai(status = 200)]
    Ok(Json<Task::Model>),
}

fn draft_from(body: &TaskDataRequest) -> TaskDraft {
    TaskDraft {
        title: body.title.clone(),
        description: body.description.clone(),
        criticality: body.criticality,
        status: body.status,
        start_time: body.start_time,
        deadline: body.deadline,
    }
}

#[OpenApi]
impl Api {
    /// Task listings back the public status board and take no session.
    #[oai(path = "/tasks", method = "get", operation_id = "get_tasks")]
    async fn api_get_tasks(
        &self,
        services: Data<&Services>,
        group_id: Query<Option<Uuid>>,
    ) -> Result<GetTasksResponse, TaskboardError> {
        let db = services.db.lock().await;

        let mut tasks = Task::Entity::find().order_by_asc(Task::Column::EndTime);
        if let Some(group_id) = group_id.0 {
            tasks = tasks.filter(Task::Column::GroupId.eq(group_id));
        }

        Ok(GetTasksResponse::Ok(Json(tasks.all(&*db).await?)))
    }

    #[oai(path = "/tasks/:id", method = "get", operation_id = "get_task")]
    async fn api_get_task(
        &self,
        services: Data<&Services>,
        id: Path<Uuid>,
    ) -> Result<GetTaskResponse, TaskboardError> {
        let db = services.db.lock().await;

        let Some(task) = Task::Entity::find_by_id(id.0).one(&*db).await? else {
            return Ok(GetTaskResponse::NotFound);
        };

        Ok(GetTaskResponse::Ok(Json(task)))
    }

    #[oai(path = "/tasks", method = "post", operation_id = "create_tasks")]
    async fn api_create_tasks(
        &self,
        session: &Session,
        services: Data<&Services>,
        body: Json<TaskDataRequest>,
    ) -> Result<CreateTasksResponse, TaskboardError> {
        let identity = require_identity(session)?;
        authz::ensure_teacher(&identity)?;

        let report = services
            .task_fanout
            .create(&draft_from(&body), &body.group_ids, identity.id, Utc::now())
            .await?;

        Ok(CreateTasksResponse::Created(Json(TaskFanoutResult {
            task_ids: report.task_ids,
            errors: report.errors,
        })))
    }

    #[oai(path = "/tasks/:id", method = "put", operation_id = "update_tasks")]
    async fn api_update_tasks(
        &self,
        session: &Session,
        services: Data<&Services>,
        id: Path<Uuid>,
        body: Json<TaskDataRequest>,
    ) -> Result<UpdateTasksResponse, TaskboardError> {
        let identity = require_identity(session)?;
        authz::ensure_teacher(&identity)?;

        let report = services
            .task_fanout
            .edit(
                id.0,
                &draft_from(&body),
                &body.group_ids,
                identity.id,
                Utc::now(),
            )
            .await?;

        Ok(UpdateTasksResponse::Ok(Json(TaskFanoutResult {
            task_ids: report.task_ids,
            errors: report.errors,
        })))
    }

    #[oai(path = "/tasks/:id", method = "delete", operation_id = "delete_task")]
    async fn api_delete_task(
        &self,
        session: &Session,
        services: Data<&Services>,
        id: Path<Uuid>,
    ) -> Result<DeleteTaskResponse, TaskboardError> {
        let identity = require_identity(session)?;
        authz::ensure_teacher(&identity)?;

        let db = services.db.lock().await;
        let Some(task) = Task::Entity::find_by_id(id.0).one(&*db).await? else {
            return Ok(DeleteTaskResponse::NotFound);
        };

        task.delete(&*db).await?;
        Ok(DeleteTaskResponse::Deleted)
    }

    #[oai(
        path = "/tasks/:id/status",
        method = "put",
        operation_id = "set_task_status"
    )]
    async fn api_set_task_status(
        &self,
        session: &Session,
        services: Data<&Services>,
        id: Path<Uuid>,
        body: Json<SetStatusRequest>,
    ) -> Result<SetStatusResponse, TaskboardError> {
        let identity = require_identity(session)?;

        let task = services
            .task_transitions
            .set_status(id.0, body.status, &identity)
            .await?;

        Ok(SetStatusResponse::Ok(Json(task)))
    }
}
