use poem::session::Session;
use poem::web::Data;
use poem_openapi::param::Path;
use poem_openapi::payload::Json;
use poem_openapi::{ApiResponse, Object, OpenApi};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;
use taskboard_common::helpers::hash::hash_password;
use taskboard_common::validation::{
    normalize_job, validate_email, validate_full_name, validate_job, validate_phone,
};
use taskboard_common::{Role, TaskboardError};
use taskboard_core::{authz, Services};
use taskboard_db_entities::{Group, User};

use crate::common::require_identity;

pub struct Api;

#[derive(Object)]
struct UserDataRequest {
    full_name: String,
    email: String,
    role: Role,
    group_id: Option<Uuid>,
    job: Option<String>,
    phone: Option<String>,
    /// Falls back to the configured default member password.
    password: Option<String>,
}

#[derive(Object)]
struct UserListEntry {
    id: Uuid,
    full_name: String,
    email: String,
    role: Role,
    group_id: Option<Uuid>,
    group_name: Option<String>,
    job: Option<String>,
    phone: Option<String>,
}

#[derive(ApiResponse)]
enum GetUsersResponse {
    #[oai(status = 200)]
    Ok(Json<Vec<UserListEntry>>),
}

#[derive(ApiResponse)]
enum CreateUserResponse {
    #[oai(status = 201)]
    Created(Json<User::Model>),
}

#[derive(ApiResponse)]
enum UpdateUserResponse {
    #[oai(status = 200)]
    Ok(Json<User::Model>),

    #[oai(status = 404)]
    NotFound,
}

#[derive(ApiResponse)]
enum DeleteUserResponse {
    #[oai(status = 204)]
    Deleted,

    #[oai(status = 404)]
    NotFound,
}

struct CheckedUserData {
    full_name: String,
    email: String,
    role: Role,
    group_id: Option<Uuid>,
    job: Option<String>,
    phone: Option<String>,
}

fn check_user_data(body: &UserDataRequest) -> Result<CheckedUserData, TaskboardError> {
    validate_full_name(&body.full_name)?;
    validate_email(&body.email)?;

    let job = match &body.job {
        Some(job) => {
            let job = normalize_job(job);
            validate_job(&job)?;
            Some(job)
        }
        None => None,
    };
    if let Some(phone) = &body.phone {
        validate_phone(phone)?;
    }

    // Teachers supervise every group and may not belong to one.
    if body.role == Role::Teacher && body.group_id.is_some() {
        return Err(TaskboardError::validation(
            "Teachers cannot belong to a group.",
        ));
    }

    Ok(CheckedUserData {
        full_name: body.full_name.clone(),
        email: body.email.clone(),
        role: body.role,
        group_id: body.group_id,
        job,
        phone: body.phone.clone(),
    })
}

#[OpenApi]
impl Api {
    #[oai(path = "/users", method = "get", operation_id = "get_users")]
    async fn api_get_all_users(
        &self,
        session: &Session,
        services: Data<&Services>,
    ) -> Result<GetUsersResponse, TaskboardError> {
        require_identity(session)?;

        let db = services.db.lock().await;

        // Teachers administer the roster and are not part of it.
        let users = User::Entity::find()
            .filter(User::Column::Role.ne(Role::Teacher))
            .order_by_asc(User::Column::FullName)
            .find_also_related(Group::Entity)
            .all(&*db)
            .await?;

        let users = users
            .into_iter()
            .map(|(user, group)| UserListEntry {
                id: user.id,
                full_name: user.full_name,
                email: user.email,
                role: user.role,
                group_id: user.group_id,
                group_name: group.map(|group| group.name),
                job: user.job,
                phone: user.phone,
            })
            .collect();

        Ok(GetUsersResponse::Ok(Json(users)))
    }

    #[oai(path = "/users", method = "post", operation_id = "create_user")]
    async fn api_create_user(
        &self,
        session: &Session,
        services: Data<&Services>,
        body: Json<UserDataRequest>,
    ) -> Result<CreateUserResponse, TaskboardError> {
        let identity = require_identity(session)?;
        authz::ensure_teacher(&identity)?;

        let data = check_user_data(&body)?;

        let password = match &body.password {
            Some(password) => password.clone(),
            None => {
                let config = services.config.lock().await;
                config.store.default_member_password.expose_secret().clone()
            }
        };

        let db = services.db.lock().await;
        let values = User::ActiveModel {
            id: Set(Uuid::new_v4()),
            full_name: Set(data.full_name),
            email: Set(data.email),
            role: Set(data.role),
            group_id: Set(data.group_id),
            job: Set(data.job),
            phone: Set(data.phone),
            password_hash: Set(hash_password(&password)),
        };

        let user = values
            .insert(&*db)
            .await
            .map_err(|e| TaskboardError::unique(e, "Email already exists."))?;

        Ok(CreateUserResponse::Created(Json(user)))
    }

    #[oai(path = "/users/:id", method = "put", operation_id = "update_user")]
    async fn api_update_user(
        &self,
        session: &Session,
        services: Data<&Services>,
        id: Path<Uuid>,
        body: Json<UserDataRequest>,
    ) -> Result<UpdateUserResponse, TaskboardError> {
        let identity = require_identity(session)?;
        authz::ensure_teacher(&identity)?;

        let data = check_user_data(&body)?;

        let db = services.db.lock().await;
        let Some(user) = User::Entity::find_by_id(id.0).one(&*db).await? else {
            return Ok(UpdateUserResponse::NotFound);
        };

        let mut model: User::ActiveModel = user.into();
        model.full_name = Set(data.full_name);
        model.email = Set(data.email);
        model.role = Set(data.role);
        model.group_id = Set(data.group_id);
        model.job = Set(data.job);
        model.phone = Set(data.phone);
        if let Some(password) = &body.password {
            model.password_hash = Set(hash_password(password));
        }

        let user = model
            .update(&*db)
            .await
            .map_err(|e| TaskboardError::unique(e, "Email already exists."))?;

        Ok(UpdateUserResponse::Ok(Json(user)))
    }

    #[oai(path = "/users/:id", method = "delete", operation_id = "delete_user")]
    async fn api_delete_user(
        &self,
        session: &Session,
        services: Data<&Services>,
        id: Path<Uuid>,
    ) -> Result<DeleteUserResponse, TaskboardError> {
        let identity = require_identity(session)?;
        authz::ensure_teacher(&identity)?;

        let db = services.db.lock().await;
        let Some(user) = User::Entity::find_by_id(id.0).one(&*db).await? else {
            return Ok(DeleteUserResponse::NotFound);
        };

        user.delete(&*db).await?;
        Ok(DeleteUserResponse::Deleted)
    }
}
