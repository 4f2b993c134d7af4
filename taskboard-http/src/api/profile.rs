use poem::session::Session;
use poem::web::Data;
use poem_openapi::payload::Json;
use poem_openapi::{ApiResponse, Object, OpenApi};
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use uuid::Uuid;
use taskboard_common::helpers::hash::{hash_password, verify_password_hash};
use taskboard_common::validation::{
    normalize_job, validate_full_name, validate_job, validate_phone,
};
use taskboard_common::{Role, TaskboardError};
use taskboard_core::Services;
use taskboard_db_entities::User;

use crate::common::{require_identity, SessionExt};

pub struct Api;

#[derive(Object)]
struct ProfileData {
    id: Uuid,
    full_name: String,
    email: String,
    role: Role,
    group_id: Option<Uuid>,
    job: Option<String>,
    phone: Option<String>,
}

#[derive(Object)]
struct UpdateProfileRequest {
    full_name: String,
    job: Option<String>,
    phone: Option<String>,
}

#[derive(Object)]
struct ChangePasswordRequest {
    old_password: String,
    new_password: String,
}

#[derive(ApiResponse)]
enum GetProfileResponse {
    #[oai(status = 200)]
    Ok(Json<ProfileData>),
}

#[derive(ApiResponse)]
enum UpdateProfileResponse {
    #[oai(status = 200)]
    Ok(Json<ProfileData>),
}

#[derive(ApiResponse)]
enum ChangePasswordResponse {
    #[oai(status = 201)]
    Changed,

    #[oai(status = 401)]
    Denied(Json<String>),
}

fn profile_data(user: User::Model) -> ProfileData {
    ProfileData {
        id: user.id,
        full_name: user.full_name,
        email: user.email,
        role: user.role,
        group_id: user.group_id,
        job: user.job,
        phone: user.phone,
    }
}

#[OpenApi]
impl Api {
    #[oai(path = "/profile", method = "get", operation_id = "get_profile")]
    async fn api_get_profile(
        &self,
        session: &Session,
        services: Data<&Services>,
    ) -> Result<GetProfileResponse, TaskboardError> {
        let identity = require_identity(session)?;

        let db = services.db.lock().await;
        let user = User::Entity::find_by_id(identity.id)
            .one(&*db)
            .await?
            .ok_or(TaskboardError::UserNotFound(identity.id))?;

        Ok(GetProfileResponse::Ok(Json(profile_data(user))))
    }

    #[oai(path = "/profile", method = "put", operation_id = "update_profile")]
    async fn api_update_profile(
        &self,
        session: &Session,
        services: Data<&Services>,
        body: Json<UpdateProfileRequest>,
    ) -> Result<UpdateProfileResponse, TaskboardError> {
        let identity = require_identity(session)?;

        validate_full_name(&body.full_name)?;
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

        let db = services.db.lock().await;
        let user = User::Entity::find_by_id(identity.id)
            .one(&*db)
            .await?
            .ok_or(TaskboardError::UserNotFound(identity.id))?;

        let mut model: User::ActiveModel = user.into();
        model.full_name = Set(body.full_name.clone());
        model.job = Set(job);
        model.phone = Set(body.phone.clone());
        let user = model.update(&*db).await?;

        // Keep the session identity in step with the stored name.
        session.set_identity(taskboard_common::Identity {
            id: user.id,
            role: user.role,
            email: user.email.clone(),
            full_name: user.full_name.clone(),
            group_id: user.group_id,
        });

        Ok(UpdateProfileResponse::Ok(Json(profile_data(user))))
    }

    #[oai(
        path = "/profile/password",
        method = "put",
        operation_id = "change_password"
    )]
    async fn api_change_password(
        &self,
        session: &Session,
        services: Data<&Services>,
        body: Json<ChangePasswordRequest>,
    ) -> Result<ChangePasswordResponse, TaskboardError> {
        let identity = require_identity(session)?;

        let db = services.db.lock().await;
        let user = User::Entity::find_by_id(identity.id)
            .one(&*db)
            .await?
            .ok_or(TaskboardError::UserNotFound(identity.id))?;

        if !verify_password_hash(&body.old_password, &user.password_hash).unwrap_or(false) {
            return Ok(ChangePasswordResponse::Denied(Json(
                "Incorrect current password".into(),
            )));
        }

        let mut model: User::ActiveModel = user.into();
        model.password_hash = Set(hash_password(&body.new_password));
        model.update(&*db).await?;

        Ok(ChangePasswordResponse::Changed)
    }
}
