use std::net::{IpAddr, Ipv4Addr};

use chrono::Utc;
use poem::session::Session;
use poem::web::{Data, RealIp};
use poem_openapi::payload::Json;
use poem_openapi::{ApiResponse, Object, OpenApi};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use tracing::error;
use uuid::Uuid;
use taskboard_common::helpers::hash::verify_password_hash;
use taskboard_common::{Identity, Role, TaskboardError};
use taskboard_core::Services;
use taskboard_db_entities::User;

use crate::common::SessionExt;

pub struct Api;

#[derive(Object)]
struct LoginRequest {
    email: String,
    password: String,
}

#[derive(Object)]
struct LoginInfo {
    role: Role,
    group_id: Option<Uuid>,
    full_name: String,
}

#[derive(ApiResponse)]
enum LoginResponse {
    #[oai(status = 200)]
    Success(Json<LoginInfo>),

    #[oai(status = 401)]
    Failure(Json<String>),

    #[oai(status = 429)]
    RateLimited(Json<String>),
}

#[derive(ApiResponse)]
enum LogoutResponse {
    #[oai(status = 201)]
    Success,
}

fn rate_limit_message(minutes: i64) -> String {
    format!("Too many failed attempts. Try again in {minutes} minute(s).")
}

#[OpenApi]
impl Api {
    #[oai(path = "/auth/login", method = "post", operation_id = "login")]
    async fn api_auth_login(
        &self,
        session: &Session,
        services: Data<&Services>,
        real_ip: RealIp,
        body: Json<LoginRequest>,
    ) -> Result<LoginResponse, TaskboardError> {
        let ip = real_ip.0.unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));
        let now = Utc::now();

        if let Some(block) = services.login_throttle.check_blocked(&ip, now).await? {
            return Ok(LoginResponse::RateLimited(Json(rate_limit_message(
                block.minutes_left,
            ))));
        }

        let user = {
            let db = services.db.lock().await;
            User::Entity::find()
                .filter(User::Column::Email.eq(body.email.clone()))
                .one(&*db)
                .await?
        };

        let verified = user
            .as_ref()
            .map(|user| {
                verify_password_hash(&body.password, &user.password_hash).unwrap_or(false)
            })
            .unwrap_or(false);

        let Some(user) = user.filter(|_| verified) else {
            // The failing attempt itself is always answered as a credential
            // failure, even when it opens a block window; only attempts made
            // inside the window are rejected with 429. The ledger must not
            // turn a login failure into a 500 either.
            if let Err(error) = services.login_throttle.record_failure(&ip, now).await {
                error!(%ip, ?error, "Failed to record login failure");
            }
            return Ok(LoginResponse::Failure(Json("Invalid credentials".into())));
        };

        if let Err(error) = services.login_throttle.record_success(&ip, now).await {
            error!(%ip, ?error, "Failed to record login success");
        }

        session.set_identity(Identity {
            id: user.id,
            role: user.role,
            email: user.email.clone(),
            full_name: user.full_name.clone(),
            group_id: user.group_id,
        });

        Ok(LoginResponse::Success(Json(LoginInfo {
            role: user.role,
            group_id: user.group_id,
            full_name: user.full_name,
        })))
    }

    #[oai(path = "/auth/logout", method = "post", operation_id = "logout")]
    async fn api_auth_logout(&self, session: &Session) -> LogoutResponse {
        session.clear();
        LogoutResponse::Success
    }
}
