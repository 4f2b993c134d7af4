use std::error::Error;

use poem::error::ResponseError;
use poem::http::StatusCode;
use poem_openapi::registry::{MetaResponse, MetaResponses, Registry};
use poem_openapi::ApiResponse;
use sea_orm::SqlErr;
use uuid::Uuid;

#[derive(thiserror::Error, Debug)]
pub enum TaskboardError {
    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),
    #[error("{0}")]
    Validation(String),
    #[error("not authenticated")]
    Unauthenticated,
    #[error("permission denied")]
    PermissionDenied,
    #[error("user {0} not found")]
    UserNotFound(Uuid),
    #[error("group {0} not found")]
    GroupNotFound(Uuid),
    #[error("task {0} not found")]
    TaskNotFound(Uuid),
    #[error("too many failed attempts, try again in {0} minute(s)")]
    RateLimited(i64),
    #[error("no task rows could be created for the requested groups")]
    FanoutFailed,
    #[error("deserialization failed: {0}")]
    DeserializeJson(#[from] serde_json::Error),
    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
    #[error(transparent)]
    Other(Box<dyn Error + Send + Sync>),
}

impl ResponseError for TaskboardError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::PermissionDenied => StatusCode::FORBIDDEN,
            Self::UserNotFound(_) | Self::GroupNotFound(_) | Self::TaskNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            Self::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl ApiResponse for TaskboardError {
    fn meta() -> MetaResponses {
        MetaResponses {
            responses: vec![MetaResponse {
                description: "Error",
                status: None,
                status_range: None,
                content: vec![],
                headers: vec![],
            }],
        }
    }

    fn register(_registry: &mut Registry) {}
}

impl TaskboardError {
    pub fn other<E: Error + Send + Sync + 'static>(err: E) -> Self {
        Self::Other(Box::new(err))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Translates a store-level unique constraint violation into a
    /// caller-facing validation error; other DB errors pass through.
    pub fn unique(err: sea_orm::DbErr, message: &str) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => Self::Validation(message.to_owned()),
            _ => Self::Database(err),
        }
    }
}
