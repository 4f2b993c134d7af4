use poem::session::Session;
use poem_openapi::payload::Json;
use poem_openapi::{Object, OpenApi};

use crate::common::SessionExt;

pub struct Api;

#[derive(Object)]
struct ServiceStatus {
    version: String,
    authenticated: bool,
}

#[OpenApi]
impl Api {
    #[oai(path = "/status", method = "get", operation_id = "get_status")]
    async fn api_get_status(&self, session: &Session) -> Json<ServiceStatus> {
        Json(ServiceStatus {
            version: env!("CARGO_PKG_VERSION").to_string(),
            authenticated: session.get_identity().is_some(),
        })
    }
}
