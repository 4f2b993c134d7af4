use poem_openapi::OpenApi;

pub mod auth;
pub mod groups;
pub mod info;
pub mod profile;
pub mod tasks;
pub mod users;

pub fn get() -> impl OpenApi {
    (
        info::Api,
        auth::Api,
        profile::Api,
        users::Api,
        groups::Api,
        tasks::Api,
    )
}
