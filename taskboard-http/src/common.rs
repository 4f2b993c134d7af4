use poem::session::Session;
use taskboard_common::{Identity, TaskboardError};

pub static SESSION_COOKIE_NAME: &str = "taskboard-session";
static IDENTITY_SESSION_KEY: &str = "identity";

pub trait SessionExt {
    fn get_identity(&self) -> Option<Identity>;
    fn set_identity(&self, identity: Identity);
}

impl SessionExt for Session {
    fn get_identity(&self) -> Option<Identity> {
        self.get(IDENTITY_SESSION_KEY)
    }

    fn set_identity(&self, identity: Identity) {
        self.set(IDENTITY_SESSION_KEY, identity);
    }
}

pub fn require_identity(session: &Session) -> Result<Identity, TaskboardError> {
    session
        .get_identity()
        .ok_or(TaskboardError::Unauthenticated)
}
