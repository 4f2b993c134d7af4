use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Role;

/// The decoded identity the session layer hands to the policy core. The
/// core only consumes it for authorization checks; it never mints tokens.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Identity {
    pub id: Uuid,
    pub role: Role,
    pub email: String,
    pub full_name: String,
    pub group_id: Option<Uuid>,
}
