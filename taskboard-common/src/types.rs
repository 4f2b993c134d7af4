mod login;
mod role;
mod secret;
mod task;

pub use login::LoginOutcome;
pub use role::Role;
pub use secret::Secret;
pub use task::{Criticality, TaskStatus};
