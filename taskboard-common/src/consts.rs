/// Upper bound for a group's cumulative score (DB check constraint mirror).
pub const MAX_GROUP_SCORE: i32 = 1000;

/// Upper bound for each per-group task counter.
pub const MAX_GROUP_COUNTER: i32 = 1000;

pub const MAX_FULL_NAME_LEN: usize = 30;
pub const MAX_EMAIL_LEN: usize = 40;
pub const MAX_JOB_LEN: usize = 20;
pub const MAX_GROUP_NAME_LEN: usize = 50;
pub const MAX_TASK_TITLE_LEN: usize = 100;

/// Groups created on first start when the store is empty.
pub const STARTER_GROUP_NAMES: &[&str] = &["Alpha Team", "Beta Squad", "Gamma Cell"];
