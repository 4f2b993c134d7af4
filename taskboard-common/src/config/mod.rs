mod defaults;

use std::path::PathBuf;

use defaults::*;
use serde::{Deserialize, Serialize};

use crate::Secret;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct HttpConfig {
    #[serde(default = "_default_true")]
    pub enable: bool,

    #[serde(default = "_default_http_listen")]
    pub listen: String,

    #[serde(default)]
    pub external_host: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            enable: true,
            listen: _default_http_listen(),
            external_host: None,
        }
    }
}

/// Progressive login lockout keyed on the source address.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoginThrottleConfig {
    #[serde(default = "_default_true")]
    pub enabled: bool,

    /// Consecutive failures at which blocking starts.
    #[serde(default = "_default_failure_threshold")]
    pub failure_threshold: u32,

    /// Optional cap on the doubling block window; unbounded when absent.
    #[serde(default)]
    pub max_block_minutes: Option<u32>,
}

impl Default for LoginThrottleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            failure_threshold: _default_failure_threshold(),
            max_block_minutes: None,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct TaskPolicyConfig {
    /// When set, tasks in `completed`/`failed` reject further transitions.
    #[serde(default = "_default_false")]
    pub enforce_terminal_states: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct TaskboardConfigStore {
    #[serde(default = "_default_database_url")]
    pub database_url: Secret<String>,

    #[serde(default)]
    pub http: HttpConfig,

    #[serde(default)]
    pub login_throttle: LoginThrottleConfig,

    #[serde(default)]
    pub tasks: TaskPolicyConfig,

    /// Email of the teacher account seeded on first start.
    #[serde(default = "_default_teacher_email")]
    pub builtin_teacher_email: String,

    /// Initial password for seeded and teacher-created accounts.
    #[serde(default = "_default_member_password")]
    pub default_member_password: Secret<String>,
}

impl Default for TaskboardConfigStore {
    fn default() -> Self {
        Self {
            database_url: _default_database_url(),
            http: HttpConfig::default(),
            login_throttle: LoginThrottleConfig::default(),
            tasks: TaskPolicyConfig::default(),
            builtin_teacher_email: _default_teacher_email(),
            default_member_password: _default_member_password(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TaskboardConfig {
    pub store: TaskboardConfigStore,
    pub paths_relative_to: PathBuf,
}
