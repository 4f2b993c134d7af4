use std::sync::Arc;

use anyhow::Result;
use sea_orm::DatabaseConnection;
use tokio::sync::Mutex;
use taskboard_common::TaskboardConfig;

use crate::db::{connect_to_db, populate_db};
use crate::tasks::{TaskFanoutService, TaskTransitionService};
use crate::throttle::LoginThrottleService;

#[derive(Clone)]
pub struct Services {
    pub db: Arc<Mutex<DatabaseConnection>>,
    pub config: Arc<Mutex<TaskboardConfig>>,
    pub login_throttle: Arc<LoginThrottleService>,
    pub task_transitions: Arc<TaskTransitionService>,
    pub task_fanout: Arc<TaskFanoutService>,
}

impl Services {
    pub async fn new(config: TaskboardConfig) -> Result<Self> {
        let mut db = connect_to_db(&config).await?;
        populate_db(&mut db, &config).await?;
        let db = Arc::new(Mutex::new(db));

        let login_throttle = Arc::new(LoginThrottleService::new(
            config.store.login_throttle.clone(),
            db.clone(),
        ));

        let task_transitions = Arc::new(TaskTransitionService::new(
            config.store.tasks.clone(),
            db.clone(),
        ));

        let task_fanout = Arc::new(TaskFanoutService::new(db.clone()));

        let config = Arc::new(Mutex::new(config));

        Ok(Self {
            db,
            config,
            login_throttle,
            task_transitions,
            task_fanout,
        })
    }
}
