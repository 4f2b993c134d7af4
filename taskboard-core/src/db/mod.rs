use std::time::Duration;

use anyhow::Result;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectOptions, Database, DatabaseConnection, EntityTrait,
    QueryFilter, TransactionTrait,
};
use tracing::*;
use uuid::Uuid;
use taskboard_common::consts::STARTER_GROUP_NAMES;
use taskboard_common::helpers::fs::{secure_directory, secure_file};
use taskboard_common::helpers::hash::hash_password;
use taskboard_common::{Role, TaskboardConfig, TaskboardError};
use taskboard_db_entities::{Group, User};
use taskboard_db_migrations::migrate_database;

pub async fn connect_to_db(config: &TaskboardConfig) -> Result<DatabaseConnection> {
    let mut url = url::Url::parse(&config.store.database_url.expose_secret()[..])?;
    if url.scheme() == "sqlite" {
        let path = url.path();
        let mut abs_path = config.paths_relative_to.clone();
        abs_path.push(path);
        abs_path.push("db.sqlite3");

        if let Some(parent) = abs_path.parent() {
            std::fs::create_dir_all(parent)?;
            secure_directory(parent)?;
        }

        url.set_path(
            abs_path
                .to_str()
                .ok_or_else(|| anyhow::anyhow!("Failed to convert database path to string"))?,
        );

        url.set_query(Some("mode=rwc"));

        let db = Database::connect(ConnectOptions::new(url.to_string())).await?;
        db.begin().await?.commit().await?;
        drop(db);

        secure_file(&abs_path)?;
    }

    let mut opt = ConnectOptions::new(url.to_string());
    opt.max_connections(100)
        .min_connections(5)
        .connect_timeout(Duration::from_secs(8))
        .idle_timeout(Duration::from_secs(8))
        .max_lifetime(Duration::from_secs(8))
        .sqlx_logging(true);

    let connection = Database::connect(opt).await?;

    migrate_database(&connection).await?;
    Ok(connection)
}

pub async fn populate_db(
    db: &mut DatabaseConnection,
    config: &TaskboardConfig,
) -> Result<(), TaskboardError> {
    use sea_orm::ActiveValue::Set;

    let teacher_email = &config.store.builtin_teacher_email;
    if User::Entity::find()
        .filter(User::Column::Email.eq(teacher_email.clone()))
        .one(&*db)
        .await?
        .is_none()
    {
        let values = User::ActiveModel {
            id: Set(Uuid::new_v4()),
            full_name: Set("Default Teacher".to_owned()),
            email: Set(teacher_email.clone()),
            role: Set(Role::Teacher),
            group_id: Set(None),
            job: Set(Some("ADMINISTRATOR".to_owned())),
            phone: Set(None),
            password_hash: Set(hash_password(
                config.store.default_member_password.expose_secret(),
            )),
        };
        values.insert(&*db).await.map_err(TaskboardError::from)?;
        info!(email = %teacher_email, "Created built-in teacher account");
    }

    if Group::Entity::find().all(&*db).await?.is_empty() {
        for name in STARTER_GROUP_NAMES {
            let values = Group::ActiveModel {
                id: Set(Uuid::new_v4()),
                name: Set((*name).to_owned()),
                score: Set(0),
                failed_count: Set(0),
                completed_count: Set(0),
                in_progress_count: Set(0),
            };
            values.insert(&*db).await.map_err(TaskboardError::from)?;
        }
        info!("Seeded starter groups");
    }

    Ok(())
}
