use anyhow::Result;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use tracing::*;
use uuid::Uuid;
use taskboard_common::helpers::hash::hash_password;
use taskboard_common::Role;
use taskboard_core::Services;
use taskboard_db_entities::User;

use crate::config::load_config;

pub(crate) async fn command(
    cli: &crate::Cli,
    email: &str,
    full_name: &str,
    role: &Option<String>,
    password: &Option<String>,
) -> Result<()> {
    let config = load_config(&cli.config, true)?;
    let services = Services::new(config.clone()).await?;

    let role = match role.as_deref() {
        Some("TEACHER") => Role::Teacher,
        Some("LEADER") => Role::Leader,
        Some("NORMAL") | None => Role::Normal,
        Some(other) => anyhow::bail!("Unknown role: {other}"),
    };

    let password = match password {
        Some(password) => password.clone(),
        None => config.store.default_member_password.expose_secret().clone(),
    };

    let db = services.db.lock().await;

    match User::Entity::find()
        .filter(User::Column::Email.eq(email))
        .one(&*db)
        .await?
    {
        Some(user) => {
            let mut model: User::ActiveModel = user.into();
            model.full_name = Set(full_name.to_owned());
            model.role = Set(role);
            model.password_hash = Set(hash_password(&password));
            model.update(&*db).await?;
            info!(%email, "Updated user");
        }
        None => {
            let values = User::ActiveModel {
                id: Set(Uuid::new_v4()),
                full_name: Set(full_name.to_owned()),
                email: Set(email.to_owned()),
                role: Set(role),
                group_id: Set(None),
                job: Set(None),
                phone: Set(None),
                password_hash: Set(hash_password(&password)),
            };
            values.insert(&*db).await?;
            info!(%email, "Created user");
        }
    }

    Ok(())
}
