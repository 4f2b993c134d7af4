use sea_orm::Schema;
use sea_orm_migration::prelude::*;

pub mod group {
    use sea_orm::entity::prelude::*;
    use uuid::Uuid;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "groups")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        #[sea_orm(unique)]
        pub name: String,
        pub score: i32,
        pub failed_count: i32,
        pub completed_count: i32,
        pub in_progress_count: i32,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

pub mod user {
    use sea_orm::entity::prelude::*;
    use uuid::Uuid;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "users")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        pub full_name: String,
        #[sea_orm(unique)]
        pub email: String,
        pub role: String,
        pub group_id: Option<Uuid>,
        pub job: Option<String>,
        pub phone: Option<String>,
        pub password_hash: String,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

pub mod task {
    use chrono::{DateTime, Utc};
    use sea_orm::entity::prelude::*;
    use uuid::Uuid;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "tasks")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        pub title: String,
        #[sea_orm(column_type = "Text")]
        pub description: String,
        pub maker: Option<Uuid>,
        pub criticality: String,
        pub group_id: Uuid,
        pub status: String,
        pub start_time: DateTime<Utc>,
        pub end_time: DateTime<Utc>,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m00001_init"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let builder = manager.get_database_backend();
        let schema = Schema::new(builder);

        manager
            .create_table(schema.create_table_from_entity(group::Entity))
            .await?;

        manager
            .create_table(schema.create_table_from_entity(user::Entity))
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(user::Entity)
                    .name("idx_users_group_id")
                    .col(Alias::new("group_id"))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(schema.create_table_from_entity(task::Entity))
            .await?;

        // Task listings filter by group and tally by status
        manager
            .create_index(
                Index::create()
                    .table(task::Entity)
                    .name("idx_tasks_group_id_status")
                    .col(Alias::new("group_id"))
                    .col(Alias::new("status"))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .table(task::Entity)
                    .name("idx_tasks_group_id_status")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .table(user::Entity)
                    .name("idx_users_group_id")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(task::Entity).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(user::Entity).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(group::Entity).to_owned())
            .await?;

        Ok(())
    }
}
