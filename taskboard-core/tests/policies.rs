use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, EntityTrait, Set};
use tokio::sync::Mutex;
use uuid::Uuid;
use taskboard_common::{
    Criticality, Identity, LoginOutcome, LoginThrottleConfig, Role, TaskPolicyConfig, TaskStatus,
    TaskboardError,
};
use taskboard_core::{LoginThrottleService, TaskDraft, TaskFanoutService, TaskTransitionService};
use taskboard_db_entities::{Group, Task};
use taskboard_db_migrations::migrate_database;

async fn test_db() -> Arc<Mutex<DatabaseConnection>> {
    // A single pooled connection keeps every query on the same in-memory db.
    let mut opt = ConnectOptions::new("sqlite::memory:".to_owned());
    opt.max_connections(1);
    let db = Database::connect(opt).await.unwrap();
    migrate_database(&db).await.unwrap();
    Arc::new(Mutex::new(db))
}

fn throttle_config() -> LoginThrottleConfig {
    LoginThrottleConfig {
        enabled: true,
        failure_threshold: 3,
        max_block_minutes: None,
    }
}

fn teacher() -> Identity {
    Identity {
        id: Uuid::new_v4(),
        role: Role::Teacher,
        email: "teacher@example.com".into(),
        full_name: "Teacher".into(),
        group_id: None,
    }
}

fn leader_of(group_id: Uuid) -> Identity {
    Identity {
        id: Uuid::new_v4(),
        role: Role::Leader,
        email: "leader@example.com".into(),
        full_name: "Leader".into(),
        group_id: Some(group_id),
    }
}

async fn make_group(db: &DatabaseConnection, name: &str) -> Group::Model {
    Group::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_owned()),
        score: Set(0),
        failed_count: Set(0),
        completed_count: Set(0),
        in_progress_count: Set(0),
    }
    .insert(db)
    .await
    .unwrap()
}

async fn make_task(
    db: &DatabaseConnection,
    group_id: Uuid,
    status: TaskStatus,
    criticality: Criticality,
) -> Task::Model {
    let now = Utc::now();
    Task::ActiveModel {
        id: Set(Uuid::new_v4()),
        title: Set("Patrol the perimeter".to_owned()),
        description: Set("Walk the fence line".to_owned()),
        maker: Set(None),
        criticality: Set(criticality),
        group_id: Set(group_id),
        status: Set(status),
        start_time: Set(now),
        end_time: Set(now + Duration::days(1)),
    }
    .insert(db)
    .await
    .unwrap()
}

fn draft(deadline: DateTime<Utc>) -> TaskDraft {
    TaskDraft {
        title: "Patrol the perimeter".to_owned(),
        description: "Walk the fence line".to_owned(),
        criticality: Criticality::High,
        status: None,
        start_time: None,
        deadline,
    }
}

#[tokio::test]
async fn third_consecutive_failure_opens_a_one_minute_block() {
    let db = test_db().await;
    let throttle = LoginThrottleService::new(throttle_config(), db.clone());
    let ip = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1));
    let now = Utc::now();

    let first = throttle.record_failure(&ip, now).await.unwrap();
    assert_eq!(first.outcome, LoginOutcome::Failed);
    assert!(throttle.check_blocked(&ip, now).await.unwrap().is_none());

    throttle.record_failure(&ip, now).await.unwrap();
    let third = throttle.record_failure(&ip, now).await.unwrap();
    assert_eq!(third.outcome, LoginOutcome::Blocked);
    assert_eq!(third.failure_count, 3);
    assert_eq!(third.blocked_until, Some(now + Duration::minutes(1)));

    let block = throttle.check_blocked(&ip, now).await.unwrap().unwrap();
    assert_eq!(block.minutes_left, 1);
}

#[tokio::test]
async fn each_further_failure_doubles_the_window() {
    let db = test_db().await;
    let throttle = LoginThrottleService::new(throttle_config(), db.clone());
    let ip = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 2));
    let now = Utc::now();

    for _ in 0..3 {
        throttle.record_failure(&ip, now).await.unwrap();
    }
    let fourth = throttle.record_failure(&ip, now).await.unwrap();
    assert_eq!(fourth.failure_count, 4);
    assert_eq!(fourth.blocked_until, Some(now + Duration::minutes(2)));

    let fifth = throttle.record_failure(&ip, now).await.unwrap();
    assert_eq!(fifth.blocked_until, Some(now + Duration::minutes(4)));
}

#[tokio::test]
async fn success_resets_the_failure_chain() {
    let db = test_db().await;
    let throttle = LoginThrottleService::new(throttle_config(), db.clone());
    let ip = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 3));
    let now = Utc::now();

    throttle.record_failure(&ip, now).await.unwrap();
    throttle.record_failure(&ip, now).await.unwrap();
    throttle.record_success(&ip, now).await.unwrap();

    let next = throttle.record_failure(&ip, now).await.unwrap();
    assert_eq!(next.failure_count, 1);
    assert_eq!(next.outcome, LoginOutcome::Failed);
    assert!(throttle.check_blocked(&ip, now).await.unwrap().is_none());
}

#[tokio::test]
async fn partial_minute_still_reads_as_one() {
    let db = test_db().await;
    let throttle = LoginThrottleService::new(throttle_config(), db.clone());
    let ip = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 4));
    let now = Utc::now();

    for _ in 0..3 {
        throttle.record_failure(&ip, now).await.unwrap();
    }

    let later = now + Duration::seconds(30);
    let block = throttle.check_blocked(&ip, later).await.unwrap().unwrap();
    assert_eq!(block.minutes_left, 1);

    let expired = now + Duration::seconds(61);
    assert!(throttle.check_blocked(&ip, expired).await.unwrap().is_none());
}

#[tokio::test]
async fn addresses_are_throttled_independently() {
    let db = test_db().await;
    let throttle = LoginThrottleService::new(throttle_config(), db.clone());
    let noisy = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 5));
    let quiet = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 6));
    let now = Utc::now();

    for _ in 0..3 {
        throttle.record_failure(&noisy, now).await.unwrap();
    }

    assert!(throttle.check_blocked(&noisy, now).await.unwrap().is_some());
    assert!(throttle.check_blocked(&quiet, now).await.unwrap().is_none());
}

#[tokio::test]
async fn completing_a_task_awards_points_once() {
    let db = test_db().await;
    let transitions = TaskTransitionService::new(TaskPolicyConfig::default(), db.clone());

    let (group, task) = {
        let conn = db.lock().await;
        let group = make_group(&conn, "Alpha Team").await;
        let task = make_task(&conn, group.id, TaskStatus::InProgress, Criticality::High).await;
        (group, task)
    };

    let updated = transitions
        .set_status(task.id, TaskStatus::Completed, &teacher())
        .await
        .unwrap();
    assert_eq!(updated.status, TaskStatus::Completed);

    // Completing again must not score again.
    transitions
        .set_status(task.id, TaskStatus::Completed, &teacher())
        .await
        .unwrap();

    let conn = db.lock().await;
    let group = Group::Entity::find_by_id(group.id)
        .one(&*conn)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(group.score, 10);
    assert_eq!(group.completed_count, 1);
}

#[tokio::test]
async fn criticality_decides_the_award() {
    let db = test_db().await;
    let transitions = TaskTransitionService::new(TaskPolicyConfig::default(), db.clone());

    let (group, medium, low) = {
        let conn = db.lock().await;
        let group = make_group(&conn, "Beta Squad").await;
        let medium = make_task(&conn, group.id, TaskStatus::NotStarted, Criticality::Med).await;
        let low = make_task(&conn, group.id, TaskStatus::NotStarted, Criticality::Low).await;
        (group, medium, low)
    };

    transitions
        .set_status(medium.id, TaskStatus::Completed, &teacher())
        .await
        .unwrap();
    transitions
        .set_status(low.id, TaskStatus::Completed, &teacher())
        .await
        .unwrap();

    let conn = db.lock().await;
    let group = Group::Entity::find_by_id(group.id)
        .one(&*conn)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(group.score, 6);
    assert_eq!(group.completed_count, 2);
}

#[tokio::test]
async fn score_and_counter_clamp_at_the_cap() {
    let db = test_db().await;
    let transitions = TaskTransitionService::new(TaskPolicyConfig::default(), db.clone());

    let (group, task) = {
        let conn = db.lock().await;
        let group = make_group(&conn, "Gamma Cell").await;
        let mut values: Group::ActiveModel = group.clone().into();
        values.score = Set(995);
        values.completed_count = Set(1000);
        let group = values.update(&*conn).await.unwrap();
        let task = make_task(&conn, group.id, TaskStatus::InProgress, Criticality::High).await;
        (group, task)
    };

    transitions
        .set_status(task.id, TaskStatus::Completed, &teacher())
        .await
        .unwrap();

    let conn = db.lock().await;
    let group = Group::Entity::find_by_id(group.id)
        .one(&*conn)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(group.score, 1000);
    assert_eq!(group.completed_count, 1000);
}

#[tokio::test]
async fn repeated_completions_saturate_the_score() {
    let db = test_db().await;
    let transitions = TaskTransitionService::new(TaskPolicyConfig::default(), db.clone());

    // 110 high-criticality completions are worth 1100 raw points; the score
    // must rise monotonically and stop at the cap while the counter keeps
    // counting real completions.
    let (group, tasks) = {
        let conn = db.lock().await;
        let group = make_group(&conn, "Delta Wing").await;
        let mut tasks = Vec::new();
        for _ in 0..110 {
            tasks.push(make_task(&conn, group.id, TaskStatus::InProgress, Criticality::High).await);
        }
        (group, tasks)
    };

    let mut last_score = 0;
    for task in &tasks {
        transitions
            .set_status(task.id, TaskStatus::Completed, &teacher())
            .await
            .unwrap();

        let conn = db.lock().await;
        let group = Group::Entity::find_by_id(group.id)
            .one(&*conn)
            .await
            .unwrap()
            .unwrap();
        assert!(group.score >= last_score);
        assert!(group.score <= 1000);
        last_score = group.score;
    }

    let conn = db.lock().await;
    let group = Group::Entity::find_by_id(group.id)
        .one(&*conn)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(group.score, 1000);
    assert_eq!(group.completed_count, 110);
}

#[tokio::test]
async fn failing_a_task_awards_nothing() {
    let db = test_db().await;
    let transitions = TaskTransitionService::new(TaskPolicyConfig::default(), db.clone());

    let (group, task) = {
        let conn = db.lock().await;
        let group = make_group(&conn, "Alpha Team").await;
        let task = make_task(&conn, group.id, TaskStatus::InProgress, Criticality::High).await;
        (group, task)
    };

    transitions
        .set_status(task.id, TaskStatus::Failed, &teacher())
        .await
        .unwrap();

    let conn = db.lock().await;
    let group = Group::Entity::find_by_id(group.id)
        .one(&*conn)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(group.score, 0);
    assert_eq!(group.completed_count, 0);
}

#[tokio::test]
async fn leader_cannot_move_tasks_of_other_groups() {
    let db = test_db().await;
    let transitions = TaskTransitionService::new(TaskPolicyConfig::default(), db.clone());

    let (own_group, own_task, foreign_task) = {
        let conn = db.lock().await;
        let own_group = make_group(&conn, "Alpha Team").await;
        let other_group = make_group(&conn, "Beta Squad").await;
        let own_task =
            make_task(&conn, own_group.id, TaskStatus::NotStarted, Criticality::Low).await;
        let foreign_task =
            make_task(&conn, other_group.id, TaskStatus::NotStarted, Criticality::Low).await;
        (own_group, own_task, foreign_task)
    };

    let leader = leader_of(own_group.id);

    let denied = transitions
        .set_status(foreign_task.id, TaskStatus::InProgress, &leader)
        .await;
    assert!(matches!(denied, Err(TaskboardError::PermissionDenied)));

    transitions
        .set_status(own_task.id, TaskStatus::InProgress, &leader)
        .await
        .unwrap();
}

#[tokio::test]
async fn terminal_statuses_freeze_when_enforced() {
    let db = test_db().await;
    let config = TaskPolicyConfig {
        enforce_terminal_states: true,
    };
    let transitions = TaskTransitionService::new(config, db.clone());

    let task = {
        let conn = db.lock().await;
        let group = make_group(&conn, "Alpha Team").await;
        make_task(&conn, group.id, TaskStatus::Completed, Criticality::Low).await
    };

    let denied = transitions
        .set_status(task.id, TaskStatus::InProgress, &teacher())
        .await;
    assert!(matches!(denied, Err(TaskboardError::Validation(_))));
}

#[tokio::test]
async fn fanout_creates_one_independent_row_per_group() {
    let db = test_db().await;
    let fanout = TaskFanoutService::new(db.clone());
    let now = Utc::now();

    let group_ids = {
        let conn = db.lock().await;
        let a = make_group(&conn, "Alpha Team").await;
        let b = make_group(&conn, "Beta Squad").await;
        let c = make_group(&conn, "Gamma Cell").await;
        vec![a.id, b.id, c.id]
    };

    let report = fanout
        .create(
            &draft(now + Duration::days(7)),
            &group_ids,
            Uuid::new_v4(),
            now,
        )
        .await
        .unwrap();
    assert_eq!(report.task_ids.len(), 3);
    assert!(report.errors.is_empty());

    let conn = db.lock().await;
    let rows = Task::Entity::find().all(&*conn).await.unwrap();
    assert_eq!(rows.len(), 3);

    // Deleting one copy leaves the others untouched.
    Task::Entity::delete_by_id(report.task_ids[0])
        .exec(&*conn)
        .await
        .unwrap();
    let remaining = Task::Entity::find().all(&*conn).await.unwrap();
    assert_eq!(remaining.len(), 2);
    for row in remaining {
        assert_eq!(row.title, "Patrol the perimeter");
    }
}

#[tokio::test]
async fn fanout_rejects_an_empty_group_list() {
    let db = test_db().await;
    let fanout = TaskFanoutService::new(db.clone());
    let now = Utc::now();

    let denied = fanout
        .create(&draft(now + Duration::days(1)), &[], Uuid::new_v4(), now)
        .await;
    assert!(matches!(denied, Err(TaskboardError::Validation(_))));
}

#[tokio::test]
async fn edit_updates_in_place_and_forks_for_extra_groups() {
    let db = test_db().await;
    let fanout = TaskFanoutService::new(db.clone());
    // Whole seconds survive the storage round trip unchanged.
    let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();

    let (group_a, group_b, group_c, task) = {
        let conn = db.lock().await;
        let a = make_group(&conn, "Alpha Team").await;
        let b = make_group(&conn, "Beta Squad").await;
        let c = make_group(&conn, "Gamma Cell").await;
        let task = make_task(&conn, a.id, TaskStatus::InProgress, Criticality::Med).await;
        (a, b, c, task)
    };

    let mut updated_draft = draft(now + Duration::days(3));
    updated_draft.title = "Resupply the depot".to_owned();

    let report = fanout
        .edit(
            task.id,
            &updated_draft,
            &[group_a.id, group_b.id, group_c.id],
            Uuid::new_v4(),
            now,
        )
        .await
        .unwrap();
    assert_eq!(report.task_ids.len(), 3);
    assert_eq!(report.task_ids[0], task.id);

    let conn = db.lock().await;
    let rows = Task::Entity::find().all(&*conn).await.unwrap();
    assert_eq!(rows.len(), 3);

    let original = rows.iter().find(|row| row.id == task.id).unwrap();
    assert_eq!(original.group_id, group_a.id);
    assert_eq!(original.title, "Resupply the depot");
    // An edit without an explicit status resets the row, in-progress or not.
    assert_eq!(original.status, TaskStatus::NotStarted);
    // In-place edit keeps the original clock.
    assert_eq!(original.start_time, task.start_time);

    let forks: Vec<_> = rows.iter().filter(|row| row.id != task.id).collect();
    assert_eq!(forks.len(), 2);
    for fork in forks {
        assert!(fork.group_id == group_b.id || fork.group_id == group_c.id);
        assert_eq!(fork.title, "Resupply the depot");
        assert_eq!(fork.status, TaskStatus::NotStarted);
        assert_eq!(fork.start_time, now);
    }
}

#[tokio::test]
async fn edit_of_a_missing_task_is_not_found() {
    let db = test_db().await;
    let fanout = TaskFanoutService::new(db.clone());
    let now = Utc::now();

    let missing = Uuid::new_v4();
    let denied = fanout
        .edit(missing, &draft(now), &[], Uuid::new_v4(), now)
        .await;
    assert!(matches!(denied, Err(TaskboardError::TaskNotFound(id)) if id == missing));
}
