#![allow(dead_code)]

use chrono::Utc;
use entity::{app_user, employee};
use migration::{Migrator, MigratorTrait};
use products_hr::employees::{self, NewEmployee};
use products_hr::seed;
use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, Set};

pub struct TestEnv {
    pub db: DatabaseConnection,
    pub user_id: i32,
}

/// Migrated in-memory database with the demo catalog and one user.
pub async fn setup() -> TestEnv {
    let db = Database::connect("sqlite::memory:").await.expect("db");
    Migrator::up(&db, None).await.expect("migrations");
    seed::seed_demo_catalog(&db).await.expect("seed");
    let user = app_user::ActiveModel {
        username: Set("hr-admin".into()),
        password_hash: Set("not-a-real-hash".into()),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    }
    .insert(&db)
    .await
    .expect("user");
    TestEnv {
        db,
        user_id: user.id,
    }
}

pub async fn hire(env: &TestEnv, name: &str) -> employee::Model {
    employees::add_employee(
        &env.db,
        NewEmployee {
            name: Some(name.into()),
            position: Some("Engineer".into()),
            hire_date: Some("2024-01-01".into()),
        },
        env.user_id,
    )
    .await
    .expect("add employee")
}

pub fn date(raw: &str) -> chrono::NaiveDate {
    chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d").expect("date")
}
