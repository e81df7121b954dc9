pub use sea_orm_migration::prelude::*;

mod m20261001_000001_identity;
mod m20261001_000002_hr_core;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20261001_000001_identity::Migration),
            Box::new(m20261001_000002_hr_core::Migration),
        ]
    }
}
