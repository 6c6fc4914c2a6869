pub use sea_orm_migration::prelude::*;

mod m20250901_100000_create_users;
mod m20250901_100100_create_courses;
mod m20250901_100200_create_lessons;
mod m20250901_100300_create_payments;
mod m20250901_100400_create_subscriptions;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250901_100000_create_users::Migration),
            Box::new(m20250901_100100_create_courses::Migration),
            Box::new(m20250901_100200_create_lessons::Migration),
            Box::new(m20250901_100300_create_payments::Migration),
            Box::new(m20250901_100400_create_subscriptions::Migration),
        ]
    }
}

pub struct Migrator;
