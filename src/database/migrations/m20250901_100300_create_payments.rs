use sea_orm_migration::{
    prelude::*,
    schema::{big_integer, date_time, integer_null, pk_auto, string_len},
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Payments::Table)
                    .if_not_exists()
                    .col(pk_auto(Payments::Id))
                    .col(date_time(Payments::Date).default(Expr::current_timestamp()))
                    .col(big_integer(Payments::Amount))
                    .col(string_len(Payments::Method, 25))
                    .col(integer_null(Payments::CourseId))
                    .col(integer_null(Payments::LessonId))
                    .col(integer_null(Payments::OwnerId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-payments-course_id")
                            .from(Payments::Table, Payments::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-payments-lesson_id")
                            .from(Payments::Table, Payments::LessonId)
                            .to(Lessons::Table, Lessons::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-payments-owner_id")
                            .from(Payments::Table, Payments::OwnerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-payments-owner_id")
                    .table(Payments::Table)
                    .col(Payments::OwnerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-payments-date")
                    .table(Payments::Table)
                    .col(Payments::Date)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Payments::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Payments {
    Table,
    Id,
    Date,
    Amount,
    Method,
    CourseId,
    LessonId,
    OwnerId,
}

#[derive(DeriveIden)]
enum Courses {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Lessons {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}
