use sea_orm_migration::{
    prelude::*,
    schema::{date_time, integer, integer_null, pk_auto, string_len, string_null, text},
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Lessons::Table)
                    .if_not_exists()
                    .col(pk_auto(Lessons::Id))
                    .col(integer(Lessons::CourseId))
                    .col(string_len(Lessons::Name, 250))
                    .col(text(Lessons::Description))
                    .col(string_null(Lessons::Preview))
                    .col(string_null(Lessons::VideoUrl))
                    .col(integer_null(Lessons::OwnerId))
                    .col(date_time(Lessons::CreatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-lessons-course_id")
                            .from(Lessons::Table, Lessons::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-lessons-owner_id")
                            .from(Lessons::Table, Lessons::OwnerId)
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
                    .name("idx-lessons-course_id")
                    .table(Lessons::Table)
                    .col(Lessons::CourseId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-lessons-owner_id")
                    .table(Lessons::Table)
                    .col(Lessons::OwnerId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Lessons::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Lessons {
    Table,
    Id,
    CourseId,
    Name,
    Description,
    Preview,
    VideoUrl,
    OwnerId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Courses {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}
