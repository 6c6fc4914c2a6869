use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    ModelTrait, PaginatorTrait, QueryFilter, QueryOrder, Select,
};

use crate::database::models::{course, lesson};
use crate::policy::{CourseAuthorship, Scope};

#[derive(Debug, Clone)]
pub struct NewLesson {
    pub course_id: i32,
    pub name: String,
    pub description: String,
    pub preview: Option<String>,
    pub video_url: Option<String>,
}

/// Fields to overwrite. A lesson never moves to another course.
///
/// `preview` and `video_url` are tri-state: `None` keeps the stored value,
/// `Some(None)` clears it.
#[derive(Debug, Clone, Default)]
pub struct LessonChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub preview: Option<Option<String>>,
    pub video_url: Option<Option<String>>,
}

/// Lessons inside `scope`, oldest first.
pub fn visible(scope: Scope) -> Select<lesson::Entity> {
    scope.apply(lesson::Entity::find().order_by_asc(lesson::Column::Id))
}

pub async fn find_visible<C: ConnectionTrait>(
    db: &C,
    scope: Scope,
    id: i32,
) -> Result<Option<lesson::Model>, DbErr> {
    visible(scope)
        .filter(lesson::Column::Id.eq(id))
        .one(db)
        .await
}

pub async fn exists<C: ConnectionTrait>(db: &C, id: i32) -> Result<bool, DbErr> {
    Ok(lesson::Entity::find_by_id(id).count(db).await? > 0)
}

/// What `principal_id` already has in course `course_id`, or `None` if the
/// course does not exist.
pub async fn authorship<C: ConnectionTrait>(
    db: &C,
    course_id: i32,
    principal_id: i32,
) -> Result<Option<CourseAuthorship>, DbErr> {
    let Some(course) = course::Entity::find_by_id(course_id).one(db).await? else {
        return Ok(None);
    };

    let own_lessons = lesson::Entity::find()
        .filter(lesson::Column::CourseId.eq(course_id))
        .filter(lesson::Column::OwnerId.eq(principal_id))
        .count(db)
        .await?;

    Ok(Some(CourseAuthorship {
        owns_course: course.owner_id == Some(principal_id),
        has_lesson_in_course: own_lessons > 0,
    }))
}

pub async fn insert<C: ConnectionTrait>(
    db: &C,
    owner_id: i32,
    new_lesson: NewLesson,
) -> Result<lesson::Model, DbErr> {
    lesson::ActiveModel {
        course_id: Set(new_lesson.course_id),
        name: Set(new_lesson.name),
        description: Set(new_lesson.description),
        preview: Set(new_lesson.preview),
        video_url: Set(new_lesson.video_url),
        owner_id: Set(Some(owner_id)),
        created_at: Set(super::now()),
        ..Default::default()
    }
    .insert(db)
    .await
}

pub async fn update<C: ConnectionTrait>(
    db: &C,
    lesson: lesson::Model,
    changes: LessonChanges,
) -> Result<lesson::Model, DbErr> {
    let mut active: lesson::ActiveModel = lesson.clone().into();

    if let Some(name) = changes.name {
        active.name = Set(name);
    }
    if let Some(description) = changes.description {
        active.description = Set(description);
    }
    if let Some(preview) = changes.preview {
        active.preview = Set(preview);
    }
    if let Some(video_url) = changes.video_url {
        active.video_url = Set(video_url);
    }

    if !active.is_changed() {
        return Ok(lesson);
    }

    active.update(db).await
}

pub async fn delete<C: ConnectionTrait>(db: &C, lesson: lesson::Model) -> Result<(), DbErr> {
    lesson.delete(db).await?;

    Ok(())
}
