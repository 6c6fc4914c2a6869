use std::collections::HashMap;

use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    ModelTrait, PaginatorTrait, QueryFilter, QueryOrder, Select,
};

use crate::database::models::{course, lesson};
use crate::policy::Scope;

#[derive(Debug, Clone)]
pub struct NewCourse {
    pub name: String,
    pub description: String,
    pub preview: Option<String>,
}

/// Fields to overwrite; `None` leaves the stored value alone.
#[derive(Debug, Clone, Default)]
pub struct CourseChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    /// `Some(None)` clears the preview
    pub preview: Option<Option<String>>,
}

/// Courses inside `scope`, oldest first.
pub fn visible(scope: Scope) -> Select<course::Entity> {
    scope.apply(course::Entity::find().order_by_asc(course::Column::Id))
}

pub async fn find_visible<C: ConnectionTrait>(
    db: &C,
    scope: Scope,
    id: i32,
) -> Result<Option<course::Model>, DbErr> {
    visible(scope)
        .filter(course::Column::Id.eq(id))
        .one(db)
        .await
}

pub async fn exists<C: ConnectionTrait>(db: &C, id: i32) -> Result<bool, DbErr> {
    Ok(course::Entity::find_by_id(id).count(db).await? > 0)
}

/// Insert a course owned by `owner_id`. The owner is part of the same insert,
/// there is no window where the row exists without one.
pub async fn insert<C: ConnectionTrait>(
    db: &C,
    owner_id: i32,
    new_course: NewCourse,
) -> Result<course::Model, DbErr> {
    course::ActiveModel {
        name: Set(new_course.name),
        description: Set(new_course.description),
        preview: Set(new_course.preview),
        owner_id: Set(Some(owner_id)),
        created_at: Set(super::now()),
        ..Default::default()
    }
    .insert(db)
    .await
}

pub async fn update<C: ConnectionTrait>(
    db: &C,
    course: course::Model,
    changes: CourseChanges,
) -> Result<course::Model, DbErr> {
    let mut active: course::ActiveModel = course.clone().into();

    if let Some(name) = changes.name {
        active.name = Set(name);
    }
    if let Some(description) = changes.description {
        active.description = Set(description);
    }
    if let Some(preview) = changes.preview {
        active.preview = Set(preview);
    }

    if !active.is_changed() {
        return Ok(course);
    }

    active.update(db).await
}

/// Delete a course; its lessons and subscriptions go with it.
pub async fn delete<C: ConnectionTrait>(db: &C, course: course::Model) -> Result<(), DbErr> {
    course.delete(db).await?;

    Ok(())
}

/// Names of every lesson of each course in `course_ids`, in creation order.
///
/// Lessons are listed regardless of who owns them; a course shows its whole
/// syllabus. Courses without lessons map to an empty list.
pub async fn lesson_names<C: ConnectionTrait>(
    db: &C,
    course_ids: &[i32],
) -> Result<HashMap<i32, Vec<String>>, DbErr> {
    let mut names: HashMap<i32, Vec<String>> =
        course_ids.iter().map(|id| (*id, Vec::new())).collect();

    if course_ids.is_empty() {
        return Ok(names);
    }

    let lessons = lesson::Entity::find()
        .filter(lesson::Column::CourseId.is_in(course_ids.iter().copied()))
        .order_by_asc(lesson::Column::Id)
        .all(db)
        .await?;

    for lesson in lessons {
        names.entry(lesson.course_id).or_default().push(lesson.name);
    }

    Ok(names)
}
