use axum::extract::{Path, State};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use serde_json::json;
use validator::{Validate, ValidationError};

use crate::api::{nullable, pagination::Pagination, validated_json::ValidatedJson};
use crate::auth::prelude::*;
use crate::database::{
    models::lesson,
    repository::lessons::{self, LessonChanges, NewLesson},
};
use crate::link_validator::{LinkValidator, TextFields};
use crate::policy::LessonPolicy;

const LESSON_LINKS: LinkValidator = LinkValidator::new(&["name", "description", "video_url"]);

#[derive(Debug, Deserialize, Validate)]
#[validate(schema(function = "validate_new_lesson_links"))]
pub struct CreateLesson {
    pub course: i32,
    #[validate(length(min = 1, max = 250))]
    pub name: String,
    pub description: String,
    pub preview: Option<String>,
    pub video_url: Option<String>,
}

impl TextFields for CreateLesson {
    fn text_field(&self, name: &str) -> Option<&str> {
        match name {
            "name" => Some(&self.name),
            "description" => Some(&self.description),
            "video_url" => self.video_url.as_deref(),
            _ => None,
        }
    }
}

fn validate_new_lesson_links(lesson: &CreateLesson) -> Result<(), ValidationError> {
    LESSON_LINKS.validate(lesson)
}

/// Body of both PUT and PATCH. There is no `course` field: lessons stay in
/// the course they were created in.
#[derive(Debug, Deserialize, Validate)]
#[validate(schema(function = "validate_lesson_change_links"))]
pub struct UpdateLesson {
    #[validate(length(min = 1, max = 250))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "nullable::deserialize")]
    pub preview: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable::deserialize")]
    pub video_url: Option<Option<String>>,
}

impl TextFields for UpdateLesson {
    fn text_field(&self, name: &str) -> Option<&str> {
        match name {
            "name" => self.name.as_deref(),
            "description" => self.description.as_deref(),
            "video_url" => self.video_url.as_ref().and_then(Option::as_deref),
            _ => None,
        }
    }
}

fn validate_lesson_change_links(lesson: &UpdateLesson) -> Result<(), ValidationError> {
    LESSON_LINKS.validate(lesson)
}

#[derive(Debug, Serialize)]
pub struct LessonView {
    pub id: i32,
    pub course: i32,
    pub name: String,
    pub description: String,
    pub preview: Option<String>,
    pub video_url: Option<String>,
    pub owner: Option<i32>,
}

impl From<lesson::Model> for LessonView {
    fn from(lesson: lesson::Model) -> Self {
        Self {
            id: lesson.id,
            course: lesson.course_id,
            name: lesson.name,
            description: lesson.description,
            preview: lesson.preview,
            video_url: lesson.video_url,
            owner: lesson.owner_id,
        }
    }
}

async fn find_lesson(
    db: &DatabaseConnection,
    policy: &LessonPolicy,
    id: i32,
) -> Result<lesson::Model, RequestError> {
    lessons::find_visible(db, policy.scope(), id)
        .await?
        .ok_or(RequestError::NotFound)
}

pub async fn index(
    policy: LessonPolicy,
    State(db): State<DatabaseConnection>,
    pagination: Pagination,
) -> RequestResult {
    let page = pagination
        .fetch(&db, lessons::visible(policy.scope()))
        .await?
        .map(LessonView::from);

    Ok(RequestSuccess::Ok(json!(page)))
}

pub async fn create(
    policy: LessonPolicy,
    State(db): State<DatabaseConnection>,
    ValidatedJson(body): ValidatedJson<CreateLesson>,
) -> RequestResult {
    let principal = *policy.principal();

    let authorship = lessons::authorship(&db, body.course, principal.id)
        .await?
        .ok_or_else(|| RequestError::bad_request("Course does not exist."))?;

    authorize(&policy, Action::Create, &authorship)?;

    let lesson = lessons::insert(
        &db,
        principal.id,
        NewLesson {
            course_id: body.course,
            name: body.name,
            description: body.description,
            preview: body.preview,
            video_url: body.video_url,
        },
    )
    .await?;

    Ok(RequestSuccess::Created(json!(LessonView::from(lesson))))
}

pub async fn show(
    policy: LessonPolicy,
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
) -> RequestResult {
    let lesson = find_lesson(&db, &policy, id).await?;

    Ok(RequestSuccess::Ok(json!(LessonView::from(lesson))))
}

pub async fn update(
    policy: LessonPolicy,
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
    ValidatedJson(body): ValidatedJson<UpdateLesson>,
) -> RequestResult {
    let lesson = find_lesson(&db, &policy, id).await?;
    let authorship = lessons::authorship(&db, lesson.course_id, policy.principal().id)
        .await?
        .unwrap_or_default();

    authorize(&policy, Action::Update(&lesson), &authorship)?;

    let lesson = lessons::update(
        &db,
        lesson,
        LessonChanges {
            name: body.name,
            description: body.description,
            preview: body.preview,
            video_url: body.video_url,
        },
    )
    .await?;

    Ok(RequestSuccess::Ok(json!(LessonView::from(lesson))))
}

pub async fn destroy(
    policy: LessonPolicy,
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
) -> RequestResult {
    let lesson = find_lesson(&db, &policy, id).await?;
    let authorship = lessons::authorship(&db, lesson.course_id, policy.principal().id)
        .await?
        .unwrap_or_default();

    authorize(&policy, Action::Delete(&lesson), &authorship)?;

    lessons::delete(&db, lesson).await?;

    Ok(RequestSuccess::NoContent)
}
