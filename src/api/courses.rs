use std::collections::HashMap;

use axum::extract::{Path, State};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use serde_json::json;
use validator::{Validate, ValidationError};

use crate::api::{nullable, pagination::Pagination, validated_json::ValidatedJson};
use crate::auth::prelude::*;
use crate::database::{
    models::course,
    repository::courses::{self, CourseChanges, NewCourse},
};
use crate::link_validator::{LinkValidator, TextFields};
use crate::policy::CoursePolicy;

const COURSE_LINKS: LinkValidator = LinkValidator::new(&["name", "description"]);

#[derive(Debug, Deserialize, Validate)]
#[validate(schema(function = "validate_new_course_links"))]
pub struct CreateCourse {
    #[validate(length(min = 1, max = 250))]
    pub name: String,
    pub description: String,
    pub preview: Option<String>,
}

impl TextFields for CreateCourse {
    fn text_field(&self, name: &str) -> Option<&str> {
        match name {
            "name" => Some(&self.name),
            "description" => Some(&self.description),
            _ => None,
        }
    }
}

fn validate_new_course_links(course: &CreateCourse) -> Result<(), ValidationError> {
    COURSE_LINKS.validate(course)
}

/// Body of both PUT and PATCH: absent fields keep their value.
#[derive(Debug, Deserialize, Validate)]
#[validate(schema(function = "validate_course_change_links"))]
pub struct UpdateCourse {
    #[validate(length(min = 1, max = 250))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "nullable::deserialize")]
    pub preview: Option<Option<String>>,
}

impl TextFields for UpdateCourse {
    fn text_field(&self, name: &str) -> Option<&str> {
        match name {
            "name" => self.name.as_deref(),
            "description" => self.description.as_deref(),
            _ => None,
        }
    }
}

fn validate_course_change_links(course: &UpdateCourse) -> Result<(), ValidationError> {
    COURSE_LINKS.validate(course)
}

#[derive(Debug, Serialize)]
pub struct CourseView {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub preview: Option<String>,
    pub owner: Option<i32>,
    pub lessons_count: usize,
    pub lessons: Vec<String>,
}

impl CourseView {
    fn new(course: course::Model, lessons: Vec<String>) -> Self {
        Self {
            id: course.id,
            name: course.name,
            description: course.description,
            preview: course.preview,
            owner: course.owner_id,
            lessons_count: lessons.len(),
            lessons,
        }
    }
}

async fn render_one(db: &DatabaseConnection, course: course::Model) -> RequestResult {
    let mut lessons = courses::lesson_names(db, &[course.id]).await?;
    let names = lessons.remove(&course.id).unwrap_or_default();

    Ok(RequestSuccess::Ok(json!(CourseView::new(course, names))))
}

pub async fn index(
    policy: CoursePolicy,
    State(db): State<DatabaseConnection>,
    pagination: Pagination,
) -> RequestResult {
    let page = pagination
        .fetch(&db, courses::visible(policy.scope()))
        .await?;

    let ids: Vec<i32> = page.results.iter().map(|course| course.id).collect();
    let mut lessons: HashMap<i32, Vec<String>> = courses::lesson_names(&db, &ids).await?;

    let page = page.map(|course| {
        let names = lessons.remove(&course.id).unwrap_or_default();
        CourseView::new(course, names)
    });

    Ok(RequestSuccess::Ok(json!(page)))
}

pub async fn create(
    policy: CoursePolicy,
    State(db): State<DatabaseConnection>,
    ValidatedJson(body): ValidatedJson<CreateCourse>,
) -> RequestResult {
    authorize(&policy, Action::Create, &())?;

    let course = courses::insert(
        &db,
        policy.principal().id,
        NewCourse {
            name: body.name,
            description: body.description,
            preview: body.preview,
        },
    )
    .await?;

    Ok(RequestSuccess::Created(json!(CourseView::new(course, Vec::new()))))
}

pub async fn show(
    policy: CoursePolicy,
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
) -> RequestResult {
    let course = courses::find_visible(&db, policy.scope(), id)
        .await?
        .ok_or(RequestError::NotFound)?;

    render_one(&db, course).await
}

pub async fn update(
    policy: CoursePolicy,
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
    ValidatedJson(body): ValidatedJson<UpdateCourse>,
) -> RequestResult {
    let course = courses::find_visible(&db, policy.scope(), id)
        .await?
        .ok_or(RequestError::NotFound)?;

    authorize(&policy, Action::Update(&course), &())?;

    let course = courses::update(
        &db,
        course,
        CourseChanges {
            name: body.name,
            description: body.description,
            preview: body.preview,
        },
    )
    .await?;

    render_one(&db, course).await
}

pub async fn destroy(
    policy: CoursePolicy,
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
) -> RequestResult {
    let course = courses::find_visible(&db, policy.scope(), id)
        .await?
        .ok_or(RequestError::NotFound)?;

    authorize(&policy, Action::Delete(&course), &())?;

    courses::delete(&db, course).await?;

    Ok(RequestSuccess::NoContent)
}
