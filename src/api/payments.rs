use axum::extract::{Path, Query, State};
use chrono::NaiveDateTime;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use serde_json::json;
use validator::Validate;

use crate::api::{pagination::Pagination, validated_json::ValidatedJson};
use crate::auth::prelude::*;
use crate::database::{
    models::{payment, payment_method::PaymentMethod},
    repository::{
        courses, lessons,
        payments::{self, NewPayment, PaymentFilter, PaymentOrdering},
    },
};
use crate::policy::PaymentPolicy;

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePayment {
    pub date: Option<NaiveDateTime>,
    #[validate(range(min = 0))]
    pub amount: i64,
    pub method: PaymentMethod,
    pub course: Option<i32>,
    pub lesson: Option<i32>,
}

/// `?course=&lesson=&owner=&method=&ordering=` on the payment list.
#[derive(Debug, Deserialize)]
pub struct PaymentQuery {
    pub course: Option<i32>,
    pub lesson: Option<i32>,
    pub owner: Option<i32>,
    pub method: Option<PaymentMethod>,
    pub ordering: Option<String>,
}

impl TryFrom<PaymentQuery> for PaymentFilter {
    type Error = RequestError;

    fn try_from(query: PaymentQuery) -> Result<Self, Self::Error> {
        let ordering = query
            .ordering
            .as_deref()
            .map(str::parse::<PaymentOrdering>)
            .transpose()
            .map_err(RequestError::BadRequest)?;

        Ok(Self {
            course: query.course,
            lesson: query.lesson,
            owner: query.owner,
            method: query.method,
            ordering,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct PaymentView {
    pub id: i32,
    pub date: NaiveDateTime,
    pub amount: i64,
    pub method: PaymentMethod,
    pub course: Option<i32>,
    pub lesson: Option<i32>,
    pub owner: Option<i32>,
}

impl From<payment::Model> for PaymentView {
    fn from(payment: payment::Model) -> Self {
        Self {
            id: payment.id,
            date: payment.date,
            amount: payment.amount,
            method: payment.method,
            course: payment.course_id,
            lesson: payment.lesson_id,
            owner: payment.owner_id,
        }
    }
}

pub async fn index(
    policy: PaymentPolicy,
    State(db): State<DatabaseConnection>,
    pagination: Pagination,
    Query(query): Query<PaymentQuery>,
) -> RequestResult {
    let filter = PaymentFilter::try_from(query)?;

    let page = pagination
        .fetch(&db, payments::visible(policy.scope(), &filter))
        .await?
        .map(PaymentView::from);

    Ok(RequestSuccess::Ok(json!(page)))
}

pub async fn create(
    policy: PaymentPolicy,
    State(db): State<DatabaseConnection>,
    ValidatedJson(body): ValidatedJson<CreatePayment>,
) -> RequestResult {
    authorize(&policy, Action::Create, &())?;

    if let Some(course_id) = body.course {
        if !courses::exists(&db, course_id).await? {
            return Err(RequestError::bad_request("Course does not exist."));
        }
    }
    if let Some(lesson_id) = body.lesson {
        if !lessons::exists(&db, lesson_id).await? {
            return Err(RequestError::bad_request("Lesson does not exist."));
        }
    }

    let payment = payments::insert(
        &db,
        policy.principal().id,
        NewPayment {
            date: body.date,
            amount: body.amount,
            method: body.method,
            course_id: body.course,
            lesson_id: body.lesson,
        },
    )
    .await?;

    Ok(RequestSuccess::Created(json!(PaymentView::from(payment))))
}

pub async fn show(
    policy: PaymentPolicy,
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
) -> RequestResult {
    let payment = payments::find_visible(&db, policy.scope(), id)
        .await?
        .ok_or(RequestError::NotFound)?;

    Ok(RequestSuccess::Ok(json!(PaymentView::from(payment))))
}
