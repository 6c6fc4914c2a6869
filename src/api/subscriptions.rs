use axum::extract::{Path, State};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use serde_json::json;
use validator::Validate;

use crate::api::{
    pagination::Pagination, unique_constraint::unique_violation_as,
    validated_json::ValidatedJson,
};
use crate::auth::prelude::*;
use crate::database::{
    models::subscription,
    repository::{courses, subscriptions},
};
use crate::policy::SubscriptionPolicy;

const ALREADY_SUBSCRIBED: &str = "You already have a subscription for this course.";

/// Any `user` sent by the client is ignored; the subscriber is always the
/// caller. `course` is required even though the column is nullable: a
/// subscription without a course has nothing to toggle, and the unique
/// (user, course) index does not cover NULL courses.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateSubscription {
    pub course: i32,
    #[serde(default)]
    pub is_subscribed: bool,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateSubscription {
    pub is_subscribed: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct SubscriptionView {
    pub id: i32,
    pub user: i32,
    pub course: Option<i32>,
    pub is_subscribed: bool,
}

impl From<subscription::Model> for SubscriptionView {
    fn from(subscription: subscription::Model) -> Self {
        Self {
            id: subscription.id,
            user: subscription.user_id,
            course: subscription.course_id,
            is_subscribed: subscription.is_subscribed,
        }
    }
}

async fn find_subscription(
    db: &DatabaseConnection,
    policy: &SubscriptionPolicy,
    id: i32,
) -> Result<subscription::Model, RequestError> {
    subscriptions::find_visible(db, policy.scope(), id)
        .await?
        .ok_or(RequestError::NotFound)
}

pub async fn index(
    policy: SubscriptionPolicy,
    State(db): State<DatabaseConnection>,
    pagination: Pagination,
) -> RequestResult {
    let page = pagination
        .fetch(&db, subscriptions::visible(policy.scope()))
        .await?
        .map(SubscriptionView::from);

    Ok(RequestSuccess::Ok(json!(page)))
}

pub async fn create(
    policy: SubscriptionPolicy,
    State(db): State<DatabaseConnection>,
    ValidatedJson(body): ValidatedJson<CreateSubscription>,
) -> RequestResult {
    authorize(&policy, Action::Create, &())?;

    let user_id = policy.principal().id;

    if !courses::exists(&db, body.course).await? {
        return Err(RequestError::bad_request("Course does not exist."));
    }
    if subscriptions::exists_for(&db, user_id, body.course).await? {
        return Err(RequestError::bad_request(ALREADY_SUBSCRIBED));
    }

    // A concurrent request can still slip past the check above; the unique
    // index catches it.
    let subscription = subscriptions::insert(&db, user_id, body.course, body.is_subscribed)
        .await
        .map_err(unique_violation_as(ALREADY_SUBSCRIBED))?;

    Ok(RequestSuccess::Created(json!(SubscriptionView::from(subscription))))
}

pub async fn show(
    policy: SubscriptionPolicy,
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
) -> RequestResult {
    let subscription = find_subscription(&db, &policy, id).await?;

    Ok(RequestSuccess::Ok(json!(SubscriptionView::from(subscription))))
}

pub async fn update(
    policy: SubscriptionPolicy,
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
    ValidatedJson(body): ValidatedJson<UpdateSubscription>,
) -> RequestResult {
    let subscription = find_subscription(&db, &policy, id).await?;

    authorize(&policy, Action::Update(&subscription), &())?;

    let subscription = match body.is_subscribed {
        Some(flag) => subscriptions::set_subscribed(&db, subscription, flag).await?,
        None => subscription,
    };

    Ok(RequestSuccess::Ok(json!(SubscriptionView::from(subscription))))
}

pub async fn destroy(
    policy: SubscriptionPolicy,
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
) -> RequestResult {
    let subscription = find_subscription(&db, &policy, id).await?;

    authorize(&policy, Action::Delete(&subscription), &())?;

    subscriptions::delete(&db, subscription).await?;

    Ok(RequestSuccess::NoContent)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::tests::setup_test::{json_body, setup_test};

    #[tokio::test]
    async fn test_subscription_toggles_in_place() {
        let t = setup_test().await;
        let alice = t.member("alice@example.com").await;
        let course = t.create_course(&alice, "TEST").await;
        let token = t.token_for(&alice);

        let created = json_body(
            &t.server
                .post("/api/subscriptions")
                .authorization_bearer(&token)
                .json(&json!({ "course": course.id, "is_subscribed": false }))
                .await,
            StatusCode::CREATED,
        );
        assert_eq!(created["user"], alice.id);
        assert_eq!(created["is_subscribed"], false);

        let list = json_body(
            &t.server.get("/api/subscriptions").authorization_bearer(&token).await,
            StatusCode::OK,
        );
        assert_eq!(list["count"], 1);

        let path = format!("/api/subscriptions/{}", created["id"]);

        for flag in [true, false] {
            let updated = json_body(
                &t.server
                    .patch(&path)
                    .authorization_bearer(&token)
                    .json(&json!({ "is_subscribed": flag }))
                    .await,
                StatusCode::OK,
            );
            assert_eq!(updated["id"], created["id"]);
            assert_eq!(updated["is_subscribed"], flag);

            let list = json_body(
                &t.server.get("/api/subscriptions").authorization_bearer(&token).await,
                StatusCode::OK,
            );
            assert_eq!(list["count"], 1);
            assert_eq!(list["results"][0]["is_subscribed"], flag);
        }
    }

    #[tokio::test]
    async fn test_second_subscription_for_course_is_rejected() {
        let t = setup_test().await;
        let alice = t.member("alice@example.com").await;
        let course = t.create_course(&alice, "TEST").await;
        t.create_subscription(&alice, &course, true).await;

        let body = json_body(
            &t.server
                .post("/api/subscriptions")
                .authorization_bearer(t.token_for(&alice))
                .json(&json!({ "course": course.id }))
                .await,
            StatusCode::BAD_REQUEST,
        );
        assert_eq!(body["detail"], super::ALREADY_SUBSCRIBED);
    }

    #[tokio::test]
    async fn test_subscriber_is_always_the_caller() {
        let t = setup_test().await;
        let alice = t.member("alice@example.com").await;
        let bob = t.member("bob@example.com").await;
        let course = t.create_course(&alice, "TEST").await;

        let body = json_body(
            &t.server
                .post("/api/subscriptions")
                .authorization_bearer(t.token_for(&bob))
                .json(&json!({ "course": course.id, "user": alice.id, "is_subscribed": true }))
                .await,
            StatusCode::CREATED,
        );
        assert_eq!(body["user"], bob.id);
    }

    #[tokio::test]
    async fn test_others_subscriptions_are_hidden_even_from_moderators() {
        let t = setup_test().await;
        let alice = t.member("alice@example.com").await;
        let moderator = t.moderator("mod@example.com").await;
        let course = t.create_course(&alice, "TEST").await;
        let subscription = t.create_subscription(&alice, &course, true).await;
        let path = format!("/api/subscriptions/{}", subscription.id);
        let token = t.token_for(&moderator);

        let list = json_body(
            &t.server.get("/api/subscriptions").authorization_bearer(&token).await,
            StatusCode::OK,
        );
        assert_eq!(list["count"], 0);

        t.server
            .patch(&path)
            .authorization_bearer(&token)
            .json(&json!({ "is_subscribed": false }))
            .await
            .assert_status(StatusCode::NOT_FOUND);

        t.server
            .delete(&path)
            .authorization_bearer(&token)
            .await
            .assert_status(StatusCode::NOT_FOUND);

        t.server
            .delete(&path)
            .authorization_bearer(t.token_for(&alice))
            .await
            .assert_status(StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_subscription_requires_a_course() {
        let t = setup_test().await;
        let alice = t.member("alice@example.com").await;

        t.server
            .post("/api/subscriptions")
            .authorization_bearer(t.token_for(&alice))
            .json(&json!({ "is_subscribed": true }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_subscription_to_missing_course_is_bad_request() {
        let t = setup_test().await;
        let alice = t.member("alice@example.com").await;

        t.server
            .post("/api/subscriptions")
            .authorization_bearer(t.token_for(&alice))
            .json(&json!({ "course": 12345 }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }
}
