use axum::extract::{Path, State};
use chrono::NaiveDateTime;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use validator::Validate;

use crate::api::{
    nullable, payments::PaymentView, unique_constraint::unique_violation_as,
    validated_json::ValidatedJson,
};
use crate::auth::{jwt, prelude::*};
use crate::config::Config;
use crate::database::{
    models::{payment, role::Role, user},
    repository::{
        payments,
        users::{self, NewUser, UserChanges},
    },
};
use crate::password::{hash_password, verify_password};
use crate::policy::{user_policy::PROFILE_VIEW, UserPolicy};

const EMAIL_TAKEN: &str = "A user with this email already exists.";

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterUser {
    #[validate(email, length(max = 254))]
    pub email: String,
    #[validate(length(min = 8))]
    pub password: String,
    #[serde(default)]
    #[validate(length(max = 150))]
    pub first_name: String,
    #[serde(default)]
    #[validate(length(max = 150))]
    pub last_name: String,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub avatar: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct TokenRequest {
    pub email: String,
    pub password: String,
}

/// Body of both PUT and PATCH on a user.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUser {
    #[validate(length(max = 150))]
    pub first_name: Option<String>,
    #[validate(length(max = 150))]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "nullable::deserialize")]
    pub phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable::deserialize")]
    pub city: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable::deserialize")]
    pub avatar: Option<Option<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserView {
    /// Name and role, visible to anyone signed in
    Public,
    /// Every profile field plus payment history, only for the user themself
    Profile,
}

impl ViewEnum for UserView {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "public" => Some(Self::Public),
            PROFILE_VIEW => Some(Self::Profile),
            _ => None,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Profile => PROFILE_VIEW,
        }
    }

    fn default_view() -> Self {
        Self::Public
    }
}

/// A user with the payments the profile view lists.
pub struct UserRecord {
    pub user: user::Model,
    pub payments: Vec<payment::Model>,
}

#[derive(Serialize)]
struct PublicUser {
    id: i32,
    first_name: String,
    role: Role,
}

#[derive(Serialize)]
struct ProfileUser {
    id: i32,
    email: String,
    first_name: String,
    last_name: String,
    phone: Option<String>,
    city: Option<String>,
    avatar: Option<String>,
    role: Role,
    created_at: NaiveDateTime,
    payments: Vec<PaymentView>,
}

impl Renderer<UserRecord> for UserView {
    fn render(&self, record: UserRecord) -> serde_json::Value {
        let UserRecord { user, payments } = record;

        match self {
            Self::Public => json!(PublicUser {
                id: user.id,
                first_name: user.first_name,
                role: user.role,
            }),
            Self::Profile => json!(ProfileUser {
                id: user.id,
                email: user.email,
                first_name: user.first_name,
                last_name: user.last_name,
                phone: user.phone,
                city: user.city,
                avatar: user.avatar,
                role: user.role,
                created_at: user.created_at,
                payments: payments.into_iter().map(PaymentView::from).collect(),
            }),
        }
    }
}

async fn profile(db: &DatabaseConnection, user: user::Model) -> Result<UserRecord, RequestError> {
    let payments = payments::for_owner(db, user.id).await?;

    Ok(UserRecord { user, payments })
}

pub async fn register(
    State(db): State<DatabaseConnection>,
    ValidatedJson(body): ValidatedJson<RegisterUser>,
) -> RequestResult {
    let password_hash = hash_password(&body.password)
        .map_err(|e| RequestError::Internal(format!("Failed to hash password: {e}")))?;

    let user = users::insert(
        &db,
        NewUser {
            email: body.email.trim().to_lowercase(),
            password_hash,
            first_name: body.first_name,
            last_name: body.last_name,
            phone: body.phone,
            city: body.city,
            avatar: body.avatar,
        },
    )
    .await
    .map_err(unique_violation_as(EMAIL_TAKEN))?;

    info!("Registered user {}", user.id);

    Ok(RequestSuccess::Created(UserView::Profile.render(UserRecord {
        user,
        payments: Vec::new(),
    })))
}

pub async fn token(
    State(db): State<DatabaseConnection>,
    State(config): State<Config>,
    ValidatedJson(body): ValidatedJson<TokenRequest>,
) -> RequestResult {
    let user = users::find_by_email(&db, &body.email.trim().to_lowercase())
        .await?
        .ok_or(RequestError::Unauthorized)?;

    let valid = verify_password(&body.password, &user.password_hash).map_err(|e| {
        RequestError::Internal(format!("Stored password hash of user {} is unreadable: {e}", user.id))
    })?;
    if !valid {
        return Err(RequestError::Unauthorized);
    }

    let access = jwt::generate_token(&config.jwt, user.id).map_err(|e| {
        RequestError::Internal(format!("Failed to sign token for user {}: {e}", user.id))
    })?;

    Ok(RequestSuccess::Ok(json!({ "access": access })))
}

pub async fn show(
    policy: UserPolicy,
    view: ViewParam<UserView>,
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
) -> RequestResult {
    let user = users::find_by_id(&db, id)
        .await?
        .ok_or(RequestError::NotFound)?;

    policy.can_view(&user, view.name())?;

    let record = match view.inner() {
        UserView::Profile => profile(&db, user).await?,
        UserView::Public => UserRecord {
            user,
            payments: Vec::new(),
        },
    };

    Ok(RequestSuccess::Ok(view.render(record)))
}

pub async fn update(
    policy: UserPolicy,
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
    ValidatedJson(body): ValidatedJson<UpdateUser>,
) -> RequestResult {
    let user = users::find_by_id(&db, id)
        .await?
        .ok_or(RequestError::NotFound)?;

    policy.can_update(&user)?;

    let user = users::update(
        &db,
        user,
        UserChanges {
            first_name: body.first_name,
            last_name: body.last_name,
            phone: body.phone,
            city: body.city,
            avatar: body.avatar,
        },
    )
    .await?;

    Ok(RequestSuccess::Ok(UserView::Profile.render(profile(&db, user).await?)))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::database::models::payment_method::PaymentMethod;
    use crate::tests::setup_test::{json_body, setup_test};

    #[tokio::test]
    async fn test_register_then_sign_in() {
        let t = setup_test().await;

        let registered = json_body(
            &t.server
                .post("/api/users")
                .json(&json!({
                    "email": "Carol@Example.com",
                    "password": "correct horse",
                    "first_name": "Carol",
                }))
                .await,
            StatusCode::CREATED,
        );
        assert_eq!(registered["email"], "carol@example.com");
        assert_eq!(registered["role"], "member");
        assert!(registered.get("password_hash").is_none());

        let token = json_body(
            &t.server
                .post("/api/users/token")
                .json(&json!({ "email": "carol@example.com", "password": "correct horse" }))
                .await,
            StatusCode::OK,
        );
        let access = token["access"].as_str().unwrap_or_default().to_string();
        assert!(!access.is_empty());

        t.server
            .get("/api/courses")
            .authorization_bearer(access)
            .await
            .assert_status(StatusCode::OK);

        t.server
            .post("/api/users/token")
            .json(&json!({ "email": "carol@example.com", "password": "wrong horse" }))
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_registration_rejects_duplicates_and_short_passwords() {
        let t = setup_test().await;
        t.member("dave@example.com").await;

        let body = json_body(
            &t.server
                .post("/api/users")
                .json(&json!({ "email": "dave@example.com", "password": "long enough" }))
                .await,
            StatusCode::BAD_REQUEST,
        );
        assert_eq!(body["detail"], super::EMAIL_TAKEN);

        t.server
            .post("/api/users")
            .json(&json!({ "email": "erin@example.com", "password": "short" }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_profile_is_private() {
        let t = setup_test().await;
        let alice = t.member("alice@example.com").await;
        let bob = t.member("bob@example.com").await;
        t.create_payment(&alice, None, 100, PaymentMethod::Cash, "2025-01-01T09:00:00")
            .await;
        let path = format!("/api/users/{}", alice.id);

        let profile = json_body(
            &t.server
                .get(&path)
                .add_query_param("view", "profile")
                .authorization_bearer(t.token_for(&alice))
                .await,
            StatusCode::OK,
        );
        assert_eq!(profile["email"], "alice@example.com");
        assert_eq!(profile["payments"].as_array().map(Vec::len), Some(1));

        t.server
            .get(&path)
            .add_query_param("view", "profile")
            .authorization_bearer(t.token_for(&bob))
            .await
            .assert_status(StatusCode::FORBIDDEN);

        let public = json_body(
            &t.server.get(&path).authorization_bearer(t.token_for(&bob)).await,
            StatusCode::OK,
        );
        assert_eq!(public["id"], alice.id);
        assert!(public.get("email").is_none());
        assert!(public.get("payments").is_none());

        t.server
            .get(&path)
            .add_query_param("view", "everything")
            .authorization_bearer(t.token_for(&bob))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_users_edit_only_themselves() {
        let t = setup_test().await;
        let alice = t.member("alice@example.com").await;
        let bob = t.member("bob@example.com").await;
        let path = format!("/api/users/{}", alice.id);

        t.server
            .patch(&path)
            .authorization_bearer(t.token_for(&bob))
            .json(&json!({ "city": "Gdansk" }))
            .await
            .assert_status(StatusCode::FORBIDDEN);

        let body = json_body(
            &t.server
                .put(&path)
                .authorization_bearer(t.token_for(&alice))
                .json(&json!({ "city": "Krakow" }))
                .await,
            StatusCode::OK,
        );
        assert_eq!(body["city"], "Krakow");
        assert_eq!(body["first_name"], alice.first_name);

        let body = json_body(
            &t.server
                .patch(&path)
                .authorization_bearer(t.token_for(&alice))
                .json(&json!({ "city": null }))
                .await,
            StatusCode::OK,
        );
        assert_eq!(body["city"], serde_json::Value::Null);
        assert_eq!(body["first_name"], alice.first_name);
    }

    #[tokio::test]
    async fn test_user_endpoints_require_authentication() {
        let t = setup_test().await;
        let alice = t.member("alice@example.com").await;

        t.server
            .get(&format!("/api/users/{}", alice.id))
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }
}
