//! Test harness: an app wired to a private in-memory SQLite database.
//!
//! Every call to [`setup_test`] migrates a fresh database, so tests never see
//! each other's rows and can run in parallel.

use axum::http::StatusCode;
use sea_orm::{ConnectOptions, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use tracing::debug;

use crate::{
    app::App,
    auth::jwt,
    boot::read_config,
    config::Config,
    database::{
        migrations::Migrator,
        models::{course, lesson, payment, payment_method::PaymentMethod, role::Role, subscription, user},
        repository::{courses, lessons, payments, subscriptions, users},
    },
    environment::Environment,
    router::router,
};

static TRACING_INITIALIZED: std::sync::Once = std::sync::Once::new();

/// Initialize tracing for tests; `RUST_LOG` controls the output.
fn init_tracing() {
    TRACING_INITIALIZED.call_once(|| {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

        let _ = tracing_subscriber::registry()
            .with(EnvFilter::from_default_env())
            .with(tracing_subscriber::fmt::layer().with_test_writer())
            .try_init();
    });
}

/// A migrated in-memory database behind a single pooled connection.
///
/// One connection keeps the database alive for the lifetime of the pool and
/// makes every query, from tests and handlers alike, see the same data.
///
/// # Panics
///
/// Panics if the database cannot be opened or migrated.
pub async fn memory_database() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.sqlx_logging(false);
    options.max_connections(1);
    options.min_connections(1);

    let db = sea_orm::Database::connect(options)
        .await
        .expect("Failed to open in-memory database");

    Migrator::up(&db, None)
        .await
        .expect("Database migrations failed");

    db
}

/// Creates a test server for HTTP-level tests.
///
/// # Panics
///
/// Panics if configuration, database setup or the test server fail.
pub async fn setup_test() -> TestUtils {
    init_tracing();

    debug!("Setting up test");

    let config = read_config(Environment::Test).expect("Failed to read test configuration");
    let db = memory_database().await;

    let app = App {
        config: config.clone(),
        environment: Environment::Test,
        db: db.clone(),
    };

    let server = axum_test::TestServer::new(router(app)).expect("Failed to create test server");

    TestUtils { server, db, config }
}

/// Test server plus direct database access for arranging fixtures.
pub struct TestUtils {
    pub server: axum_test::TestServer,
    pub db: DatabaseConnection,
    pub config: Config,
}

impl TestUtils {
    /// Insert a user with an unusable password hash. Use [`Self::token_for`]
    /// to authenticate as them.
    pub async fn create_user(&self, email: &str, role: Role) -> user::Model {
        let user = users::insert(
            &self.db,
            users::NewUser {
                email: email.to_string(),
                password_hash: "!".to_string(),
                first_name: email.split('@').next().unwrap_or(email).to_string(),
                last_name: String::new(),
                phone: None,
                city: None,
                avatar: None,
            },
        )
        .await
        .expect("Failed to insert user");

        users::set_role(&self.db, user, role)
            .await
            .expect("Failed to set role")
    }

    pub async fn member(&self, email: &str) -> user::Model {
        self.create_user(email, Role::Member).await
    }

    pub async fn moderator(&self, email: &str) -> user::Model {
        self.create_user(email, Role::Moderator).await
    }

    pub fn token_for(&self, user: &user::Model) -> String {
        jwt::generate_token(&self.config.jwt, user.id).expect("Failed to sign token")
    }

    pub async fn create_course(&self, owner: &user::Model, name: &str) -> course::Model {
        courses::insert(
            &self.db,
            owner.id,
            courses::NewCourse {
                name: name.to_string(),
                description: format!("All about {name}"),
                preview: None,
            },
        )
        .await
        .expect("Failed to insert course")
    }

    pub async fn create_lesson(
        &self,
        owner: &user::Model,
        course: &course::Model,
        name: &str,
    ) -> lesson::Model {
        lessons::insert(
            &self.db,
            owner.id,
            lessons::NewLesson {
                course_id: course.id,
                name: name.to_string(),
                description: format!("Lesson {name}"),
                preview: None,
                video_url: None,
            },
        )
        .await
        .expect("Failed to insert lesson")
    }

    pub async fn create_payment(
        &self,
        owner: &user::Model,
        course: Option<&course::Model>,
        amount: i64,
        method: PaymentMethod,
        date: &str,
    ) -> payment::Model {
        payments::insert(
            &self.db,
            owner.id,
            payments::NewPayment {
                date: Some(date.parse().expect("date must look like 2024-01-31T10:00:00")),
                amount,
                method,
                course_id: course.map(|course| course.id),
                lesson_id: None,
            },
        )
        .await
        .expect("Failed to insert payment")
    }

    pub async fn create_subscription(
        &self,
        user: &user::Model,
        course: &course::Model,
        is_subscribed: bool,
    ) -> subscription::Model {
        subscriptions::insert(&self.db, user.id, course.id, is_subscribed)
            .await
            .expect("Failed to insert subscription")
    }
}

/// Assert the status and decode the JSON body in one step.
pub fn json_body(response: &axum_test::TestResponse, status: StatusCode) -> serde_json::Value {
    response.assert_status(status);
    response.json::<serde_json::Value>()
}
