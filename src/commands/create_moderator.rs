use std::error::Error;

use sea_orm::ConnectionTrait;
use tracing::info;

use crate::{
    config::Config,
    database::{
        models::{role::Role, user},
        repository::users::{self, NewUser},
        setup_database_connection,
    },
    password::hash_password,
};

/// # Errors
/// Returns the connection, hashing or database error.
pub async fn handle_create_moderator_command(
    config: &Config,
    email: &str,
    password: &str,
) -> Result<(), Box<dyn Error>> {
    let db = setup_database_connection(&config.database).await?;

    let moderator = create_moderator(&db, email, password).await?;

    println!("✅ {} is a moderator (id {})", moderator.email, moderator.id);

    Ok(())
}

/// Register `email` as a moderator, or promote the existing account with that
/// email. An existing account keeps its password.
///
/// # Errors
/// Returns the hashing or database error.
pub async fn create_moderator<C: ConnectionTrait>(
    db: &C,
    email: &str,
    password: &str,
) -> Result<user::Model, Box<dyn Error>> {
    let email = email.trim().to_lowercase();

    let user = match users::find_by_email(db, &email).await? {
        Some(existing) => {
            info!("Promoting existing user {}", existing.id);
            existing
        }
        None => {
            let password_hash =
                hash_password(password).map_err(|e| format!("Failed to hash password: {e}"))?;

            users::insert(
                db,
                NewUser {
                    email,
                    password_hash,
                    first_name: "admin".to_string(),
                    last_name: "admin".to_string(),
                    phone: None,
                    city: None,
                    avatar: None,
                },
            )
            .await?
        }
    };

    Ok(users::set_role(db, user, Role::Moderator).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::password::verify_password;
    use crate::tests::setup_test::memory_database;

    #[tokio::test]
    async fn creates_a_new_moderator() {
        let db = memory_database().await;

        let moderator = create_moderator(&db, "Admin@Example.com", "s3cret-pass")
            .await
            .expect("moderator is created");

        assert_eq!(moderator.email, "admin@example.com");
        assert_eq!(moderator.role, Role::Moderator);
        assert!(verify_password("s3cret-pass", &moderator.password_hash).expect("hash readable"));
    }

    #[tokio::test]
    async fn promotes_an_existing_member() {
        let db = memory_database().await;
        let member = users::insert(
            &db,
            NewUser {
                email: "member@example.com".to_string(),
                password_hash: "!".to_string(),
                first_name: "Mia".to_string(),
                last_name: "Member".to_string(),
                phone: None,
                city: None,
                avatar: None,
            },
        )
        .await
        .expect("member is inserted");

        let promoted = create_moderator(&db, "member@example.com", "ignored")
            .await
            .expect("member is promoted");

        assert_eq!(promoted.id, member.id);
        assert_eq!(promoted.role, Role::Moderator);
        assert_eq!(promoted.password_hash, "!");
    }
}
