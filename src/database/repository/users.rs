use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    QueryFilter,
};

use crate::database::models::{role::Role, user};

#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub avatar: Option<String>,
}

/// Profile fields a user may change. Email and role are not among them.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// Contact fields are tri-state: `Some(None)` clears them
    pub phone: Option<Option<String>>,
    pub city: Option<Option<String>>,
    pub avatar: Option<Option<String>>,
}

pub async fn find_by_id<C: ConnectionTrait>(db: &C, id: i32) -> Result<Option<user::Model>, DbErr> {
    user::Entity::find_by_id(id).one(db).await
}

pub async fn find_by_email<C: ConnectionTrait>(
    db: &C,
    email: &str,
) -> Result<Option<user::Model>, DbErr> {
    user::Entity::find()
        .filter(user::Column::Email.eq(email))
        .one(db)
        .await
}

/// Register a member. Moderators are only ever promoted out of band.
pub async fn insert<C: ConnectionTrait>(db: &C, new_user: NewUser) -> Result<user::Model, DbErr> {
    user::ActiveModel {
        email: Set(new_user.email),
        password_hash: Set(new_user.password_hash),
        first_name: Set(new_user.first_name),
        last_name: Set(new_user.last_name),
        phone: Set(new_user.phone),
        city: Set(new_user.city),
        avatar: Set(new_user.avatar),
        role: Set(Role::Member),
        created_at: Set(super::now()),
        ..Default::default()
    }
    .insert(db)
    .await
}

pub async fn update<C: ConnectionTrait>(
    db: &C,
    user: user::Model,
    changes: UserChanges,
) -> Result<user::Model, DbErr> {
    let mut active: user::ActiveModel = user.clone().into();

    if let Some(first_name) = changes.first_name {
        active.first_name = Set(first_name);
    }
    if let Some(last_name) = changes.last_name {
        active.last_name = Set(last_name);
    }
    if let Some(phone) = changes.phone {
        active.phone = Set(phone);
    }
    if let Some(city) = changes.city {
        active.city = Set(city);
    }
    if let Some(avatar) = changes.avatar {
        active.avatar = Set(avatar);
    }

    if !active.is_changed() {
        return Ok(user);
    }

    active.update(db).await
}

/// Change a user's role. Only reachable from the CLI, never over HTTP.
pub async fn set_role<C: ConnectionTrait>(
    db: &C,
    user: user::Model,
    role: Role,
) -> Result<user::Model, DbErr> {
    if user.role == role {
        return Ok(user);
    }

    let mut active: user::ActiveModel = user.into();
    active.role = Set(role);
    active.update(db).await
}
