use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    ModelTrait, PaginatorTrait, QueryFilter, QueryOrder, Select,
};

use crate::database::models::subscription;
use crate::policy::Scope;

pub fn visible(scope: Scope) -> Select<subscription::Entity> {
    scope.apply(subscription::Entity::find().order_by_asc(subscription::Column::Id))
}

pub async fn find_visible<C: ConnectionTrait>(
    db: &C,
    scope: Scope,
    id: i32,
) -> Result<Option<subscription::Model>, DbErr> {
    visible(scope)
        .filter(subscription::Column::Id.eq(id))
        .one(db)
        .await
}

pub async fn exists_for<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
    course_id: i32,
) -> Result<bool, DbErr> {
    let count = subscription::Entity::find()
        .filter(subscription::Column::UserId.eq(user_id))
        .filter(subscription::Column::CourseId.eq(course_id))
        .count(db)
        .await?;

    Ok(count > 0)
}

pub async fn insert<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
    course_id: i32,
    is_subscribed: bool,
) -> Result<subscription::Model, DbErr> {
    subscription::ActiveModel {
        user_id: Set(user_id),
        course_id: Set(Some(course_id)),
        is_subscribed: Set(is_subscribed),
        ..Default::default()
    }
    .insert(db)
    .await
}

/// Set the flag. Either value is accepted from either state.
pub async fn set_subscribed<C: ConnectionTrait>(
    db: &C,
    subscription: subscription::Model,
    is_subscribed: bool,
) -> Result<subscription::Model, DbErr> {
    if subscription.is_subscribed == is_subscribed {
        return Ok(subscription);
    }

    let mut active: subscription::ActiveModel = subscription.into();
    active.is_subscribed = Set(is_subscribed);

    active.update(db).await
}

pub async fn delete<C: ConnectionTrait>(
    db: &C,
    subscription: subscription::Model,
) -> Result<(), DbErr> {
    subscription.delete(db).await?;

    Ok(())
}
