use sea_orm::EntityTrait;

pub mod course;
pub mod lesson;
pub mod payment;
pub mod payment_method;
pub mod role;
pub mod subscription;
pub mod user;

/// An entity whose rows point back at the user they belong to.
///
/// Visibility scoping and object-level checks both go through this trait, so
/// the ownership column is named exactly once per entity.
pub trait OwnedEntity: EntityTrait {
    fn owner_column() -> Self::Column;

    fn owner_of(model: &Self::Model) -> Option<i32>;
}

impl OwnedEntity for course::Entity {
    fn owner_column() -> Self::Column {
        course::Column::OwnerId
    }

    fn owner_of(model: &Self::Model) -> Option<i32> {
        model.owner_id
    }
}

impl OwnedEntity for lesson::Entity {
    fn owner_column() -> Self::Column {
        lesson::Column::OwnerId
    }

    fn owner_of(model: &Self::Model) -> Option<i32> {
        model.owner_id
    }
}

impl OwnedEntity for payment::Entity {
    fn owner_column() -> Self::Column {
        payment::Column::OwnerId
    }

    fn owner_of(model: &Self::Model) -> Option<i32> {
        model.owner_id
    }
}

impl OwnedEntity for subscription::Entity {
    fn owner_column() -> Self::Column {
        subscription::Column::UserId
    }

    fn owner_of(model: &Self::Model) -> Option<i32> {
        Some(model.user_id)
    }
}
