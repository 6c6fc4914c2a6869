use sea_orm::{ColumnTrait, QueryFilter, Select};

use crate::auth::Principal;
use crate::database::models::OwnedEntity;

/// The set of rows a principal is allowed to see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Everything,
    OwnedBy(i32),
}

impl Scope {
    #[must_use]
    pub const fn for_principal(principal: &Principal) -> Self {
        if principal.is_moderator() {
            Self::Everything
        } else {
            Self::OwnedBy(principal.id)
        }
    }

    /// Restrict `query` to this scope. Ordering and other clauses already on
    /// the query are left alone.
    #[must_use]
    pub fn apply<E: OwnedEntity>(self, query: Select<E>) -> Select<E> {
        match self {
            Self::Everything => query,
            Self::OwnedBy(owner) => query.filter(E::owner_column().eq(owner)),
        }
    }

    #[must_use]
    pub fn admits<E: OwnedEntity>(self, model: &E::Model) -> bool {
        match self {
            Self::Everything => true,
            Self::OwnedBy(owner) => E::owner_of(model) == Some(owner),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDateTime;
    use sea_orm::{DbBackend, EntityTrait, QueryTrait};

    use super::*;
    use crate::database::models::{course, role::Role};

    fn course_owned_by(owner_id: Option<i32>) -> course::Model {
        course::Model {
            id: 1,
            name: "Rust".to_string(),
            description: "Ownership".to_string(),
            preview: None,
            owner_id,
            created_at: NaiveDateTime::default(),
        }
    }

    #[test]
    fn moderators_see_everything() {
        let scope = Scope::for_principal(&Principal::new(9, Role::Moderator));

        assert_eq!(scope, Scope::Everything);
        assert!(scope.admits::<course::Entity>(&course_owned_by(None)));
        assert!(scope.admits::<course::Entity>(&course_owned_by(Some(1))));
    }

    #[test]
    fn members_see_only_their_own_rows() {
        let scope = Scope::for_principal(&Principal::new(1, Role::Member));

        assert_eq!(scope, Scope::OwnedBy(1));
        assert!(scope.admits::<course::Entity>(&course_owned_by(Some(1))));
        assert!(!scope.admits::<course::Entity>(&course_owned_by(Some(2))));
        assert!(!scope.admits::<course::Entity>(&course_owned_by(None)));
    }

    #[test]
    fn apply_filters_on_the_owner_column() {
        let sql = Scope::OwnedBy(5)
            .apply(course::Entity::find())
            .build(DbBackend::Postgres)
            .to_string();

        assert!(sql.contains(r#""courses"."owner_id" = 5"#), "{sql}");
    }

    #[test]
    fn everything_leaves_the_query_untouched() {
        let sql = Scope::Everything
            .apply(course::Entity::find())
            .build(DbBackend::Postgres)
            .to_string();

        assert!(!sql.contains("WHERE"), "{sql}");
    }
}
