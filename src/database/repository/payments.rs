use std::str::FromStr;

use chrono::NaiveDateTime;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QueryTrait, Select,
};

use crate::database::models::{payment, payment_method::PaymentMethod};
use crate::policy::Scope;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentOrdering {
    DateAscending,
    DateDescending,
}

impl FromStr for PaymentOrdering {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "date" => Ok(Self::DateAscending),
            "-date" => Ok(Self::DateDescending),
            other => Err(format!("Unknown ordering '{other}'. Use 'date' or '-date'.")),
        }
    }
}

/// Optional narrowing of the payment list; every set field must match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaymentFilter {
    pub course: Option<i32>,
    pub lesson: Option<i32>,
    pub owner: Option<i32>,
    pub method: Option<PaymentMethod>,
    pub ordering: Option<PaymentOrdering>,
}

#[derive(Debug, Clone)]
pub struct NewPayment {
    /// Defaults to now
    pub date: Option<NaiveDateTime>,
    pub amount: i64,
    pub method: PaymentMethod,
    pub course_id: Option<i32>,
    pub lesson_id: Option<i32>,
}

/// Payments inside `scope` matching `filter`. Unordered requests come back by
/// id; date orderings break ties by id so pages stay stable.
pub fn visible(scope: Scope, filter: &PaymentFilter) -> Select<payment::Entity> {
    let query = payment::Entity::find()
        .apply_if(filter.course, |query, course| {
            query.filter(payment::Column::CourseId.eq(course))
        })
        .apply_if(filter.lesson, |query, lesson| {
            query.filter(payment::Column::LessonId.eq(lesson))
        })
        .apply_if(filter.owner, |query, owner| {
            query.filter(payment::Column::OwnerId.eq(owner))
        })
        .apply_if(filter.method, |query, method| {
            query.filter(payment::Column::Method.eq(method))
        });

    let query = match filter.ordering {
        Some(PaymentOrdering::DateAscending) => query.order_by_asc(payment::Column::Date),
        Some(PaymentOrdering::DateDescending) => query.order_by_desc(payment::Column::Date),
        None => query,
    }
    .order_by_asc(payment::Column::Id);

    scope.apply(query)
}

pub async fn find_visible<C: ConnectionTrait>(
    db: &C,
    scope: Scope,
    id: i32,
) -> Result<Option<payment::Model>, DbErr> {
    visible(scope, &PaymentFilter::default())
        .filter(payment::Column::Id.eq(id))
        .one(db)
        .await
}

/// Payment history of one user, most recent first.
pub async fn for_owner<C: ConnectionTrait>(
    db: &C,
    owner_id: i32,
) -> Result<Vec<payment::Model>, DbErr> {
    payment::Entity::find()
        .filter(payment::Column::OwnerId.eq(owner_id))
        .order_by_desc(payment::Column::Date)
        .order_by_asc(payment::Column::Id)
        .all(db)
        .await
}

pub async fn insert<C: ConnectionTrait>(
    db: &C,
    owner_id: i32,
    new_payment: NewPayment,
) -> Result<payment::Model, DbErr> {
    payment::ActiveModel {
        date: Set(new_payment.date.unwrap_or_else(super::now)),
        amount: Set(new_payment.amount),
        method: Set(new_payment.method),
        course_id: Set(new_payment.course_id),
        lesson_id: Set(new_payment.lesson_id),
        owner_id: Set(Some(owner_id)),
        ..Default::default()
    }
    .insert(db)
    .await
}

#[cfg(test)]
mod tests {
    use sea_orm::DbBackend;

    use super::*;

    fn sql(scope: Scope, filter: &PaymentFilter) -> String {
        visible(scope, filter).build(DbBackend::Postgres).to_string()
    }

    #[test]
    fn parses_orderings() {
        assert_eq!("date".parse::<PaymentOrdering>(), Ok(PaymentOrdering::DateAscending));
        assert_eq!("-date".parse::<PaymentOrdering>(), Ok(PaymentOrdering::DateDescending));
        assert!("amount".parse::<PaymentOrdering>().is_err());
    }

    #[test]
    fn filters_by_method_and_course() {
        let sql = sql(
            Scope::Everything,
            &PaymentFilter {
                course: Some(3),
                method: Some(PaymentMethod::Cash),
                ..Default::default()
            },
        );

        assert!(sql.contains(r#""payments"."course_id" = 3"#), "{sql}");
        assert!(sql.contains(r#""payments"."method" = 'CASH'"#), "{sql}");
        assert!(!sql.contains("lesson_id\" ="), "{sql}");
    }

    #[test]
    fn orders_by_date_descending_then_id() {
        let sql = sql(
            Scope::OwnedBy(1),
            &PaymentFilter {
                ordering: Some(PaymentOrdering::DateDescending),
                ..Default::default()
            },
        );

        assert!(
            sql.ends_with(r#"ORDER BY "payments"."date" DESC, "payments"."id" ASC"#),
            "{sql}"
        );
        assert!(sql.contains(r#""payments"."owner_id" = 1"#), "{sql}");
    }
}
