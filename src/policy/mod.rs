//! Authorization: who may see which rows, and who may change them.
//!
//! Reads are narrowed by a [`Scope`] before they reach the database, so a row
//! outside the principal's scope is indistinguishable from a missing one.
//! Writes are decided by [`authorize`], the single gate every handler calls
//! before touching the database.

pub mod course_policy;
pub mod lesson_policy;
pub mod macros;
pub mod payment_policy;
pub mod scope;
pub mod subscription_policy;
pub mod user_policy;

use sea_orm::{EntityName, EntityTrait};
use tracing::debug;

use crate::auth::Principal;
use crate::database::models::OwnedEntity;

pub use course_policy::CoursePolicy;
pub use lesson_policy::{CourseAuthorship, LessonPolicy};
pub use payment_policy::PaymentPolicy;
pub use scope::Scope;
pub use subscription_policy::SubscriptionPolicy;
pub use user_policy::UserPolicy;

/// Model type guarded by policy `P`.
pub type ModelOf<P> = <<P as Policy>::Entity as EntityTrait>::Model;

/// Refusal returned by the gate. `reason` is shown to the client verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{reason}")]
pub struct PermissionDenied {
    pub reason: &'static str,
}

impl PermissionDenied {
    #[must_use]
    pub const fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

pub type Verdict = Result<(), PermissionDenied>;

/// A write the gate can be asked about.
#[derive(Debug)]
pub enum Action<'a, M> {
    Create,
    Update(&'a M),
    Delete(&'a M),
}

impl<M> Action<'_, M> {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update(_) => "update",
            Self::Delete(_) => "delete",
        }
    }
}

/// Per-entity authorization rules.
///
/// One implementation exists per owned entity. Read access comes from
/// [`Policy::scope`]; the `can_*` methods decide writes and are only ever
/// consulted through [`authorize`].
///
/// `Context` carries facts the decision needs that are not on the row itself,
/// e.g. whether the principal already authored a lesson in the target course.
///
/// # Example
/// ```rust,ignore
/// impl Policy for CoursePolicy {
///     type Entity = course::Entity;
///     type Context = ();
///
///     fn principal(&self) -> &Principal {
///         &self.principal
///     }
///
///     fn can_create(&self, _: &()) -> Verdict {
///         if self.principal.is_moderator() {
///             return Err(PermissionDenied::new("Moderators cannot create courses."));
///         }
///         Ok(())
///     }
///
///     fn can_update(&self, course: &course::Model, _: &()) -> Verdict {
///         ...
///     }
/// }
/// ```
pub trait Policy {
    type Entity: OwnedEntity;
    type Context;

    fn principal(&self) -> &Principal;

    /// Rows this principal may see. Moderators see everything, everyone else
    /// only what they own.
    fn scope(&self) -> Scope {
        Scope::for_principal(self.principal())
    }

    fn can_read(&self, entity: &ModelOf<Self>) -> bool {
        self.scope().admits::<Self::Entity>(entity)
    }

    fn can_create(&self, context: &Self::Context) -> Verdict;

    fn can_update(&self, entity: &ModelOf<Self>, context: &Self::Context) -> Verdict;

    /// Defaults to the update rule.
    fn can_delete(&self, entity: &ModelOf<Self>, context: &Self::Context) -> Verdict {
        self.can_update(entity, context)
    }
}

/// Decide whether the policy's principal may perform `action`.
///
/// Every create, update and delete in the API goes through here, before any
/// write is issued.
///
/// # Errors
/// Returns [`PermissionDenied`] with a client-facing reason when the action
/// is not allowed.
pub fn authorize<P: Policy>(
    policy: &P,
    action: Action<'_, ModelOf<P>>,
    context: &P::Context,
) -> Verdict {
    let action_name = action.name();

    let verdict = match action {
        Action::Create => policy.can_create(context),
        Action::Update(entity) => policy.can_update(entity, context),
        Action::Delete(entity) => policy.can_delete(entity, context),
    };

    if let Err(denied) = &verdict {
        debug!(
            "Denied {} on {} for user {}: {}",
            action_name,
            P::Entity::default().table_name(),
            policy.principal().id,
            denied.reason
        );
    }

    verdict
}
