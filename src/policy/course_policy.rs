use crate::auth::Principal;
use crate::database::models::course;
use crate::policy::{macros::policy_extractor, PermissionDenied, Policy, Verdict};

/// Courses: members create and manage their own, moderators may edit any
/// course but never create or delete one.
#[derive(Debug, Clone, Copy)]
pub struct CoursePolicy {
    principal: Principal,
}

impl CoursePolicy {
    #[must_use]
    pub const fn new(principal: Principal) -> Self {
        Self { principal }
    }
}

policy_extractor!(CoursePolicy);

impl Policy for CoursePolicy {
    type Entity = course::Entity;
    type Context = ();

    fn principal(&self) -> &Principal {
        &self.principal
    }

    fn can_create(&self, (): &()) -> Verdict {
        if self.principal.is_moderator() {
            return Err(PermissionDenied::new("Moderators cannot create courses."));
        }

        Ok(())
    }

    fn can_update(&self, course: &course::Model, (): &()) -> Verdict {
        if self.principal.is_moderator() || self.principal.owns(course.owner_id) {
            Ok(())
        } else {
            Err(PermissionDenied::new("Only the owner or a moderator can edit this course."))
        }
    }

    fn can_delete(&self, course: &course::Model, (): &()) -> Verdict {
        if self.principal.owns(course.owner_id) {
            Ok(())
        } else {
            Err(PermissionDenied::new("Only the owner can delete this course."))
        }
    }
}
