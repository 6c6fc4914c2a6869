use crate::auth::Principal;
use crate::database::models::lesson;
use crate::policy::{macros::policy_extractor, PermissionDenied, Policy, Verdict};

/// What the principal already has in the course a lesson belongs to.
///
/// Owning the course, or owning any lesson in it, makes the principal a
/// co-author who may add and edit lessons there.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CourseAuthorship {
    pub owns_course: bool,
    pub has_lesson_in_course: bool,
}

impl CourseAuthorship {
    #[must_use]
    pub const fn is_author(&self) -> bool {
        self.owns_course || self.has_lesson_in_course
    }
}

#[derive(Debug, Clone, Copy)]
pub struct LessonPolicy {
    principal: Principal,
}

impl LessonPolicy {
    #[must_use]
    pub const fn new(principal: Principal) -> Self {
        Self { principal }
    }
}

policy_extractor!(LessonPolicy);

impl Policy for LessonPolicy {
    type Entity = lesson::Entity;
    type Context = CourseAuthorship;

    fn principal(&self) -> &Principal {
        &self.principal
    }

    fn can_create(&self, authorship: &CourseAuthorship) -> Verdict {
        if self.principal.is_moderator() {
            return Err(PermissionDenied::new("Moderators cannot create lessons."));
        }

        if authorship.is_author() {
            Ok(())
        } else {
            Err(PermissionDenied::new(
                "You can only add lessons to a course you own or already teach in.",
            ))
        }
    }

    fn can_update(&self, lesson: &lesson::Model, authorship: &CourseAuthorship) -> Verdict {
        if self.principal.is_moderator()
            || self.principal.owns(lesson.owner_id)
            || authorship.is_author()
        {
            Ok(())
        } else {
            Err(PermissionDenied::new("You cannot edit this lesson."))
        }
    }

    fn can_delete(&self, lesson: &lesson::Model, authorship: &CourseAuthorship) -> Verdict {
        if self.principal.is_moderator() {
            return Err(PermissionDenied::new("Moderators cannot delete lessons."));
        }

        if self.principal.owns(lesson.owner_id) || authorship.is_author() {
            Ok(())
        } else {
            Err(PermissionDenied::new("You cannot delete this lesson."))
        }
    }
}
