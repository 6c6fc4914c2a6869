use crate::auth::Principal;
use crate::database::models::user;
use crate::policy::{macros::policy_extractor, PermissionDenied, Verdict};

/// Name of the view that exposes private profile data.
pub const PROFILE_VIEW: &str = "profile";

/// Users are not owned rows, so this policy stands outside [`crate::policy::Policy`]:
/// anyone signed in may see a public card, only the user themself may see the
/// full profile or edit it.
#[derive(Debug, Clone, Copy)]
pub struct UserPolicy {
    principal: Principal,
}

impl UserPolicy {
    #[must_use]
    pub const fn new(principal: Principal) -> Self {
        Self { principal }
    }

    #[must_use]
    pub const fn principal(&self) -> &Principal {
        &self.principal
    }

    /// # Errors
    /// Denied unless `user` is the principal.
    pub fn can_update(&self, user: &user::Model) -> Verdict {
        if user.id == self.principal.id {
            Ok(())
        } else {
            Err(PermissionDenied::new("You cannot edit another user."))
        }
    }

    /// # Errors
    /// Denied when `view_name` is the profile view of someone else.
    pub fn can_view(&self, user: &user::Model, view_name: &str) -> Verdict {
        if view_name != PROFILE_VIEW || user.id == self.principal.id {
            Ok(())
        } else {
            Err(PermissionDenied::new("You cannot view another user's profile."))
        }
    }
}

policy_extractor!(UserPolicy);

#[cfg(test)]
mod tests {
    use chrono::NaiveDateTime;

    use super::*;
    use crate::database::models::role::Role;

    fn user(id: i32) -> user::Model {
        user::Model {
            id,
            email: format!("user{id}@example.com"),
            password_hash: String::new(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            phone: None,
            city: None,
            avatar: None,
            role: Role::Member,
            created_at: NaiveDateTime::default(),
        }
    }

    #[test]
    fn users_edit_only_themselves() {
        let policy = UserPolicy::new(Principal::new(1, Role::Member));

        assert!(policy.can_update(&user(1)).is_ok());
        assert_eq!(
            policy.can_update(&user(2)).map_err(|denied| denied.reason),
            Err("You cannot edit another user.")
        );
    }

    #[test]
    fn moderators_cannot_edit_other_users() {
        let policy = UserPolicy::new(Principal::new(9, Role::Moderator));

        assert!(policy.can_update(&user(1)).is_err());
    }

    #[test]
    fn profile_view_is_private_public_view_is_not() {
        let policy = UserPolicy::new(Principal::new(1, Role::Member));

        assert!(policy.can_view(&user(2), "public").is_ok());
        assert!(policy.can_view(&user(2), PROFILE_VIEW).is_err());
        assert!(policy.can_view(&user(1), PROFILE_VIEW).is_ok());
    }
}
