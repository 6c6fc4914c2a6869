use crate::database::models::{role::Role, user};

/// The acting user as seen by authorization code: an id and a role, nothing
/// else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub id: i32,
    pub role: Role,
}

impl Principal {
    #[must_use]
    pub const fn new(id: i32, role: Role) -> Self {
        Self { id, role }
    }

    #[must_use]
    pub const fn is_moderator(&self) -> bool {
        role_of(self).is_moderator()
    }

    /// Whether `owner` (an optional owner back-reference) points at this principal.
    #[must_use]
    pub fn owns(&self, owner: Option<i32>) -> bool {
        owner == Some(self.id)
    }
}

impl From<&user::Model> for Principal {
    fn from(user: &user::Model) -> Self {
        Self::new(user.id, user.role)
    }
}

/// Role of the principal; users without an explicit role are members.
#[must_use]
pub const fn role_of(principal: &Principal) -> Role {
    principal.role
}
