use crate::auth::Principal;
use crate::database::models::subscription;
use crate::policy::{macros::policy_extractor, PermissionDenied, Policy, Scope, Verdict};

/// Subscriptions are private to the subscriber, moderators included.
#[derive(Debug, Clone, Copy)]
pub struct SubscriptionPolicy {
    principal: Principal,
}

impl SubscriptionPolicy {
    #[must_use]
    pub const fn new(principal: Principal) -> Self {
        Self { principal }
    }
}

policy_extractor!(SubscriptionPolicy);

impl Policy for SubscriptionPolicy {
    type Entity = subscription::Entity;
    type Context = ();

    fn principal(&self) -> &Principal {
        &self.principal
    }

    fn scope(&self) -> Scope {
        Scope::OwnedBy(self.principal.id)
    }

    fn can_create(&self, (): &()) -> Verdict {
        Ok(())
    }

    fn can_update(&self, subscription: &subscription::Model, (): &()) -> Verdict {
        if subscription.user_id == self.principal.id {
            Ok(())
        } else {
            Err(PermissionDenied::new("This subscription belongs to another user."))
        }
    }
}
