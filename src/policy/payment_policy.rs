use crate::auth::Principal;
use crate::database::models::payment;
use crate::policy::{macros::policy_extractor, PermissionDenied, Policy, Verdict};

/// Payments are recorded by the paying member. Nothing in the HTTP API edits
/// or removes a payment; the owner-only rules below guard any future caller.
#[derive(Debug, Clone, Copy)]
pub struct PaymentPolicy {
    principal: Principal,
}

impl PaymentPolicy {
    #[must_use]
    pub const fn new(principal: Principal) -> Self {
        Self { principal }
    }
}

policy_extractor!(PaymentPolicy);

impl Policy for PaymentPolicy {
    type Entity = payment::Entity;
    type Context = ();

    fn principal(&self) -> &Principal {
        &self.principal
    }

    fn can_create(&self, (): &()) -> Verdict {
        if self.principal.is_moderator() {
            return Err(PermissionDenied::new("Moderators cannot record payments."));
        }

        Ok(())
    }

    fn can_update(&self, payment: &payment::Model, (): &()) -> Verdict {
        if self.principal.owns(payment.owner_id) {
            Ok(())
        } else {
            Err(PermissionDenied::new("Only the payer can change this payment."))
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDateTime;

    use super::*;
    use crate::database::models::{payment_method::PaymentMethod, role::Role};
    use crate::policy::{authorize, Action};

    fn payment(owner_id: Option<i32>) -> payment::Model {
        payment::Model {
            id: 1,
            date: NaiveDateTime::default(),
            amount: 1500,
            method: PaymentMethod::Transfer,
            course_id: Some(1),
            lesson_id: None,
            owner_id,
        }
    }

    #[test]
    fn moderators_cannot_record_payments() {
        let moderator = PaymentPolicy::new(Principal::new(2, Role::Moderator));

        assert!(authorize(&moderator, Action::Create, &()).is_err());
        assert!(authorize(&PaymentPolicy::new(Principal::new(1, Role::Member)), Action::Create, &()).is_ok());
    }

    #[test]
    fn only_the_payer_may_change_or_delete() {
        let payment = payment(Some(1));
        let payer = PaymentPolicy::new(Principal::new(1, Role::Member));
        let moderator = PaymentPolicy::new(Principal::new(2, Role::Moderator));

        assert!(authorize(&payer, Action::Update(&payment), &()).is_ok());
        assert!(authorize(&payer, Action::Delete(&payment), &()).is_ok());
        assert!(authorize(&moderator, Action::Update(&payment), &()).is_err());
        assert!(authorize(&moderator, Action::Delete(&payment), &()).is_err());
    }

    #[test]
    fn moderators_can_read_every_payment() {
        let moderator = PaymentPolicy::new(Principal::new(2, Role::Moderator));

        assert!(moderator.can_read(&payment(None)));
        assert!(!PaymentPolicy::new(Principal::new(1, Role::Member)).can_read(&payment(Some(3))));
    }
}
