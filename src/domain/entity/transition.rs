// src/domain/entity/transition.rs
use crate::domain::entity::value_objects::{
    AccountStatus, EntityKind, GovernedStatus, ProfessionalStatus,
};
use crate::domain::errors::{DomainError, DomainResult};

/// A validated status change. `previous` and `next` may be equal for user
/// accounts; the change is still applied and audited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub previous: GovernedStatus,
    pub next: GovernedStatus,
}

impl Transition {
    pub fn is_noop(&self) -> bool {
        self.previous == self.next
    }
}

/// Validate moving an entity of `kind` from `current` to `requested`.
///
/// Professionals may only leave `pending`, and only towards `approved` or
/// `rejected`. User accounts may move between any two of the four statuses,
/// including onto the status they already hold.
pub fn transition(
    kind: EntityKind,
    current: GovernedStatus,
    requested: GovernedStatus,
) -> DomainResult<Transition> {
    if current.kind() != kind || requested.kind() != kind {
        return Err(DomainError::InvalidTransition(format!(
            "status '{requested}' does not apply to a {kind} currently '{current}'"
        )));
    }

    match (current, requested) {
        (GovernedStatus::Professional(from), GovernedStatus::Professional(to)) => {
            professional_transition(from, to)
        }
        (GovernedStatus::Account(from), GovernedStatus::Account(to)) => {
            Ok(account_transition(from, to))
        }
        _ => Err(DomainError::InvalidTransition(format!(
            "cannot move from '{current}' to '{requested}'"
        ))),
    }
}

fn professional_transition(
    from: ProfessionalStatus,
    to: ProfessionalStatus,
) -> DomainResult<Transition> {
    match (from, to) {
        (
            ProfessionalStatus::Pending,
            ProfessionalStatus::Approved | ProfessionalStatus::Rejected,
        ) => Ok(Transition {
            previous: GovernedStatus::Professional(from),
            next: GovernedStatus::Professional(to),
        }),
        (ProfessionalStatus::Pending, ProfessionalStatus::Pending) => Err(
            DomainError::InvalidTransition("a professional cannot be moved back to pending".into()),
        ),
        _ => Err(DomainError::InvalidTransition(
            "professional not found in pending state".into(),
        )),
    }
}

const fn account_transition(from: AccountStatus, to: AccountStatus) -> Transition {
    Transition {
        previous: GovernedStatus::Account(from),
        next: GovernedStatus::Account(to),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const fn pro(status: ProfessionalStatus) -> GovernedStatus {
        GovernedStatus::Professional(status)
    }

    const fn account(status: AccountStatus) -> GovernedStatus {
        GovernedStatus::Account(status)
    }

    #[test]
    fn pending_professional_can_be_approved_or_rejected() {
        for target in [ProfessionalStatus::Approved, ProfessionalStatus::Rejected] {
            let t = transition(
                EntityKind::Professional,
                pro(ProfessionalStatus::Pending),
                pro(target),
            )
            .expect("legal transition");
            assert_eq!(t.previous, pro(ProfessionalStatus::Pending));
            assert_eq!(t.next, pro(target));
        }
    }

    #[test]
    fn reviewed_professional_is_no_longer_eligible() {
        for current in [ProfessionalStatus::Approved, ProfessionalStatus::Rejected] {
            for target in [ProfessionalStatus::Approved, ProfessionalStatus::Rejected] {
                let err = transition(EntityKind::Professional, pro(current), pro(target))
                    .unwrap_err();
                assert!(
                    matches!(err, DomainError::InvalidTransition(ref msg) if msg.contains("pending state")),
                    "unexpected error {err:?}"
                );
            }
        }
    }

    #[test]
    fn account_statuses_move_any_to_any_including_self() {
        for from in AccountStatus::ALL {
            for to in AccountStatus::ALL {
                let t = transition(EntityKind::User, account(from), account(to)).unwrap();
                assert_eq!(t.is_noop(), from == to);
            }
        }
    }

    #[test]
    fn mismatched_kinds_are_rejected() {
        let err = transition(
            EntityKind::User,
            account(AccountStatus::Active),
            pro(ProfessionalStatus::Approved),
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::InvalidTransition(_)));

        let err = transition(
            EntityKind::Professional,
            account(AccountStatus::Active),
            account(AccountStatus::Inactive),
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::InvalidTransition(_)));
    }
}
