// service/lifecycle.rs
use uuid::Uuid;

use crate::{
    models::enquirymodel::{
        ClosureOutcome, Enquiry, EnquiryStage, EnquiryStatus, StatusTransition,
    },
    service::error::ServiceError,
};

/// Status rules for enquiries. Every operation takes the current record and returns the
/// updated copy; on error the caller still holds the untouched original.
pub struct EnquiryLifecycle;

impl EnquiryLifecycle {
    pub fn start_negotiation(enquiry: &Enquiry) -> Result<Enquiry, ServiceError> {
        Self::transition(
            enquiry,
            EnquiryStatus::Negotiating,
            "start negotiation",
            None,
            Some(EnquiryStage::Negotiation),
        )
    }

    pub fn approve(enquiry: &Enquiry) -> Result<Enquiry, ServiceError> {
        Self::transition(
            enquiry,
            EnquiryStatus::Accepted,
            "approve",
            None,
            Some(EnquiryStage::Payment),
        )
    }

    pub fn reject(enquiry: &Enquiry) -> Result<Enquiry, ServiceError> {
        Self::transition(enquiry, EnquiryStatus::Rejected, "reject", None, None)
    }

    pub fn close(
        enquiry: &Enquiry,
        reason: &str,
        outcome: ClosureOutcome,
    ) -> Result<Enquiry, ServiceError> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(ServiceError::validation("reason", "is required to close an enquiry"));
        }

        let mut closed = Self::transition(
            enquiry,
            outcome.into(),
            "close",
            Some(reason.to_string()),
            None,
        )?;
        closed.closure_reason = Some(reason.to_string());
        Ok(closed)
    }

    /// Attaches an agent. Status and stage are untouched.
    pub fn assign_agent(enquiry: &Enquiry, agent_id: Uuid) -> Result<Enquiry, ServiceError> {
        Self::ensure_editable(enquiry, "assign an agent")?;

        let mut updated = enquiry.clone();
        if updated.assigned_agent != Some(agent_id) {
            updated.assigned_agent = Some(agent_id);
            updated.touch();
        }
        Ok(updated)
    }

    /// Terminal enquiries accept no further operator edits.
    pub fn ensure_editable(enquiry: &Enquiry, action: &str) -> Result<(), ServiceError> {
        if enquiry.is_terminal() {
            return Err(ServiceError::InvalidStateTransition {
                enquiry_id: enquiry.id,
                status: enquiry.status,
                action: action.to_string(),
            });
        }
        Ok(())
    }

    fn transition(
        enquiry: &Enquiry,
        to: EnquiryStatus,
        action: &str,
        reason: Option<String>,
        advance_stage_to: Option<EnquiryStage>,
    ) -> Result<Enquiry, ServiceError> {
        if !Self::is_valid_transition(enquiry.status, to) {
            return Err(ServiceError::InvalidStateTransition {
                enquiry_id: enquiry.id,
                status: enquiry.status,
                action: action.to_string(),
            });
        }

        let mut updated = enquiry.clone();
        let mut changed = false;

        if updated.status != to {
            updated.history.push(StatusTransition {
                from: updated.status,
                to,
                action: action.to_string(),
                reason,
                at: chrono::Utc::now(),
            });
            updated.status = to;
            changed = true;
        }

        // Stages only move forward here; an operator may still rewind through set_stage.
        if let Some(stage) = advance_stage_to {
            if updated.stage < stage {
                updated.stage = stage;
                changed = true;
            }
        }

        if changed {
            updated.touch();
        }
        Ok(updated)
    }

    fn is_valid_transition(from: EnquiryStatus, to: EnquiryStatus) -> bool {
        match (from, to) {
            (from, _) if from.is_terminal() => false,
            (EnquiryStatus::Pending, EnquiryStatus::Negotiating) => true,
            (EnquiryStatus::Negotiating, EnquiryStatus::Negotiating) => true,
            (_, EnquiryStatus::Accepted) => true,
            (_, EnquiryStatus::Rejected) => true,
            (_, EnquiryStatus::Completed) => true,
            (_, EnquiryStatus::Cancelled) => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::enquirymodel::EnquiryKind;
    use crate::service::enquiry_factory::tests::{buy_input, test_factory};

    fn pending() -> Enquiry {
        test_factory().create(EnquiryKind::Buy, &buy_input()).unwrap()
    }

    #[test]
    fn test_approve_pending() {
        let approved = EnquiryLifecycle::approve(&pending()).unwrap();
        assert_eq!(approved.status, EnquiryStatus::Accepted);
        assert_eq!(approved.stage, EnquiryStage::Payment);
        assert_eq!(approved.history.len(), 1);
        assert_eq!(approved.history[0].from, EnquiryStatus::Pending);
        assert_eq!(approved.history[0].action, "approve");
    }

    #[test]
    fn test_reapprove_is_idempotent() {
        let approved = EnquiryLifecycle::approve(&pending()).unwrap();
        let again = EnquiryLifecycle::approve(&approved).unwrap();
        assert_eq!(again, approved);
    }

    #[test]
    fn test_approve_does_not_rewind_stage() {
        let mut enquiry = pending();
        enquiry.stage = EnquiryStage::Completed;
        let approved = EnquiryLifecycle::approve(&enquiry).unwrap();
        assert_eq!(approved.stage, EnquiryStage::Completed);
    }

    #[test]
    fn test_start_negotiation() {
        let negotiating = EnquiryLifecycle::start_negotiation(&pending()).unwrap();
        assert_eq!(negotiating.status, EnquiryStatus::Negotiating);
        assert_eq!(negotiating.stage, EnquiryStage::Negotiation);

        let rejected = EnquiryLifecycle::reject(&negotiating).unwrap();
        assert_eq!(rejected.status, EnquiryStatus::Rejected);
        assert_eq!(rejected.stage, EnquiryStage::Negotiation);

        let accepted = EnquiryLifecycle::approve(&pending()).unwrap();
        assert!(matches!(
            EnquiryLifecycle::start_negotiation(&accepted),
            Err(ServiceError::InvalidStateTransition { status: EnquiryStatus::Accepted, .. })
        ));
    }

    #[test]
    fn test_terminal_statuses_refuse_transitions() {
        let base = pending();
        let terminals = vec![
            EnquiryLifecycle::reject(&base).unwrap(),
            EnquiryLifecycle::close(&base, "Sold elsewhere", ClosureOutcome::Completed).unwrap(),
            EnquiryLifecycle::close(&base, "Buyer withdrew", ClosureOutcome::Cancelled).unwrap(),
        ];

        for terminal in terminals {
            let snapshot = terminal.clone();
            for result in [
                EnquiryLifecycle::approve(&terminal),
                EnquiryLifecycle::reject(&terminal),
                EnquiryLifecycle::start_negotiation(&terminal),
                EnquiryLifecycle::close(&terminal, "again", ClosureOutcome::Cancelled),
                EnquiryLifecycle::assign_agent(&terminal, Uuid::from_u128(1)),
            ] {
                match result {
                    Err(ServiceError::InvalidStateTransition { enquiry_id, status, .. }) => {
                        assert_eq!(enquiry_id, terminal.id);
                        assert_eq!(status, terminal.status);
                    }
                    other => panic!("expected InvalidStateTransition, got {:?}", other),
                }
            }
            assert_eq!(terminal, snapshot);
        }
    }

    #[test]
    fn test_close_requires_reason() {
        let enquiry = pending();
        for reason in ["", "   "] {
            let err = EnquiryLifecycle::close(&enquiry, reason, ClosureOutcome::Completed)
                .unwrap_err();
            assert_eq!(err.kind(), "validation_error");
        }
    }

    #[test]
    fn test_close_records_reason() {
        let closed =
            EnquiryLifecycle::close(&pending(), " Deal fell through ", ClosureOutcome::Cancelled)
                .unwrap();
        assert_eq!(closed.status, EnquiryStatus::Cancelled);
        assert_eq!(closed.closure_reason.as_deref(), Some("Deal fell through"));
        assert_eq!(closed.history[0].reason.as_deref(), Some("Deal fell through"));
        assert_eq!(closed.stage, EnquiryStage::Initial);
    }

    #[test]
    fn test_assign_agent_keeps_stage_and_status() {
        let negotiating = EnquiryLifecycle::start_negotiation(&pending()).unwrap();
        let assigned = EnquiryLifecycle::assign_agent(&negotiating, Uuid::from_u128(3)).unwrap();
        assert_eq!(assigned.assigned_agent, Some(Uuid::from_u128(3)));
        assert_eq!(assigned.status, negotiating.status);
        assert_eq!(assigned.stage, negotiating.stage);
        assert_eq!(assigned.history, negotiating.history);
    }
}
