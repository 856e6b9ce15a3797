//! Planner proposal decisions

use crate::domain::errors::ValidationError;

/// A human/agent decision on a replenishment proposal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlannerAction {
    Approve,
    Reject,
}

impl PlannerAction {
    /// Parse the wire representation ("APPROVE" | "REJECT")
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        match s.to_uppercase().as_str() {
            "APPROVE" => Ok(PlannerAction::Approve),
            "REJECT" => Ok(PlannerAction::Reject),
            _ => Err(ValidationError::InvalidAction(s.to_string())),
        }
    }
}
