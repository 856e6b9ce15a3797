//! Stock movement types

use crate::domain::errors::ValidationError;
use serde::{Deserialize, Serialize};

/// Kind of stock movement recorded against an item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveType {
    In,
    Out,
    Adjust,
}

impl MoveType {
    /// Parse the wire representation ("IN" | "OUT" | "ADJUST", case-insensitive)
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        match s.to_uppercase().as_str() {
            "IN" => Ok(MoveType::In),
            "OUT" => Ok(MoveType::Out),
            "ADJUST" => Ok(MoveType::Adjust),
            _ => Err(ValidationError::InvalidMoveType(s.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MoveType::In => "IN",
            MoveType::Out => "OUT",
            MoveType::Adjust => "ADJUST",
        }
    }

    /// Signed effect of this movement on the item's on-hand counter.
    ///
    /// ADJUST movements are audit-only and deliberately leave on_hand
    /// untouched; corrections are reconciled elsewhere.
    pub fn on_hand_delta(&self, qty: i64) -> i64 {
        match self {
            MoveType::In => qty,
            MoveType::Out => -qty,
            MoveType::Adjust => 0,
        }
    }
}
