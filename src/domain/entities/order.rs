//! Purchase order status

use serde::{Deserialize, Serialize};

/// Lifecycle status of a purchase order.
///
/// Orders are created OPEN by the planner gateway. No transition logic for
/// CLOSED/CANCELED exists in the core yet; receiving is handled outside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    Open,
    Closed,
    Canceled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Open => "OPEN",
            OrderStatus::Closed => "CLOSED",
            OrderStatus::Canceled => "CANCELED",
        }
    }
}
