//! Replenishment proposals

use serde::{Deserialize, Serialize};

/// A derived, non-persisted suggestion to replenish an item.
///
/// Proposals exist only for the duration of a request/response cycle and
/// are re-derived fresh from the item ledger on every planner query. The
/// synthetic id ("PLN-{item_id}") carries no freshness information: acting
/// on a proposal after the underlying stock changed is not detected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Proposal {
    pub proposal_id: String,
    pub item_id: i64,
    pub sku: String,
    pub name: String,
    pub suggested_qty: i64,
    pub reason: String,
}
