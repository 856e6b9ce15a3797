//! Reorder Planner
//!
//! Pure replenishment heuristic over current stock levels. An item whose
//! on-hand quantity has fallen below its reorder point gets a proposal for
//!
//! ```text
//! suggested_qty = max(reorder_qty, (reorder_point - on_hand) + safety_stock)
//! ```
//!
//! Items at or above their reorder point are skipped. The planner holds no
//! state and writes nothing; proposals are recomputed on every call.

use crate::domain::entities::proposal::Proposal;

/// Stock level inputs for one item, as the planner sees them
#[derive(Debug, Clone)]
pub struct StockSnapshot {
    pub item_id: i64,
    pub sku: String,
    pub name: String,
    pub on_hand: i64,
    pub reorder_point: i64,
    pub reorder_qty: i64,
    pub safety_stock: i64,
}

/// Evaluate a single item, returning a proposal if it is below threshold
pub fn evaluate(snap: &StockSnapshot) -> Option<Proposal> {
    if snap.on_hand >= snap.reorder_point {
        return None;
    }

    let shortfall = (snap.reorder_point - snap.on_hand) + snap.safety_stock;
    let suggested_qty = snap.reorder_qty.max(shortfall);

    Some(Proposal {
        proposal_id: format!("PLN-{}", snap.item_id),
        item_id: snap.item_id,
        sku: snap.sku.clone(),
        name: snap.name.clone(),
        suggested_qty,
        reason: format!(
            "on_hand {} < reorder_point {}, ss {}",
            snap.on_hand, snap.reorder_point, snap.safety_stock
        ),
    })
}

/// Evaluate all items in the given (id) order
pub fn propose(snapshots: &[StockSnapshot]) -> Vec<Proposal> {
    snapshots.iter().filter_map(evaluate).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(item_id: i64, on_hand: i64, rp: i64, rq: i64, ss: i64) -> StockSnapshot {
        StockSnapshot {
            item_id,
            sku: format!("SKU-{}", item_id),
            name: format!("Item {}", item_id),
            on_hand,
            reorder_point: rp,
            reorder_qty: rq,
            safety_stock: ss,
        }
    }

    #[test]
    fn reorder_qty_wins_when_shortfall_is_small() {
        // on_hand=24, rp=50, rq=80, ss=10 -> max(80, 26+10) = 80
        let proposal = evaluate(&snap(1, 24, 50, 80, 10)).unwrap();
        assert_eq!(proposal.suggested_qty, 80);
        assert_eq!(proposal.proposal_id, "PLN-1");
        assert_eq!(proposal.reason, "on_hand 24 < reorder_point 50, ss 10");
    }

    #[test]
    fn shortfall_wins_when_it_exceeds_reorder_qty() {
        // max(40, (200-10)+50) = 240
        let proposal = evaluate(&snap(2, 10, 200, 40, 50)).unwrap();
        assert_eq!(proposal.suggested_qty, 240);
    }

    #[test]
    fn items_at_or_above_threshold_are_skipped() {
        assert!(evaluate(&snap(1, 50, 50, 80, 10)).is_none());
        assert!(evaluate(&snap(1, 120, 60, 80, 20)).is_none());
    }

    #[test]
    fn negative_on_hand_deepens_the_shortfall() {
        // max(80, (50 - (-5)) + 10) = max(80, 65) = 80
        let proposal = evaluate(&snap(3, -5, 50, 80, 10)).unwrap();
        assert_eq!(proposal.suggested_qty, 80);
        // max(10, 55 + 10) = 65
        let proposal = evaluate(&snap(3, -5, 50, 10, 10)).unwrap();
        assert_eq!(proposal.suggested_qty, 65);
    }

    #[test]
    fn propose_preserves_input_order_and_filters() {
        let proposals = propose(&[
            snap(1, 120, 60, 80, 20),
            snap(2, 24, 50, 80, 10),
            snap(3, 0, 200, 200, 50),
        ]);
        assert_eq!(proposals.len(), 2);
        assert_eq!(proposals[0].item_id, 2);
        assert_eq!(proposals[1].item_id, 3);
        assert_eq!(proposals[1].suggested_qty, 250);
    }
}
