use crate::dict::connection::{ConnectionMatrix, BOUNDARY_TAG};
use crate::settings::settings;

use super::lattice::LatticeNode;

/// Scoring hooks for the Viterbi sweep.
///
/// Conversion and prediction share one implementation so that a prediction
/// which exactly matches a full conversion carries the identical cost.
pub(crate) trait CostFunction: Send + Sync {
    fn word_cost(&self, node: &LatticeNode) -> i64;
    fn transition_cost(&self, prev: &LatticeNode, next: &LatticeNode) -> i64;
    fn bos_cost(&self, node: &LatticeNode) -> i64;
    fn eos_cost(&self, node: &LatticeNode) -> i64;
}

/// Default scoring: word cost + flat segment penalty, transitions from the
/// connection matrix. The left context tag stands in for BOS, so committed
/// history can influence the first transition.
pub(crate) struct DefaultCostFunction<'a> {
    conn: &'a ConnectionMatrix,
    left_context: u16,
}

impl<'a> DefaultCostFunction<'a> {
    pub fn new(conn: &'a ConnectionMatrix) -> Self {
        Self {
            conn,
            left_context: BOUNDARY_TAG,
        }
    }

    /// Score with the POS tag of previously committed text as the left
    /// context of the first node.
    pub fn with_left_context(conn: &'a ConnectionMatrix, left_context: u16) -> Self {
        Self { conn, left_context }
    }
}

impl CostFunction for DefaultCostFunction<'_> {
    fn word_cost(&self, node: &LatticeNode) -> i64 {
        node.cost as i64 + settings().cost.segment_penalty
    }

    fn transition_cost(&self, prev: &LatticeNode, next: &LatticeNode) -> i64 {
        self.conn.cost(prev.pos, next.pos) as i64
    }

    fn bos_cost(&self, node: &LatticeNode) -> i64 {
        self.conn.cost(self.left_context, node.pos) as i64
    }

    fn eos_cost(&self, node: &LatticeNode) -> i64 {
        self.conn.cost(node.pos, BOUNDARY_TAG) as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(pos: u16, cost: i32) -> LatticeNode {
        LatticeNode {
            start: 0,
            end: 1,
            reading: "あ".to_string(),
            surface: "亜".to_string(),
            cost,
            pos,
            rank: 0,
            is_fallback: false,
        }
    }

    #[test]
    fn word_cost_includes_segment_penalty() {
        let conn = ConnectionMatrix::zeroed(4);
        let f = DefaultCostFunction::new(&conn);
        let penalty = settings().cost.segment_penalty;
        assert_eq!(f.word_cost(&node(1, 300)), 300 + penalty);
    }

    #[test]
    fn left_context_replaces_bos() {
        let mut conn = ConnectionMatrix::zeroed(4);
        conn.set(0, 1, 50);
        conn.set(2, 1, 900);
        let n = node(1, 0);

        let plain = DefaultCostFunction::new(&conn);
        assert_eq!(plain.bos_cost(&n), 50);

        let contextual = DefaultCostFunction::with_left_context(&conn, 2);
        assert_eq!(contextual.bos_cost(&n), 900);
    }
}
