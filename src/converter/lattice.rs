use tracing::{debug, debug_span};

use crate::dict::connection::BOUNDARY_TAG;
use crate::dict::Dictionary;
use crate::settings::settings;

use super::constraint::Boundaries;

/// A node in the conversion lattice: one dictionary entry (or fallback)
/// anchored to a reading span.
///
/// Nodes live in an arena (`Lattice::nodes`) and are addressed by index;
/// the decoder stores predecessor indices, never references, so the
/// backward path graph is cycle-free by construction.
#[derive(Debug, Clone)]
pub struct LatticeNode {
    /// Start offset (char index, inclusive).
    pub start: usize,
    /// End offset (char index, exclusive).
    pub end: usize,
    /// Reading substring covered by this node.
    pub reading: String,
    /// Surface form emitted when the node is on the chosen path.
    pub surface: String,
    /// Word cost (lower = more preferred).
    pub cost: i32,
    /// POS tag for connection-cost lookups.
    pub pos: u16,
    /// Arena index, doubling as the deterministic tie-break rank:
    /// construction visits start offsets in order and dictionary results in
    /// rank order, so a smaller index means an earlier dictionary rank.
    pub rank: u32,
    /// True for synthetic unknown-word nodes.
    pub is_fallback: bool,
}

/// All candidate word spans over one reading, indexed for the DP sweep.
///
/// Invariant: every offset in `1..=char_count` has at least one node ending
/// there. Fallback insertion below guarantees it, and the decoder treats a
/// violation as an internal error rather than an empty result.
pub struct Lattice {
    /// The reading this lattice was built for.
    pub reading: String,
    /// Node arena; `LatticeNode::rank` is the index here.
    pub nodes: Vec<LatticeNode>,
    /// nodes_by_end[i] = indices of nodes ending at offset i.
    pub nodes_by_end: Vec<Vec<usize>>,
    /// nodes_by_start[i] = indices of nodes starting at offset i.
    pub nodes_by_start: Vec<Vec<usize>>,
    /// Number of chars in the reading.
    pub char_count: usize,
}

/// Build a lattice from dictionary prefix matches.
///
/// For every start offset, each dictionary entry whose reading matches a
/// prefix of the remaining input becomes a node. A single-unit fallback
/// node (configured unknown-word cost, boundary POS tag) is added wherever
/// no single-unit entry exists, which keeps every offset reachable even
/// when longer matches are pruned by `boundaries`.
///
/// Nodes whose span strictly contains a forced boundary are discarded here,
/// before decoding — the decoder never sees a path that could violate a
/// constraint. A fallback node spans one unit and therefore cannot cross a
/// boundary, so constraint pruning cannot disconnect the lattice.
pub fn build_lattice(dict: &dyn Dictionary, reading: &str, boundaries: Option<&Boundaries>) -> Lattice {
    let char_count = reading.chars().count();
    let _span = debug_span!("build_lattice", char_count).entered();
    // Byte offset per char position, so suffixes slice the original &str.
    let byte_offsets: Vec<usize> = reading.char_indices().map(|(i, _)| i).collect();
    let mut nodes: Vec<LatticeNode> = Vec::new();
    let mut nodes_by_end: Vec<Vec<usize>> = vec![Vec::new(); char_count + 1];
    let mut nodes_by_start: Vec<Vec<usize>> = vec![Vec::new(); char_count];

    for start in 0..char_count {
        let mut has_single_unit = false;

        let suffix = &reading[byte_offsets[start]..];
        for m in dict.prefix_matches(suffix) {
            let span_chars = m.reading.chars().count();
            let end = start + span_chars;
            if boundaries.is_some_and(|b| b.crosses(start, end)) {
                continue;
            }
            for entry in m.entries {
                let idx = nodes.len();
                nodes.push(LatticeNode {
                    start,
                    end,
                    reading: m.reading.clone(),
                    surface: entry.surface,
                    cost: entry.cost,
                    pos: entry.pos,
                    rank: idx as u32,
                    is_fallback: false,
                });
                nodes_by_end[end].push(idx);
                nodes_by_start[start].push(idx);
                if span_chars == 1 {
                    has_single_unit = true;
                }
            }
        }

        if !has_single_unit {
            let next_offset = byte_offsets.get(start + 1).copied().unwrap_or(reading.len());
            let unit = reading[byte_offsets[start]..next_offset].to_string();
            let idx = nodes.len();
            nodes.push(LatticeNode {
                start,
                end: start + 1,
                reading: unit.clone(),
                surface: unit,
                cost: settings().cost.unknown_word_cost,
                pos: BOUNDARY_TAG,
                rank: idx as u32,
                is_fallback: true,
            });
            nodes_by_end[start + 1].push(idx);
            nodes_by_start[start].push(idx);
        }
    }

    debug!(node_count = nodes.len());
    Lattice {
        reading: reading.to_string(),
        nodes,
        nodes_by_end,
        nodes_by_start,
        char_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converter::testutil::{tiny_dict, word_dict};

    #[test]
    fn build_basic() {
        let dict = word_dict();
        let lattice = build_lattice(&dict, "きょうは", None);

        assert_eq!(lattice.char_count, 4);
        let kyou: Vec<_> = lattice
            .nodes
            .iter()
            .filter(|n| n.reading == "きょう")
            .collect();
        assert_eq!(kyou.len(), 2);
        assert!(kyou.iter().any(|n| n.surface == "今日"));
        assert!(kyou.iter().any(|n| n.surface == "京"));
    }

    #[test]
    fn fallback_for_uncovered_unit() {
        let dict = word_dict();
        let lattice = build_lattice(&dict, "ぬ", None);

        assert_eq!(lattice.nodes.len(), 1);
        let node = &lattice.nodes[0];
        assert!(node.is_fallback);
        assert_eq!(node.reading, "ぬ");
        assert_eq!(node.surface, "ぬ");
        assert_eq!(node.cost, 10000);
        assert_eq!(node.pos, 0);
    }

    #[test]
    fn every_offset_has_an_ending_node() {
        let dict = word_dict();
        let lattice = build_lattice(&dict, "きょうはぬてんき", None);

        for pos in 1..=lattice.char_count {
            assert!(
                !lattice.nodes_by_end[pos].is_empty(),
                "no nodes end at offset {pos}"
            );
        }
    }

    #[test]
    fn boundary_excludes_crossing_nodes() {
        let dict = tiny_dict();
        let boundaries = Boundaries::new([1]);
        let lattice = build_lattice(&dict, "ab", Some(&boundaries));

        assert!(
            lattice.nodes.iter().all(|n| !(n.start < 1 && 1 < n.end)),
            "no surviving node may cross the forced boundary"
        );
        // The "ab" entry is gone; single-unit entries survive.
        assert!(!lattice.nodes.iter().any(|n| n.surface == "X"));
        assert!(lattice.nodes.iter().any(|n| n.surface == "Y"));
        assert!(lattice.nodes.iter().any(|n| n.surface == "Z"));
        // Connectivity is intact.
        for pos in 1..=lattice.char_count {
            assert!(!lattice.nodes_by_end[pos].is_empty());
        }
    }

    #[test]
    fn index_consistency() {
        let dict = word_dict();
        let lattice = build_lattice(&dict, "きょうはいいてんき", None);

        for (idx, node) in lattice.nodes.iter().enumerate() {
            assert_eq!(node.rank as usize, idx);
            assert!(lattice.nodes_by_start[node.start].contains(&idx));
            assert!(lattice.nodes_by_end[node.end].contains(&idx));
            assert!(node.start < node.end);
            assert!(node.end <= lattice.char_count);
        }
    }
}
