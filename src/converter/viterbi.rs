use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, debug_span};

use super::candidate::{Candidate, Segment};
use super::cost::CostFunction;
use super::lattice::Lattice;
use super::ConvertError;

/// Cooperative cancellation flag, polled once per offset advance in the DP
/// sweep. Worst-case overrun after cancelling is one offset's node set,
/// which bounds tail latency for pathological inputs.
#[derive(Debug, Default)]
pub struct CancelToken {
    flag: AtomicBool,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// One entry in a node's top-K list: accumulated cost, path length in
/// segments, and the (node, rank) provenance of the continued path.
#[derive(Clone, Copy)]
struct KEntry {
    cost: i64,
    segments: u32,
    prev_idx: Option<usize>,
    prev_rank: usize,
}

/// A backtraced path plus the node-rank sequence used for tie-breaking.
struct RawPath {
    segments: Vec<Segment>,
    ranks: Vec<u32>,
    cost: i64,
}

/// N-best Viterbi over the lattice: keep the K cheapest partial paths per
/// node, then read the K cheapest completions off the terminal offset.
///
/// Ties on cumulative cost are broken deterministically: fewer segments
/// first, then the lexicographically smaller dictionary-rank sequence.
/// Repeated decodes of the same lattice produce identical output.
///
/// Per-node top-K pruning approximates global N-best: a path that is not
/// among the K cheapest at some intermediate node is lost even if it would
/// rank within the global top K. Exact global N-best would need an
/// agenda-driven search at higher cost; with K at or above the lattice
/// branching factor the lists are identical.
///
/// Returns `Disconnected` when some offset has no ending node or the
/// terminal offset is unreachable — both invariant violations of the
/// builder's fallback patching, reported instead of returning an empty
/// list so they cannot be mistaken for "no good candidates".
pub(crate) fn decode_nbest(
    lattice: &Lattice,
    cost_fn: &dyn CostFunction,
    k: usize,
    cancel: Option<&CancelToken>,
) -> Result<Vec<Candidate>, ConvertError> {
    let char_count = lattice.char_count;
    let _span = debug_span!("decode_nbest", k, char_count).entered();
    if char_count == 0 || k == 0 {
        return Ok(Vec::new());
    }
    for offset in 1..=char_count {
        if lattice.nodes_by_end[offset].is_empty() {
            return Err(ConvertError::Disconnected { offset });
        }
    }

    // top_k[node_idx] = ascending (cost, segments) list, at most k entries.
    let mut top_k: Vec<Vec<KEntry>> = vec![Vec::new(); lattice.nodes.len()];

    for &idx in &lattice.nodes_by_start[0] {
        let node = &lattice.nodes[idx];
        let cost = cost_fn.word_cost(node) + cost_fn.bos_cost(node);
        insert_top_k(
            &mut top_k[idx],
            k,
            KEntry {
                cost,
                segments: 1,
                prev_idx: None,
                prev_rank: 0,
            },
        );
    }

    // Forward sweep. A node's list only receives entries while its start
    // offset is processed and is only read at its end offset, so every
    // `prev_rank` points into a finalized list.
    for pos in 1..char_count {
        if cancel.is_some_and(CancelToken::is_cancelled) {
            return Err(ConvertError::Cancelled);
        }
        for &next_idx in &lattice.nodes_by_start[pos] {
            let next_node = &lattice.nodes[next_idx];
            let word = cost_fn.word_cost(next_node);

            for &prev_idx in &lattice.nodes_by_end[pos] {
                if top_k[prev_idx].is_empty() {
                    continue;
                }
                let prev_node = &lattice.nodes[prev_idx];
                let transition = cost_fn.transition_cost(prev_node, next_node);

                for rank in 0..top_k[prev_idx].len() {
                    let prev = top_k[prev_idx][rank];
                    insert_top_k(
                        &mut top_k[next_idx],
                        k,
                        KEntry {
                            cost: prev.cost + transition + word,
                            segments: prev.segments + 1,
                            prev_idx: Some(prev_idx),
                            prev_rank: rank,
                        },
                    );
                }
            }
        }
    }

    // Completions at the terminal offset.
    let mut finish: Vec<(i64, usize, usize)> = Vec::new();
    for &node_idx in &lattice.nodes_by_end[char_count] {
        let node = &lattice.nodes[node_idx];
        let eos = cost_fn.eos_cost(node);
        for (rank, entry) in top_k[node_idx].iter().enumerate() {
            finish.push((entry.cost + eos, node_idx, rank));
        }
    }
    if finish.is_empty() {
        return Err(ConvertError::Disconnected { offset: char_count });
    }

    // Backtrace every completion (at most k per terminal node) before
    // ordering: the rank tie-break needs the full node sequence, which only
    // the backtrace reveals. Then sort, deduplicate by realized surface
    // keeping the best-ranked path, and cut to k.
    let mut raw: Vec<RawPath> = finish
        .iter()
        .map(|&(total, end_idx, end_rank)| {
            let (segments, ranks) = backtrace(&top_k, end_idx, end_rank, lattice);
            RawPath {
                segments,
                ranks,
                cost: total,
            }
        })
        .collect();

    raw.sort_by(|a, b| {
        a.cost
            .cmp(&b.cost)
            .then(a.segments.len().cmp(&b.segments.len()))
            .then(a.ranks.cmp(&b.ranks))
    });
    let mut seen: HashSet<String> = HashSet::new();
    raw.retain(|p| {
        let surface: String = p.segments.iter().map(|s| s.surface.as_str()).collect();
        seen.insert(surface)
    });
    raw.truncate(k);

    debug!(result_count = raw.len(), best_cost = raw.first().map(|p| p.cost));
    Ok(raw
        .into_iter()
        .map(|p| Candidate {
            segments: p.segments,
            cost: p.cost,
        })
        .collect())
}

/// Insert into a top-K list kept ascending by (cost, segments), capped at
/// `k`. `partition_point` with `<=` keeps earlier-inserted entries first on
/// full ties, which preserves dictionary-rank order because construction
/// visits nodes in rank order.
fn insert_top_k(list: &mut Vec<KEntry>, k: usize, entry: KEntry) {
    let pos = list.partition_point(|e| (e.cost, e.segments) <= (entry.cost, entry.segments));
    if pos >= k {
        return;
    }
    list.insert(pos, entry);
    if list.len() > k {
        list.pop();
    }
}

/// Walk predecessors from a terminal (node, rank) back to the start.
fn backtrace(
    top_k: &[Vec<KEntry>],
    end_idx: usize,
    end_rank: usize,
    lattice: &Lattice,
) -> (Vec<Segment>, Vec<u32>) {
    let mut path_indices = Vec::new();
    let mut cur_idx = end_idx;
    let mut cur_rank = end_rank;

    loop {
        path_indices.push(cur_idx);
        let entry = &top_k[cur_idx][cur_rank];
        match entry.prev_idx {
            Some(prev) => {
                cur_rank = entry.prev_rank;
                cur_idx = prev;
            }
            None => break,
        }
    }
    path_indices.reverse();

    let segments = path_indices
        .iter()
        .map(|&idx| {
            let node = &lattice.nodes[idx];
            Segment {
                reading: node.reading.clone(),
                surface: node.surface.clone(),
                pos: node.pos,
                is_fallback: node.is_fallback,
            }
        })
        .collect();
    let ranks = path_indices
        .iter()
        .map(|&idx| lattice.nodes[idx].rank)
        .collect();
    (segments, ranks)
}
