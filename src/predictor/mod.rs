//! Incremental suggestions for a partial reading.
//!
//! Prediction reuses the conversion lattice and decoder. Paths that cover
//! the typed prefix exactly carry the same cost full conversion would
//! assign them; dictionary readings that extend the prefix add
//! continuation candidates on top.

use std::collections::HashSet;

use tracing::{debug, debug_span};

use crate::converter::candidate::{Candidate, Segment};
use crate::converter::cost::{CostFunction, DefaultCostFunction};
use crate::converter::{build_lattice, decode_nbest, CancelToken, ConvertError, LatticeNode};
use crate::dict::{ConnectionMatrix, Dictionary};
use crate::settings::settings;

/// Decoding context carried over from previously committed text.
#[derive(Debug, Clone, Default)]
pub struct Context {
    /// POS tag of the last committed segment. When present it replaces the
    /// BOS boundary tag on the first transition, so suggestions continue
    /// the committed phrase instead of starting a fresh one.
    pub previous_pos: Option<u16>,
}

/// Prediction candidates for a partial reading, ranked ascending by cost.
///
/// The reading need not be complete in any linguistic sense; an empty
/// reading yields an empty list. Continuation candidates omit the EOS
/// transition — the phrase is still open — and their final segment's
/// reading extends past the literal input.
pub fn predict(
    dict: &dyn Dictionary,
    conn: &ConnectionMatrix,
    reading: &str,
    context: Option<&Context>,
    n: usize,
    cancel: Option<&CancelToken>,
) -> Result<Vec<Candidate>, ConvertError> {
    let _span = debug_span!("predict", reading, n).entered();
    if reading.is_empty() || n == 0 {
        return Ok(Vec::new());
    }
    let cost_fn = match context.and_then(|c| c.previous_pos) {
        Some(tag) => DefaultCostFunction::with_left_context(conn, tag),
        None => DefaultCostFunction::new(conn),
    };

    // Exact-coverage paths, scored identically to conversion.
    let lattice = build_lattice(dict, reading, None);
    let mut candidates = decode_nbest(&lattice, &cost_fn, n, cancel)?;
    let decoded = candidates.len();

    // Continuation candidates from predictive dictionary lookup.
    let reading_chars = reading.chars().count();
    for m in dict.predict(reading, settings().predictor.scan_limit) {
        for entry in m.entries {
            let node = LatticeNode {
                start: 0,
                end: reading_chars,
                reading: m.reading.clone(),
                surface: entry.surface,
                cost: entry.cost,
                pos: entry.pos,
                rank: 0,
                is_fallback: false,
            };
            let cost = cost_fn.word_cost(&node) + cost_fn.bos_cost(&node);
            candidates.push(Candidate {
                segments: vec![Segment {
                    reading: node.reading,
                    surface: node.surface,
                    pos: node.pos,
                    is_fallback: false,
                }],
                cost,
            });
        }
    }

    // Merge: cheapest first, fewer segments on ties; the stable sort keeps
    // decoder order and dictionary order within equal keys. Dedup keeps the
    // cheaper candidate per surface.
    candidates.sort_by(|a, b| {
        a.cost
            .cmp(&b.cost)
            .then(a.segments.len().cmp(&b.segments.len()))
    });
    let mut seen = HashSet::new();
    candidates.retain(|c| seen.insert(c.surface()));
    candidates.truncate(n);

    debug!(
        result_count = candidates.len(),
        decoded,
        best_cost = candidates.first().map(|c| c.cost)
    );
    Ok(candidates)
}
