//! Reading-to-candidate conversion: lattice construction, N-best Viterbi
//! decoding, and the candidate rewrite pipeline.

pub mod candidate;
pub mod constraint;
pub(crate) mod cost;
pub mod explain;
mod lattice;
pub mod rewriter;
pub(crate) mod testutil;
mod viterbi;


use crate::dict::{ConnectionMatrix, Dictionary};

use candidate::Candidate;
use constraint::Boundaries;
use cost::DefaultCostFunction;

pub use lattice::{build_lattice, Lattice, LatticeNode};
pub use viterbi::CancelToken;
pub(crate) use viterbi::decode_nbest;

/// Per-request conversion failure.
///
/// `Disconnected` reports an internal invariant violation (fallback
/// patching failed to connect the lattice); it is deliberately distinct
/// from the empty candidate list that "no good candidates" produces.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConvertError {
    #[error("lattice disconnected at offset {offset}")]
    Disconnected { offset: usize },

    #[error("conversion cancelled")]
    Cancelled,
}

/// Best single conversion for a reading, if any.
pub fn convert(
    dict: &dyn Dictionary,
    conn: &ConnectionMatrix,
    reading: &str,
) -> Result<Option<Candidate>, ConvertError> {
    Ok(convert_nbest(dict, conn, reading, None, None, 1)?
        .into_iter()
        .next())
}

/// N-best conversion covering the whole reading, ranked ascending by cost.
///
/// An empty reading yields an empty list. Forced `boundaries` prune
/// crossing nodes during lattice construction; `cancel` is polled once per
/// offset during the DP sweep.
pub fn convert_nbest(
    dict: &dyn Dictionary,
    conn: &ConnectionMatrix,
    reading: &str,
    boundaries: Option<&Boundaries>,
    cancel: Option<&CancelToken>,
    n: usize,
) -> Result<Vec<Candidate>, ConvertError> {
    if reading.is_empty() || n == 0 {
        return Ok(Vec::new());
    }
    let cost_fn = DefaultCostFunction::new(conn);
    let lattice = build_lattice(dict, reading, boundaries);
    decode_nbest(&lattice, &cost_fn, n, cancel)
}
