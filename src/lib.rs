//! Reading-to-text conversion engine for input-method front ends.
//!
//! Builds a lattice of dictionary matches over a phonetic reading, decodes
//! it with N-best Viterbi search against a POS connection-cost matrix, and
//! post-processes the decoded paths through a rewriter pipeline. The same
//! machinery serves full conversion and incremental prediction.

pub mod converter;
pub mod dict;
pub mod engine;
pub(crate) mod numeric;
pub mod predictor;
pub mod settings;
pub mod unicode;

pub use converter::candidate::{Candidate, Segment};
pub use converter::constraint::Boundaries;
pub use converter::{CancelToken, ConvertError, Lattice, LatticeNode};
pub use dict::{
    ConnectionMatrix, DataError, DictEntry, Dictionary, PosLabels, SpanMatch, SuppressionList,
    TableDictionary,
};
pub use engine::{ConvertOptions, Engine, EngineError, EngineSnapshot};
pub use predictor::Context;
