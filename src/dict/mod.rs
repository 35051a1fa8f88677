//! Read-only conversion data: dictionary, connection matrix, suppression
//! list, POS labels.
//!
//! Everything here is an immutable snapshot built once by the data manager
//! and shared by reference across decodes. Blob formats and their loaders
//! live outside this crate; snapshots arrive pre-parsed.

pub mod connection;
mod entry;
mod pos_labels;
mod suppression;
mod table;

pub use connection::ConnectionMatrix;
pub use entry::DictEntry;
pub use pos_labels::PosLabels;
pub use suppression::SuppressionList;
pub use table::TableDictionary;

/// Construction-time error for snapshot data handed to this crate.
///
/// Decode paths never see these: a snapshot that constructs is valid for
/// its lifetime.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("empty reading in dictionary row {row}")]
    EmptyReading { row: usize },

    #[error("empty surface for reading {reading:?}")]
    EmptySurface { reading: String },

    #[error("connection matrix shape mismatch: {num_tags} tags but {len} costs")]
    Shape { num_tags: u16, len: usize },

    #[error("malformed POS label line {line}: {text:?}")]
    PosLabelLine { line: usize, text: String },
}

/// All entries sharing one dictionary reading.
#[derive(Debug, Clone)]
pub struct SpanMatch {
    pub reading: String,
    pub entries: Vec<DictEntry>,
}

/// Read-only dictionary lookup.
///
/// Implementations must be pure functions of their snapshot: identical
/// queries return identical results in identical order for the life of the
/// snapshot. An empty result is the normal "no match" outcome, never an
/// error.
pub trait Dictionary: Send + Sync {
    /// All dictionary readings that are a prefix of `query`, ordered by
    /// decreasing reading length; entries within one reading keep their
    /// insertion order.
    fn prefix_matches(&self, query: &str) -> Vec<SpanMatch>;

    /// Exact-match entries for `reading`, in insertion order.
    fn lookup(&self, reading: &str) -> Vec<DictEntry>;

    /// Readings that strictly extend `prefix`, in lexicographic order,
    /// scanning at most `limit` readings.
    fn predict(&self, prefix: &str, limit: usize) -> Vec<SpanMatch>;
}
