//! Engine façade: immutable data snapshots, conversion, prediction, reload.
//!
//! A snapshot bundles the dictionary, connection matrix, suppression list
//! and optional POS labels. Snapshots are immutable once built and shared
//! by reference, so concurrent decodes need no locks; reload builds a new
//! snapshot and swaps the shared handle, and decodes in flight keep the
//! snapshot they started with.

use std::sync::{Arc, RwLock};

use tracing::debug_span;

use crate::converter::candidate::Candidate;
use crate::converter::constraint::Boundaries;
use crate::converter::rewriter::RewritePipeline;
use crate::converter::{convert_nbest, CancelToken, ConvertError};
use crate::dict::{ConnectionMatrix, Dictionary, PosLabels, SuppressionList};
use crate::predictor::{self, Context};
use crate::settings::settings;

/// One generation of conversion data.
pub struct EngineSnapshot {
    pub dict: Arc<dyn Dictionary>,
    pub conn: Arc<ConnectionMatrix>,
    pub suppression: Arc<SuppressionList>,
    pub pos_labels: Option<Arc<PosLabels>>,
    pub data_version: String,
}

impl EngineSnapshot {
    pub fn new(
        dict: Arc<dyn Dictionary>,
        conn: Arc<ConnectionMatrix>,
        suppression: Arc<SuppressionList>,
    ) -> Self {
        Self {
            dict,
            conn,
            suppression,
            pos_labels: None,
            data_version: String::new(),
        }
    }

    pub fn with_pos_labels(mut self, labels: Arc<PosLabels>) -> Self {
        self.pos_labels = Some(labels);
        self
    }

    pub fn with_data_version(mut self, version: impl Into<String>) -> Self {
        self.data_version = version.into();
        self
    }

    fn validate(&self) -> Result<(), EngineError> {
        if self.conn.num_tags() == 0 {
            return Err(EngineError::DataUnavailable(
                "connection matrix has no POS tags".to_string(),
            ));
        }
        Ok(())
    }
}

/// Construction/reload failure. A constructed engine never decodes against
/// half-initialized data: validation happens before the handle is swapped.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("conversion data unavailable: {0}")]
    DataUnavailable(String),
}

/// Per-call conversion options.
#[derive(Debug, Default)]
pub struct ConvertOptions<'a> {
    /// Forced segmentation boundaries.
    pub boundaries: Option<&'a Boundaries>,
    /// Cooperative cancellation, polled once per offset during decoding.
    pub cancel: Option<&'a CancelToken>,
    /// Cap on returned candidates; defaults to `candidates.max_results`.
    pub max_results: Option<usize>,
}

pub struct Engine {
    snapshot: RwLock<Arc<EngineSnapshot>>,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine").finish_non_exhaustive()
    }
}

impl Engine {
    pub fn new(snapshot: EngineSnapshot) -> Result<Self, EngineError> {
        snapshot.validate()?;
        Ok(Self {
            snapshot: RwLock::new(Arc::new(snapshot)),
        })
    }

    /// Swap in a freshly built snapshot. Decodes already holding the old
    /// handle finish against it.
    pub fn reload(&self, snapshot: EngineSnapshot) -> Result<(), EngineError> {
        snapshot.validate()?;
        let mut guard = self.snapshot.write().unwrap_or_else(|e| e.into_inner());
        *guard = Arc::new(snapshot);
        Ok(())
    }

    /// Handle to the current snapshot.
    pub fn snapshot(&self) -> Arc<EngineSnapshot> {
        self.snapshot
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn data_version(&self) -> String {
        self.snapshot().data_version.clone()
    }

    /// Full-coverage conversion, ranked ascending by cost.
    pub fn convert(&self, reading: &str) -> Result<Vec<Candidate>, ConvertError> {
        self.convert_with(reading, &ConvertOptions::default())
    }

    pub fn convert_with(
        &self,
        reading: &str,
        opts: &ConvertOptions,
    ) -> Result<Vec<Candidate>, ConvertError> {
        let _span = debug_span!("convert", reading).entered();
        if reading.is_empty() {
            return Ok(Vec::new());
        }
        let snap = self.snapshot();
        let max_results = opts.max_results.unwrap_or(settings().candidates.max_results);
        // Decode more than requested so suppression cannot empty the list
        // while cheaper alternatives exist in the lattice.
        let k = max_results.max(settings().decoder.nbest);
        let mut candidates = convert_nbest(
            snap.dict.as_ref(),
            &snap.conn,
            reading,
            opts.boundaries,
            opts.cancel,
            k,
        )?;
        RewritePipeline::standard(Arc::clone(&snap.suppression)).run(reading, &mut candidates);
        candidates.truncate(max_results);
        Ok(candidates)
    }

    /// Partial-coverage prediction, ranked ascending by cost.
    pub fn predict(
        &self,
        reading: &str,
        context: Option<&Context>,
    ) -> Result<Vec<Candidate>, ConvertError> {
        let _span = debug_span!("predict", reading).entered();
        if reading.is_empty() {
            return Ok(Vec::new());
        }
        let snap = self.snapshot();
        let max_results = settings().candidates.max_results;
        let k = max_results.max(settings().decoder.nbest);
        let mut candidates =
            predictor::predict(snap.dict.as_ref(), &snap.conn, reading, context, k, None)?;
        RewritePipeline::standard(Arc::clone(&snap.suppression)).run(reading, &mut candidates);
        candidates.truncate(max_results);
        Ok(candidates)
    }
}
