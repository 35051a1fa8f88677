/// One segment of a decoded candidate: a dictionary word span, or a
/// synthetic fallback span when nothing covered the position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// Reading covered by this segment.
    pub reading: String,
    /// Emitted surface form.
    pub surface: String,
    /// POS tag used for connection costs.
    pub pos: u16,
    /// True for unknown-word fallback spans.
    pub is_fallback: bool,
}

/// A ranked conversion or prediction result.
///
/// Segments cover the decoded reading in order without gaps or overlaps;
/// `cost` is the cumulative decoding cost (lower ranks first). Candidates
/// are created per decode and discarded once the caller consumes them.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub segments: Vec<Segment>,
    pub cost: i64,
}

impl Candidate {
    /// Single-segment candidate, used by rewriters for injected variants.
    pub(crate) fn single(reading: String, surface: String, cost: i64) -> Self {
        Self {
            segments: vec![Segment {
                reading,
                surface,
                pos: 0,
                is_fallback: false,
            }],
            cost,
        }
    }

    /// Realized output text: all segment surfaces joined.
    pub fn surface(&self) -> String {
        self.segments.iter().map(|s| s.surface.as_str()).collect()
    }

    /// Covered reading: all segment readings joined.
    pub fn reading(&self) -> String {
        self.segments.iter().map(|s| s.reading.as_str()).collect()
    }
}
