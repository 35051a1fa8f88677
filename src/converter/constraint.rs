use std::collections::BTreeSet;
use std::ops::Bound;

/// Forced segmentation boundaries, as char offsets into the reading.
///
/// Applied while the lattice is built: a node whose span strictly contains
/// a forced offset never enters the lattice. Offsets at 0, at the reading
/// end, or beyond are inert — they cannot exclude any node.
#[derive(Debug, Clone, Default)]
pub struct Boundaries {
    offsets: BTreeSet<usize>,
}

impl Boundaries {
    pub fn new(offsets: impl IntoIterator<Item = usize>) -> Self {
        Self {
            offsets: offsets.into_iter().collect(),
        }
    }

    /// Whether a span `start..end` strictly contains a forced boundary.
    /// Spans that start or end exactly on a boundary are allowed.
    pub fn crosses(&self, start: usize, end: usize) -> bool {
        self.offsets
            .range((Bound::Excluded(start), Bound::Excluded(end)))
            .next()
            .is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crosses_strictly_inside_only() {
        let b = Boundaries::new([2]);
        assert!(b.crosses(1, 3));
        assert!(b.crosses(0, 4));
        assert!(!b.crosses(0, 2), "span ending on a boundary is allowed");
        assert!(!b.crosses(2, 4), "span starting on a boundary is allowed");
        assert!(!b.crosses(3, 5));
    }

    #[test]
    fn single_unit_span_never_crosses() {
        let b = Boundaries::new([0, 1, 2, 3]);
        for start in 0..3 {
            assert!(!b.crosses(start, start + 1));
        }
    }

    #[test]
    fn empty_set_is_inert() {
        let b = Boundaries::default();
        assert!(!b.crosses(0, 100));
        assert!(b.is_empty());
    }
}
