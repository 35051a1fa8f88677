use super::DataError;

/// POS tag reserved for the BOS/EOS boundary and for fallback nodes.
pub const BOUNDARY_TAG: u16 = 0;

/// Connection cost matrix mapping (left POS, right POS) → transition cost.
/// The Viterbi decoder consults it for every adjacent node pair.
///
/// Costs are non-negative; out-of-range tags cost 0 so a sparse tag set
/// degrades to unigram scoring instead of failing.
#[derive(Debug)]
pub struct ConnectionMatrix {
    num_tags: u16,
    costs: Vec<u16>,
}

impl ConnectionMatrix {
    /// Build from a dense row-major table. `costs` must hold exactly
    /// `num_tags * num_tags` values.
    pub fn from_costs(num_tags: u16, costs: Vec<u16>) -> Result<Self, DataError> {
        let expected = num_tags as usize * num_tags as usize;
        if costs.len() != expected {
            return Err(DataError::Shape {
                num_tags,
                len: costs.len(),
            });
        }
        Ok(Self { num_tags, costs })
    }

    /// All-zero matrix, mainly for tests and unigram-only setups.
    pub fn zeroed(num_tags: u16) -> Self {
        Self {
            num_tags,
            costs: vec![0; num_tags as usize * num_tags as usize],
        }
    }

    /// Transition cost from `left` to `right`. Out-of-range tags cost 0.
    pub fn cost(&self, left: u16, right: u16) -> u16 {
        if left >= self.num_tags || right >= self.num_tags {
            return 0;
        }
        self.costs[left as usize * self.num_tags as usize + right as usize]
    }

    /// Set one cell. Only meaningful while the snapshot is being built;
    /// once shared, the matrix is read-only.
    pub fn set(&mut self, left: u16, right: u16, cost: u16) {
        if left < self.num_tags && right < self.num_tags {
            self.costs[left as usize * self.num_tags as usize + right as usize] = cost;
        }
    }

    /// Number of POS tags in this matrix.
    pub fn num_tags(&self) -> u16 {
        self.num_tags
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_costs_checks_shape() {
        assert!(ConnectionMatrix::from_costs(2, vec![0; 4]).is_ok());
        let err = ConnectionMatrix::from_costs(2, vec![0; 3]).unwrap_err();
        assert!(matches!(err, DataError::Shape { num_tags: 2, len: 3 }));
    }

    #[test]
    fn cost_lookup_and_out_of_range() {
        let mut m = ConnectionMatrix::zeroed(3);
        m.set(1, 2, 700);
        assert_eq!(m.cost(1, 2), 700);
        assert_eq!(m.cost(2, 1), 0);
        assert_eq!(m.cost(5, 1), 0);
        assert_eq!(m.cost(1, 5), 0);
    }
}
