use std::collections::BTreeMap;
use std::ops::Bound;

use super::{DataError, DictEntry, Dictionary, SpanMatch};

/// In-memory dictionary over a sorted reading table.
///
/// Rows are `(reading, entries)`; entries keep their insertion order, which
/// the decoder uses as the deterministic tie-break rank. The sorted map
/// gives prefix matching by direct probes and predictive lookup by range
/// scan.
pub struct TableDictionary {
    readings: BTreeMap<String, Vec<DictEntry>>,
    /// Longest reading length in chars; bounds the probe loop in
    /// `prefix_matches`.
    max_reading_chars: usize,
}

impl TableDictionary {
    /// Build from `(reading, entries)` rows.
    ///
    /// Rows sharing a reading are merged, later rows ranked after earlier
    /// ones. Empty readings and empty surfaces are rejected.
    pub fn from_rows(
        rows: impl IntoIterator<Item = (String, Vec<DictEntry>)>,
    ) -> Result<Self, DataError> {
        let mut readings: BTreeMap<String, Vec<DictEntry>> = BTreeMap::new();
        let mut max_reading_chars = 0;
        for (row, (reading, entries)) in rows.into_iter().enumerate() {
            if reading.is_empty() {
                return Err(DataError::EmptyReading { row });
            }
            if entries.iter().any(|e| e.surface.is_empty()) {
                return Err(DataError::EmptySurface { reading });
            }
            max_reading_chars = max_reading_chars.max(reading.chars().count());
            readings.entry(reading).or_default().extend(entries);
        }
        Ok(Self {
            readings,
            max_reading_chars,
        })
    }

    /// Number of distinct readings.
    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }
}

impl Dictionary for TableDictionary {
    fn prefix_matches(&self, query: &str) -> Vec<SpanMatch> {
        // Probe each query prefix from longest to shortest. One map probe
        // per length keeps the result ordered by decreasing span without a
        // sort.
        let boundaries: Vec<usize> = query
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(query.len()))
            .collect();
        let query_chars = boundaries.len() - 1;
        let mut matches = Vec::new();
        for len in (1..=query_chars.min(self.max_reading_chars)).rev() {
            let prefix = &query[..boundaries[len]];
            if let Some(entries) = self.readings.get(prefix) {
                matches.push(SpanMatch {
                    reading: prefix.to_string(),
                    entries: entries.clone(),
                });
            }
        }
        matches
    }

    fn lookup(&self, reading: &str) -> Vec<DictEntry> {
        self.readings.get(reading).cloned().unwrap_or_default()
    }

    fn predict(&self, prefix: &str, limit: usize) -> Vec<SpanMatch> {
        if prefix.is_empty() {
            return Vec::new();
        }
        self.readings
            .range::<str, _>((Bound::Excluded(prefix), Bound::Unbounded))
            .take_while(|(reading, _)| reading.starts_with(prefix))
            .take(limit)
            .map(|(reading, entries)| SpanMatch {
                reading: reading.clone(),
                entries: entries.clone(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(surface: &str, cost: i32, pos: u16) -> DictEntry {
        DictEntry {
            surface: surface.to_string(),
            cost,
            pos,
        }
    }

    fn dict() -> TableDictionary {
        TableDictionary::from_rows([
            (
                "きょう".to_string(),
                vec![entry("今日", 3000, 1), entry("京", 5000, 2)],
            ),
            ("きょうと".to_string(), vec![entry("京都", 3500, 2)]),
            ("き".to_string(), vec![entry("木", 4500, 1)]),
            ("は".to_string(), vec![entry("は", 2000, 3)]),
        ])
        .unwrap()
    }

    #[test]
    fn prefix_matches_ordered_by_decreasing_length() {
        let d = dict();
        let matches = d.prefix_matches("きょうは");
        let readings: Vec<&str> = matches.iter().map(|m| m.reading.as_str()).collect();
        assert_eq!(readings, vec!["きょう", "き"]);
    }

    #[test]
    fn prefix_matches_preserves_entry_rank() {
        let d = dict();
        let matches = d.prefix_matches("きょう");
        assert_eq!(matches[0].entries[0].surface, "今日");
        assert_eq!(matches[0].entries[1].surface, "京");
    }

    #[test]
    fn lookup_exact_only() {
        let d = dict();
        assert_eq!(d.lookup("きょう").len(), 2);
        assert!(d.lookup("きょ").is_empty());
    }

    #[test]
    fn predict_strictly_extending() {
        let d = dict();
        let matches = d.predict("きょう", 10);
        let readings: Vec<&str> = matches.iter().map(|m| m.reading.as_str()).collect();
        assert_eq!(readings, vec!["きょうと"]);

        let matches = d.predict("き", 10);
        let readings: Vec<&str> = matches.iter().map(|m| m.reading.as_str()).collect();
        assert_eq!(readings, vec!["きょう", "きょうと"]);
    }

    #[test]
    fn predict_respects_limit() {
        let d = dict();
        assert_eq!(d.predict("き", 1).len(), 1);
        assert!(d.predict("", 10).is_empty());
    }

    #[test]
    fn merged_rows_rank_after_earlier() {
        let d = TableDictionary::from_rows([
            ("あ".to_string(), vec![entry("亜", 100, 1)]),
            ("あ".to_string(), vec![entry("阿", 200, 1)]),
        ])
        .unwrap();
        let entries = d.lookup("あ");
        assert_eq!(entries[0].surface, "亜");
        assert_eq!(entries[1].surface, "阿");
    }

    #[test]
    fn rejects_empty_reading() {
        let err = TableDictionary::from_rows([(String::new(), vec![entry("x", 0, 0)])]);
        assert!(matches!(err, Err(DataError::EmptyReading { row: 0 })));
    }

    #[test]
    fn rejects_empty_surface() {
        let err = TableDictionary::from_rows([("あ".to_string(), vec![entry("", 0, 0)])]);
        assert!(matches!(err, Err(DataError::EmptySurface { .. })));
    }
}
