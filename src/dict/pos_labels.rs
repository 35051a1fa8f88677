use std::collections::HashMap;

use super::DataError;

/// POS tag → human-readable label, for diagnostics only.
///
/// Parsed from the data manager's id definition text, one `id label` pair
/// per line. Scoring never consults labels; a snapshot without them is
/// fully functional.
#[derive(Debug, Default)]
pub struct PosLabels {
    labels: HashMap<u16, String>,
}

impl PosLabels {
    /// Parse `id label` lines. Blank lines are skipped; anything else that
    /// does not start with a tag id is rejected.
    pub fn parse(text: &str) -> Result<Self, DataError> {
        let mut labels = HashMap::new();
        for (idx, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let malformed = || DataError::PosLabelLine {
                line: idx + 1,
                text: line.to_string(),
            };
            let (id, label) = line.split_once(' ').ok_or_else(malformed)?;
            let id: u16 = id.parse().map_err(|_| malformed())?;
            let label = label.trim();
            if label.is_empty() {
                return Err(malformed());
            }
            labels.insert(id, label.to_string());
        }
        Ok(Self { labels })
    }

    pub fn label(&self, pos: u16) -> Option<&str> {
        self.labels.get(&pos).map(String::as_str)
    }
}
