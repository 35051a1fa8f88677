use serde::{Deserialize, Serialize};

/// One dictionary entry: the surface emitted for a reading span.
///
/// `cost` is a non-negative word cost (lower is preferred); `pos` is the
/// part-of-speech tag used for connection-cost lookups. Tag 0 is reserved
/// for the BOS/EOS boundary and unknown words.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictEntry {
    pub surface: String,
    pub cost: i32,
    pub pos: u16,
}
