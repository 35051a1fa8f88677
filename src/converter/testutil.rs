#![cfg(test)]

//! Shared fixtures for converter, predictor and engine tests.

use crate::dict::{ConnectionMatrix, DictEntry, TableDictionary};

pub fn entry(surface: &str, cost: i32, pos: u16) -> DictEntry {
    DictEntry {
        surface: surface.to_string(),
        cost,
        pos,
    }
}

/// Synthetic latin-alphabet dictionary:
/// "ab" → "X" (10, pos 1), "a" → "Y" (5, pos 2), "b" → "Z" (6, pos 3).
pub fn tiny_dict() -> TableDictionary {
    TableDictionary::from_rows([
        ("ab".to_string(), vec![entry("X", 10, 1)]),
        ("a".to_string(), vec![entry("Y", 5, 2)]),
        ("b".to_string(), vec![entry("Z", 6, 3)]),
    ])
    .unwrap()
}

/// Connection matrix for `tiny_dict`: cost(Y → Z) = 2, all else 0.
pub fn tiny_conn() -> ConnectionMatrix {
    let mut conn = ConnectionMatrix::zeroed(4);
    conn.set(2, 3, 2);
    conn
}

/// Dictionary with only a multi-unit entry, so single units fall back.
pub fn opaque_dict() -> TableDictionary {
    TableDictionary::from_rows([("ab".to_string(), vec![entry("X", 10, 1)])]).unwrap()
}

/// Kana dictionary covering a representative sentence.
pub fn word_dict() -> TableDictionary {
    TableDictionary::from_rows([
        (
            "きょう".to_string(),
            vec![entry("今日", 3000, 1), entry("京", 5000, 1)],
        ),
        ("は".to_string(), vec![entry("は", 2000, 2)]),
        ("いい".to_string(), vec![entry("良い", 3500, 3)]),
        ("てんき".to_string(), vec![entry("天気", 4000, 1)]),
        ("てん".to_string(), vec![entry("天", 5000, 1)]),
        ("き".to_string(), vec![entry("木", 4500, 1)]),
        ("です".to_string(), vec![entry("です", 2500, 4)]),
    ])
    .unwrap()
}

/// Zero-cost connection matrix for the kana dictionary's tag range.
pub fn zero_conn() -> ConnectionMatrix {
    ConnectionMatrix::zeroed(8)
}
