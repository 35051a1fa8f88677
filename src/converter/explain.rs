//! Diagnostic view of one conversion: the lattice that was built and the
//! paths the decoder chose, with optional POS labels.
//!
//! Labels never influence scoring; this module exists for tooling and bug
//! reports.

use serde::Serialize;

use crate::dict::{ConnectionMatrix, Dictionary, PosLabels};

use super::cost::DefaultCostFunction;
use super::lattice::build_lattice;
use super::{decode_nbest, ConvertError};

#[derive(Debug, Serialize)]
pub struct ExplainResult {
    pub reading: String,
    pub char_count: usize,
    pub nodes: Vec<ExplainNode>,
    pub paths: Vec<ExplainPath>,
}

#[derive(Debug, Serialize)]
pub struct ExplainNode {
    pub start: usize,
    pub end: usize,
    pub reading: String,
    pub surface: String,
    pub cost: i32,
    pub pos: u16,
    pub pos_label: Option<String>,
    pub is_fallback: bool,
}

#[derive(Debug, Serialize)]
pub struct ExplainPath {
    pub surface: String,
    pub cost: i64,
    pub segments: Vec<ExplainSegment>,
}

#[derive(Debug, Serialize)]
pub struct ExplainSegment {
    pub reading: String,
    pub surface: String,
    pub pos: u16,
    pub pos_label: Option<String>,
}

/// Build the lattice for `reading`, decode up to `n` paths, and dump both.
pub fn explain(
    dict: &dyn Dictionary,
    conn: &ConnectionMatrix,
    labels: Option<&PosLabels>,
    reading: &str,
    n: usize,
) -> Result<ExplainResult, ConvertError> {
    let label_of = |pos: u16| labels.and_then(|l| l.label(pos)).map(str::to_string);

    let lattice = build_lattice(dict, reading, None);
    let nodes = lattice
        .nodes
        .iter()
        .map(|node| ExplainNode {
            start: node.start,
            end: node.end,
            reading: node.reading.clone(),
            surface: node.surface.clone(),
            cost: node.cost,
            pos: node.pos,
            pos_label: label_of(node.pos),
            is_fallback: node.is_fallback,
        })
        .collect();

    let cost_fn = DefaultCostFunction::new(conn);
    let decoded = if reading.is_empty() {
        Vec::new()
    } else {
        decode_nbest(&lattice, &cost_fn, n, None)?
    };
    let paths = decoded
        .into_iter()
        .map(|candidate| ExplainPath {
            surface: candidate.surface(),
            cost: candidate.cost,
            segments: candidate
                .segments
                .into_iter()
                .map(|seg| ExplainSegment {
                    pos_label: label_of(seg.pos),
                    reading: seg.reading,
                    surface: seg.surface,
                    pos: seg.pos,
                })
                .collect(),
        })
        .collect();

    Ok(ExplainResult {
        reading: reading.to_string(),
        char_count: lattice.char_count,
        nodes,
        paths,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converter::testutil::{tiny_conn, tiny_dict};

    #[test]
    fn explain_dumps_nodes_and_paths() {
        let dict = tiny_dict();
        let conn = tiny_conn();
        let labels = PosLabels::parse("1 名詞\n2 接頭辞\n3 助詞\n").unwrap();

        let result = explain(&dict, &conn, Some(&labels), "ab", 3).unwrap();
        assert_eq!(result.char_count, 2);
        assert_eq!(result.nodes.len(), 3);
        assert_eq!(result.paths[0].surface, "X");
        assert_eq!(
            result.paths[0].segments[0].pos_label.as_deref(),
            Some("名詞")
        );
    }

    #[test]
    fn explain_without_labels() {
        let dict = tiny_dict();
        let conn = tiny_conn();
        let result = explain(&dict, &conn, None, "ab", 1).unwrap();
        assert!(result.nodes.iter().all(|n| n.pos_label.is_none()));
    }
}
