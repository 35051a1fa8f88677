//! Candidate rewriters: ordered transformers over the decoded N-best list.
//!
//! Each rewriter may reorder, drop, or expand candidates. The standard
//! pipeline runs expansions in a fixed order and always terminates with the
//! suppression rewriter. Unless a rewriter deliberately inserts at a chosen
//! position, the list stays sorted by the decoder's cost field.

use std::sync::Arc;

use time::{Duration, OffsetDateTime};
use tracing::{debug, debug_span};

use crate::dict::SuppressionList;
use crate::numeric;
use crate::unicode::hiragana_to_katakana;

use super::candidate::Candidate;

/// A rewriter that can add, drop or reorder candidates.
pub trait Rewriter: Send + Sync {
    fn rewrite(&self, reading: &str, candidates: &mut Vec<Candidate>);
}

/// Worst (highest) cost among candidates, or 0 if empty.
fn worst_cost(candidates: &[Candidate]) -> i64 {
    candidates.iter().map(|c| c.cost).max().unwrap_or(0)
}

fn contains_surface(candidates: &[Candidate], surface: &str) -> bool {
    candidates.iter().any(|c| c.surface() == surface)
}

/// Ordered rewriter list applied to decoded candidates.
pub struct RewritePipeline {
    stages: Vec<Box<dyn Rewriter>>,
}

impl RewritePipeline {
    /// Standard order: expansions first, suppression always last.
    pub fn standard(suppression: Arc<SuppressionList>) -> Self {
        Self {
            stages: vec![
                Box::new(NumberRewriter),
                Box::new(DateRewriter),
                Box::new(SymbolRewriter),
                Box::new(KatakanaRewriter),
                Box::new(SuppressionRewriter { list: suppression }),
            ],
        }
    }

    pub fn run(&self, reading: &str, candidates: &mut Vec<Candidate>) {
        let _span = debug_span!("rewrite", candidates_in = candidates.len()).entered();
        for stage in &self.stages {
            stage.rewrite(reading, candidates);
        }
        debug!(candidates_out = candidates.len());
    }
}

/// Expands number readings into digit and kanji-numeral candidates.
///
/// A compound kanji numeral (二十三) is inserted at the top with the best
/// cost — the lattice rarely produces it as one span. Single-character
/// numerals and digit forms go to the tail so dictionary entries keep
/// their rank.
pub struct NumberRewriter;

impl Rewriter for NumberRewriter {
    fn rewrite(&self, reading: &str, candidates: &mut Vec<Candidate>) {
        let Some(n) = numeric::parse_number(reading) else {
            return;
        };
        let best_cost = candidates.iter().map(|c| c.cost).min().unwrap_or(0);
        let base_cost = worst_cost(candidates).saturating_add(5000);

        let kanji = numeric::to_kanji(n);
        let is_compound = kanji.chars().count() > 1;
        if !contains_surface(candidates, &kanji) {
            if is_compound {
                candidates.insert(
                    0,
                    Candidate::single(reading.to_string(), kanji, best_cost),
                );
            } else {
                candidates.push(Candidate::single(reading.to_string(), kanji, base_cost));
            }
        }

        let halfwidth = numeric::to_halfwidth(n);
        if !contains_surface(candidates, &halfwidth) {
            candidates.push(Candidate::single(reading.to_string(), halfwidth, base_cost));
        }

        let fullwidth = numeric::to_fullwidth(n);
        if !contains_surface(candidates, &fullwidth) {
            candidates.push(Candidate::single(
                reading.to_string(),
                fullwidth,
                base_cost.saturating_add(1),
            ));
        }
    }
}

/// Expands relative-day readings (きょう, あした, きのう …) into formatted
/// dates for the corresponding day.
pub struct DateRewriter;

const RELATIVE_DAYS: &[(&str, i64)] = &[
    ("きょう", 0),
    ("あした", 1),
    ("あす", 1),
    ("あさって", 2),
    ("きのう", -1),
    ("おととい", -2),
];

/// Date surfaces for one day: 2026年8月7日, 2026/08/07, 8月7日.
pub(crate) fn date_variants(date: time::Date) -> Vec<String> {
    let y = date.year();
    let m = u8::from(date.month());
    let d = date.day();
    vec![
        format!("{y}年{m}月{d}日"),
        format!("{y}/{m:02}/{d:02}"),
        format!("{m}月{d}日"),
    ]
}

impl Rewriter for DateRewriter {
    fn rewrite(&self, reading: &str, candidates: &mut Vec<Candidate>) {
        let Some(&(_, offset)) = RELATIVE_DAYS.iter().find(|&&(r, _)| r == reading) else {
            return;
        };
        let today = OffsetDateTime::now_local()
            .unwrap_or_else(|_| OffsetDateTime::now_utc())
            .date();
        let Some(date) = today.checked_add(Duration::days(offset)) else {
            return;
        };
        let base = worst_cost(candidates).saturating_add(8000);
        for (i, surface) in date_variants(date).into_iter().enumerate() {
            if contains_surface(candidates, &surface) {
                continue;
            }
            candidates.push(Candidate::single(
                reading.to_string(),
                surface,
                base.saturating_add(i as i64),
            ));
        }
    }
}

/// Alternative forms for symbol readings.
const SYMBOL_ALTERNATIVES: &[(&str, &[&str])] = &[
    ("。", &["．", "."]),
    ("、", &["，", ","]),
    ("？", &["?"]),
    ("！", &["!"]),
    ("「", &["｢", "["]),
    ("」", &["｣", "]"]),
    ("・", &["／", "/"]),
    ("〜", &["~"]),
];

/// When the reading is itself a symbol, appends its alternative forms
/// after the existing candidates.
pub struct SymbolRewriter;

impl Rewriter for SymbolRewriter {
    fn rewrite(&self, reading: &str, candidates: &mut Vec<Candidate>) {
        let Some(&(_, alternatives)) = SYMBOL_ALTERNATIVES.iter().find(|&&(r, _)| r == reading)
        else {
            return;
        };
        let base = worst_cost(candidates).saturating_add(1000);
        if !contains_surface(candidates, reading) {
            candidates.push(Candidate::single(
                reading.to_string(),
                reading.to_string(),
                base,
            ));
        }
        for (i, &alt) in alternatives.iter().enumerate() {
            if contains_surface(candidates, alt) {
                continue;
            }
            candidates.push(Candidate::single(
                reading.to_string(),
                alt.to_string(),
                base.saturating_add(1 + i as i64),
            ));
        }
    }
}

/// Appends the katakana transliteration of the reading as a low-priority
/// candidate.
pub struct KatakanaRewriter;

impl Rewriter for KatakanaRewriter {
    fn rewrite(&self, reading: &str, candidates: &mut Vec<Candidate>) {
        let katakana = hiragana_to_katakana(reading);
        if katakana == reading || contains_surface(candidates, &katakana) {
            return;
        }
        let cost = worst_cost(candidates).saturating_add(10000);
        candidates.push(Candidate::single(reading.to_string(), katakana, cost));
    }
}

/// Drops candidates whose realized surface is suppressed. Always the last
/// pipeline stage; dropping every candidate is a legal empty result.
pub struct SuppressionRewriter {
    pub list: Arc<SuppressionList>,
}

impl Rewriter for SuppressionRewriter {
    fn rewrite(&self, _reading: &str, candidates: &mut Vec<Candidate>) {
        if self.list.is_empty() {
            return;
        }
        candidates.retain(|c| !self.list.contains(&c.surface()));
    }
}
