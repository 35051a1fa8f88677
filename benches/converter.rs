use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use yomi_core::converter::convert_nbest;
use yomi_core::{
    ConnectionMatrix, DictEntry, Engine, EngineSnapshot, SuppressionList, TableDictionary,
};

const UNITS: [&str; 8] = ["か", "き", "く", "け", "こ", "さ", "し", "す"];

/// Dense synthetic dictionary: every 1- and 2-unit reading over a small
/// kana alphabet, two entries each, so the lattice branches realistically.
fn bench_dict() -> TableDictionary {
    let mut rows = Vec::new();
    let mut pos = 1u16;
    for a in UNITS {
        rows.push((
            a.to_string(),
            vec![
                DictEntry {
                    surface: format!("〈{a}〉"),
                    cost: 4000,
                    pos,
                },
                DictEntry {
                    surface: a.to_string(),
                    cost: 4500,
                    pos: pos + 1,
                },
            ],
        ));
        for b in UNITS {
            rows.push((
                format!("{a}{b}"),
                vec![
                    DictEntry {
                        surface: format!("〈{a}{b}〉"),
                        cost: 3500,
                        pos,
                    },
                    DictEntry {
                        surface: format!("《{a}{b}》"),
                        cost: 3800,
                        pos: pos + 1,
                    },
                ],
            ));
        }
        pos += 2;
    }
    TableDictionary::from_rows(rows).unwrap()
}

fn bench_conn() -> ConnectionMatrix {
    let n = 20u16;
    let mut conn = ConnectionMatrix::zeroed(n);
    for left in 0..n {
        for right in 0..n {
            conn.set(left, right, ((left as u32 * 31 + right as u32 * 17) % 997) as u16);
        }
    }
    conn
}

fn bench_convert(c: &mut Criterion) {
    let dict = bench_dict();
    let conn = bench_conn();
    let reading: String = UNITS.iter().cycle().take(12).copied().collect();

    c.bench_function("convert_nbest_12units_k10", |b| {
        b.iter(|| convert_nbest(&dict, &conn, black_box(&reading), None, None, 10).unwrap())
    });
}

fn bench_engine(c: &mut Criterion) {
    let engine = Engine::new(EngineSnapshot::new(
        Arc::new(bench_dict()),
        Arc::new(bench_conn()),
        Arc::new(SuppressionList::default()),
    ))
    .unwrap();
    let reading: String = UNITS.iter().cycle().take(12).copied().collect();

    c.bench_function("engine_convert_12units", |b| {
        b.iter(|| engine.convert(black_box(&reading)).unwrap())
    });
    c.bench_function("engine_predict_4units", |b| {
        b.iter(|| engine.predict(black_box(&reading[..12]), None).unwrap())
    });
}

criterion_group!(benches, bench_convert, bench_engine);
criterion_main!(benches);
