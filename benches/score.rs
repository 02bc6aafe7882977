use criterion::{Criterion, criterion_group, criterion_main};
use mjscore::{Hand, Ruleset};
use std::hint::black_box;

const HANDS: [&str; 6] = [
    "drdrdr mesdr",
    "b1b1b1B1 B2B3B4B5B6B7B8B8B2B2B2 fe fs fn fw MweDrw L0500",
    "B1B1B1B1B2B3B4B5B6B7B8B9DrDr fe ys MweDrw L0500",
    "s1s1s1s1 s2s2s2 wewe S3S3S3 s4s4s4 Msws3d L0500",
    "c1c1c1 c9c9 b9b9b9b9 s1s1s1 s9s9s9 Meec1w",
    "s2s2s2 s2s3s4 B1B1B1B1 c9c9c9C9 mes L0500",
];

fn bench_score(c: &mut Criterion) {
    for name in Ruleset::NAMES {
        let ruleset = Ruleset::load(name).unwrap();
        c.bench_function(&format!("score_{}", name.to_ascii_lowercase()), |b| {
            b.iter(|| {
                for s in HANDS {
                    let mut hand = Hand::new(&ruleset, black_box(s)).unwrap();
                    black_box(hand.score());
                }
            });
        });
    }
}

fn bench_load(c: &mut Criterion) {
    c.bench_function("load_ccr", |b| {
        b.iter(|| black_box(Ruleset::load("CCR").unwrap()));
    });
}

criterion_group!(benches, bench_score, bench_load);
criterion_main!(benches);
