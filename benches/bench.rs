use criterion::{black_box, criterion_group, criterion_main, Criterion};

use shogi_rules::*;

criterion_group!(benches, bench);
criterion_main!(benches);

pub fn bench(c: &mut Criterion) {
    let startpos = Position::startpos();
    c.bench_function("perft_startpos_2", |b| {
        b.iter(|| perft(black_box(&startpos), 2))
    });

    let mated = sfen_decode_position("k8/2S6/RG7/9/9/9/9/9/4K4 w g 1").unwrap();
    c.bench_function("is_checkmate", |b| {
        b.iter(|| is_checkmate(black_box(mated.board()), mated.hands(), Side::Gote))
    });

    let midgame = sfen_decode_position(
        "lnsgk1snl/1r4g2/p1pppp1pp/6p2/1p3b3/2P4P1/PPSPPPP1P/2G4R1/LN2KGSNL b B 13",
    )
    .unwrap();
    c.bench_function("legal_moves_midgame", |b| {
        b.iter(|| black_box(&midgame).legal_moves())
    });
}
