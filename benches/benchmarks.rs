criterion::criterion_main!(benches);
criterion::criterion_group! {
    name = benches;
    config = criterion::Criterion::default()
        .without_plots()
        .noise_threshold(3.0)
        .significance_level(0.01)
        .sample_size(10)
        .measurement_time(std::time::Duration::from_secs(1));
    targets =
        spinning_standard_reels,
        evaluating_random_outcome,
        analyzing_default_table,
        playing_in_memory,
}

fn spinning_standard_reels(c: &mut criterion::Criterion) {
    let mut reels = Reels::standard(Some(0));
    c.bench_function("spin three standard reels", |b| b.iter(|| reels.spin()));
}

fn evaluating_random_outcome(c: &mut criterion::Criterion) {
    let table = PayTable::default();
    let wager = dec!(10.00);
    c.bench_function("evaluate a random Outcome", |b| {
        b.iter(|| table.evaluate(&Outcome::random(), wager))
    });
}

fn analyzing_default_table(c: &mut criterion::Criterion) {
    let table = PayTable::default();
    c.bench_function("exhaust all 343 Outcomes for exact RTP", |b| {
        b.iter(|| Analysis::exact(&table, &Symbol::all()))
    });
}

fn playing_in_memory(c: &mut criterion::Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let player = ID::default();
    let machine = Machine::new(
        Arc::new(Memory::default()),
        Rigged::from(Outcome::from((Symbol::Seven, Symbol::Seven, Symbol::Seven))),
        &Config::default(),
    );
    runtime.block_on(machine.open(player, dec!(100.00))).unwrap();
    c.bench_function("play and settle one winning spin", |b| {
        b.iter(|| runtime.block_on(machine.play(player, dec!(0.01))).unwrap())
    });
}

use payline::ledger::Memory;
use payline::machine::Machine;
use payline::paytable::Analysis;
use payline::paytable::PayTable;
use payline::reels::Outcome;
use payline::reels::Reels;
use payline::reels::Rigged;
use payline::reels::Source;
use payline::reels::Symbol;
use payline::*;
use rust_decimal_macros::dec;
use std::sync::Arc;
