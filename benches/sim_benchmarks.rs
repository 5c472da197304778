use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use holdem_sim::{
    agents::{AgentFactory, StyleTable},
    game::{ActionKind, Card, Deck, Suit, evaluate},
    sim::{SimulationConfig, SimulationEngine},
};
use rand::{SeedableRng, rngs::SmallRng};

fn bench_evaluate_seven_cards(c: &mut Criterion) {
    let cards = [
        Card(14, Suit::Hearts),
        Card(13, Suit::Hearts),
        Card(7, Suit::Clubs),
        Card(7, Suit::Diamonds),
        Card(2, Suit::Spades),
        Card(10, Suit::Hearts),
        Card(4, Suit::Clubs),
    ];
    c.bench_function("evaluate_seven_cards", |b| {
        b.iter(|| evaluate(black_box(&cards)));
    });
}

fn bench_shuffle_and_deal(c: &mut Criterion) {
    let mut rng = SmallRng::seed_from_u64(1);
    c.bench_function("shuffle_and_deal_nine_hands", |b| {
        b.iter(|| {
            let mut deck = Deck::new();
            deck.shuffle(&mut rng);
            for _ in 0..9 {
                black_box(deck.deal(2).unwrap());
            }
            black_box(deck.deal(5).unwrap());
        });
    });
}

fn bench_full_hand(c: &mut Criterion) {
    c.bench_function("simulate_six_handed_hand", |b| {
        let mut factory =
            AgentFactory::with_rng(StyleTable::default(), SmallRng::seed_from_u64(7));
        let mut engine = SimulationEngine::with_rng(
            SimulationConfig::default(),
            &mut factory,
            SmallRng::seed_from_u64(8),
        );
        b.iter(|| {
            engine.start_new_hand().unwrap();
            while !engine.is_complete() {
                if engine.is_hero_turn() {
                    let available = engine.available_actions();
                    let kind = if available.contains(&ActionKind::Check) {
                        ActionKind::Check
                    } else if available.contains(&ActionKind::Call) {
                        ActionKind::Call
                    } else {
                        ActionKind::Fold
                    };
                    engine.player_action(kind, 0).unwrap();
                } else {
                    engine.agent_action().unwrap();
                }
            }
            black_box(engine.to_hand_record());
        });
    });
}

criterion_group!(
    benches,
    bench_evaluate_seven_cards,
    bench_shuffle_and_deal,
    bench_full_hand
);
criterion_main!(benches);
