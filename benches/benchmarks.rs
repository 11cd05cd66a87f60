use holdem_server::cards::{Card, Rank, Suit};
use holdem_server::eval;

criterion::criterion_main!(benches);
criterion::criterion_group! {
    name = benches;
    config = criterion::Criterion::default()
        .without_plots()
        .noise_threshold(3.0)
        .significance_level(0.01)
        .sample_size(50)
        .measurement_time(std::time::Duration::from_secs(1));
    targets =
        evaluating_five_card_hand,
        evaluating_seven_card_hand,
        naming_a_score,
}

fn five_cards() -> [Card; 5] {
    [
        Card::from((Rank::Ace, Suit::Hearts)),
        Card::from((Rank::King, Suit::Hearts)),
        Card::from((Rank::Queen, Suit::Hearts)),
        Card::from((Rank::Jack, Suit::Hearts)),
        Card::from((Rank::Ten, Suit::Hearts)),
    ]
}

fn seven_cards() -> [Card; 7] {
    [
        Card::from((Rank::Ace, Suit::Hearts)),
        Card::from((Rank::King, Suit::Hearts)),
        Card::from((Rank::Queen, Suit::Hearts)),
        Card::from((Rank::Jack, Suit::Hearts)),
        Card::from((Rank::Ten, Suit::Hearts)),
        Card::from((Rank::Two, Suit::Clubs)),
        Card::from((Rank::Three, Suit::Diamonds)),
    ]
}

fn evaluating_five_card_hand(c: &mut criterion::Criterion) {
    eval::init();
    let hand = five_cards();
    c.bench_function("evaluate a 5-card hand", |b| {
        b.iter(|| eval::eval5(hand));
    });
}

fn evaluating_seven_card_hand(c: &mut criterion::Criterion) {
    eval::init();
    let hand = seven_cards();
    c.bench_function("evaluate the best 5 of 7 cards", |b| {
        b.iter(|| eval::eval7(hand));
    });
}

fn naming_a_score(c: &mut criterion::Criterion) {
    eval::init();
    let score = eval::eval5(five_cards());
    c.bench_function("name a hand score", |b| {
        b.iter(|| eval::hand_name(score));
    });
}
