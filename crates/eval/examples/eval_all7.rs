// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0
//
// Run with:
//
// ```bash
// $ cargo r --release --example eval_all7
// ...
// Total hands      133784560
//
// High Card:       23294460
// One Pair:        58627800
// Two Pair:        31433400
// Three of a Kind: 6461620
// Straight:        6180020
// Flush:           4047644
// Full House:      3473184
// Four of a Kind:  224848
// Straight Flush:  37260
// Royal Flush:     4324
// ```
use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::Instant,
};

use holdem_cards::{Card, Deck};
use holdem_eval::{HandCategory, evaluate7};

fn main() {
    const NUM_TASKS: usize = 8;

    // Per task counters to avoid contention.
    let counters = (0..NUM_TASKS)
        .map(|_| HandCategory::ALL.map(|_| AtomicU64::new(0)))
        .collect::<Vec<_>>();

    let now = Instant::now();
    Deck::default().par_for_each(NUM_TASKS, 7, |task_id, hand| {
        let hand: &[Card; 7] = hand.try_into().expect("7 cards hand");
        let category = evaluate7(hand).category();
        counters[task_id][category as usize].fetch_add(1, Ordering::Relaxed);
    });

    let elapsed = now.elapsed().as_secs_f64();
    let counts = HandCategory::ALL.map(|c| {
        counters
            .iter()
            .map(|t| t[c as usize].load(Ordering::Relaxed))
            .sum::<u64>()
    });

    let total = counts.iter().sum::<u64>();
    println!("Total hands      {total}");
    println!("Elapsed:         {elapsed:.3}s");
    println!("Hands/sec:       {:.0}\n", total as f64 / elapsed);

    for (category, count) in HandCategory::ALL.iter().zip(counts) {
        println!("{:<17}{count}", format!("{}:", category.name()));
    }
}
