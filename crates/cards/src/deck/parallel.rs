// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Parallel hand iteration.
use std::thread;

use super::{Card, Deck, Rank, Suit};

/// Creates table for nck(n, k) for n <= 52 and k <= 7.
const fn make_nck() -> [[u32; 8]; 53] {
    let mut t = [[0u32; 8]; 53];
    let mut n = 0;

    while n <= 52 {
        t[n][0] = 1;

        let mut k = 1;
        while k <= 7 && k <= n {
            // nck(n, k) = nck(n-1, k-1) + nck(n-1, k)
            t[n][k] = t[n - 1][k - 1] + t[n - 1][k];
            k += 1;
        }

        n += 1;
    }

    t
}

const NCKS: [[u32; 8]; 53] = make_nck();

/// Returns the binomial coefficient for n choose k.
///
/// Panics if n > 52 or k > 7.
#[inline]
pub fn combinations(n: usize, k: usize) -> usize {
    assert!(n <= 52, "n={n} must be 0 <= n <= 52");
    assert!(k <= 7, "k={k} must be 0 <= k <= 7");
    NCKS[n][k] as usize
}

/// Uses the combinatorial number system to convert n to a
/// k-combination (see Theorem L pg. 260 Knuth 4a).
fn nth_ksubset(mut n: usize, k: usize) -> [usize; 7] {
    assert!(k <= 7);

    let mut out = [0; 7];
    for k in (0..k).rev() {
        let mut c = k;
        while combinations(c, k + 1) <= n {
            c += 1;
        }

        c = c.saturating_sub(1);
        out[k] = c;

        n = n.saturating_sub(combinations(c, k + 1));
    }

    out
}

/// Calls the given closure for count k-subsets of n elements starting from
/// the nth ksubset in colex order, k must be at least one.
pub(super) fn for_each_ksubset<F>(n: usize, k: usize, nth: usize, count: usize, mut f: F)
where
    F: FnMut(&[usize]),
{
    debug_assert!(k >= 1);
    if count == 0 {
        return;
    }

    // Algorithm L from TAOCP 4a
    let mut c = vec![0usize; k + 3];

    let ks = nth_ksubset(nth, k);
    c[1..=k].copy_from_slice(&ks[..k]);
    c[k + 1] = n;

    let mut counter = 1;
    loop {
        f(&c[1..=k]);

        counter += 1;
        if counter > count {
            break;
        }

        let mut j = 1;
        while c[j] + 1 == c[j + 1] {
            c[j] = j - 1;
            j += 1;
        }

        if j > k {
            break;
        }

        c[j] += 1;
    }
}

impl Deck {
    /// Parallel for each, calls the `f` closure for each k-cards hand.
    ///
    /// The hands are split in `num_tasks` contiguous blocks, one per task, the
    /// closure takes the task identifier (0..num_tasks) and a slice of cards of
    /// length k. Tasks can use their identifier to accumulate results without
    /// contention and the caller merges them once all tasks are done.
    ///
    /// Panics if k is not 0 <= k <= 7.
    pub fn par_for_each<F>(&self, num_tasks: usize, k: usize, f: F)
    where
        F: Fn(usize, &[Card]) + Send + Sync,
    {
        assert!(k <= 7, "0 <= k <= 7");
        assert!(num_tasks > 0);

        if k > self.cards.len() {
            return;
        }

        if k == 0 {
            f(0, &[]);
            return;
        }

        let n = self.cards.len();
        let num_hands = combinations(n, k);
        let hands_per_task = num_hands.div_ceil(num_tasks);

        thread::scope(|s| {
            for task_id in 0..num_tasks {
                let start = task_id * hands_per_task;
                if start >= num_hands {
                    break;
                }

                let count = hands_per_task.min(num_hands - start);
                let f = &f;
                s.spawn(move || {
                    let mut h = [Card::new(Rank::Ace, Suit::Diamonds); 7];
                    for_each_ksubset(n, k, start, count, |p| {
                        for (idx, &pos) in p.iter().enumerate() {
                            h[idx] = self.cards[pos];
                        }

                        f(task_id, &h[..k]);
                    });
                });
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_combinations() {
        // For n < k = 0
        assert_eq!(combinations(2, 3), 0);
        assert_eq!(combinations(0, 0), 1);

        [1, 52, 1326, 22100, 270725, 2598960, 20358520, 133784560]
            .into_iter()
            .enumerate()
            .for_each(|(k, v)| assert_eq!(combinations(52, k), v));

        [1, 23, 253, 1771, 8855, 33649, 100947, 245157]
            .into_iter()
            .enumerate()
            .for_each(|(k, v)| assert_eq!(combinations(23, k), v));

        [1, 5, 10, 10, 5, 1, 0, 0]
            .into_iter()
            .enumerate()
            .for_each(|(k, v)| assert_eq!(combinations(5, k), v));
    }

    #[test]
    fn test_nth_ksubset() {
        let mut counter = 0;
        let count = combinations(20, 4);
        for_each_ksubset(20, 4, 0, count, |s| {
            let ks = nth_ksubset(counter, 4);
            s.iter().zip(ks).for_each(|(&l, r)| assert_eq!(l, r));
            counter += 1;
        });

        assert_eq!(count, counter);

        // Start from half way.
        counter = 0;
        let nth = count / 2;
        for_each_ksubset(20, 4, nth, count - nth, |s| {
            let ks = nth_ksubset(nth + counter, 4);
            s.iter().zip(ks).for_each(|(&l, r)| assert_eq!(l, r));
            counter += 1;
        });

        assert_eq!(count - nth, counter);
    }

    #[test]
    fn par_for_each_covers_all_hands() {
        let deck = Deck::without(Deck::with_seed(1).cards()[..40].iter().copied().collect());
        assert_eq!(deck.count(), 12);

        for k in 0..=5 {
            for num_tasks in [1, 3, 7, 1000] {
                let counter = AtomicUsize::new(0);
                deck.par_for_each(num_tasks, k, |task_id, hand| {
                    assert!(task_id < num_tasks);
                    assert_eq!(hand.len(), k);
                    counter.fetch_add(1, Ordering::Relaxed);
                });

                assert_eq!(counter.load(Ordering::Relaxed), combinations(12, k));
            }
        }
    }
}
