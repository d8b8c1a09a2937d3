//! Integration tests for the dilation transform and the dilated queue

use ndarray::{s, Array1, Array2, Array3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use wavenet_ml::prelude::*;

fn random_batch(rng: &mut StdRng, n: usize, c: usize, l: usize) -> Array3<f64> {
    Array3::from_shape_fn((n, c, l), |_| rng.gen_range(-1.0..1.0))
}

/// Circular list with the modular window every dequeue must reproduce
struct ReferenceRing {
    slots: Vec<Vec<f64>>,
    in_pos: usize,
    out_pos: usize,
}

impl ReferenceRing {
    fn new(capacity: usize, channels: usize) -> Self {
        Self {
            slots: vec![vec![0.0; channels]; capacity],
            in_pos: 0,
            out_pos: 0,
        }
    }

    fn push(&mut self, sample: &[f64]) {
        self.slots[self.in_pos] = sample.to_vec();
        self.in_pos = (self.in_pos + 1) % self.slots.len();
    }

    fn window(&mut self, num_deq: usize, dilation: usize) -> Array2<f64> {
        let cap = self.slots.len();
        let channels = self.slots[0].len();
        let mut out = Array2::zeros((channels, num_deq));
        for j in 0..num_deq {
            let back = (num_deq - 1 - j) * dilation;
            let idx = (self.out_pos + cap * (back / cap + 1) - back) % cap;
            for c in 0..channels {
                out[[c, j]] = self.slots[idx][c];
            }
        }
        self.out_pos = (self.out_pos + 1) % cap;
        out
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// DILATE
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_dilation_identity() {
    let mut rng = StdRng::seed_from_u64(11);
    let x = random_batch(&mut rng, 3, 2, 10);
    for d in 1..6 {
        assert_eq!(dilate(x.view(), d, d, true).unwrap(), x);
    }
}

#[test]
fn test_dilation_round_trip() {
    let mut rng = StdRng::seed_from_u64(12);
    for &(c, l, d) in &[(1, 16, 2), (4, 24, 3), (2, 32, 8), (3, 10, 5)] {
        let x = random_batch(&mut rng, 1, c, l);
        let y = dilate(x.view(), d, 1, true).unwrap();
        assert_eq!(y.dim(), (d, c, l / d));
        let back = dilate(y.view(), 1, d, true).unwrap();
        assert_eq!(back, x);
    }
}

#[test]
fn test_round_trip_with_padding_keeps_data_region() {
    let mut rng = StdRng::seed_from_u64(13);
    let x = random_batch(&mut rng, 1, 2, 13);

    let y = dilate(x.view(), 4, 1, true).unwrap();
    let back = undilate(y.view(), 4, true).unwrap();
    assert_eq!(back.dim(), (1, 2, 16));
    assert!(back.slice(s![.., .., ..3]).iter().all(|&v| v == 0.0));
    assert_eq!(back.slice(s![.., .., 3..]), x.view());

    let y = dilate(x.view(), 4, 1, false).unwrap();
    let back = undilate(y.view(), 4, false).unwrap();
    assert_eq!(back.slice(s![.., .., ..13]), x.view());
    assert!(back.slice(s![.., .., 13..]).iter().all(|&v| v == 0.0));
}

#[test]
fn test_layer_schedule_round_trip() {
    // Walk a tensor through every layer's (init, dilation) pair and back
    let config = StackConfig {
        layers: 4,
        blocks: 2,
        ..StackConfig::tiny()
    };
    let mut rng = StdRng::seed_from_u64(14);
    let x = random_batch(&mut rng, 1, 3, 64);

    let mut y = x.clone();
    let mut current = config.init_dilation;
    for (init, d) in config.dilation_schedule() {
        assert_eq!(init, current);
        y = dilate(y.view(), d, init, true).unwrap();
        assert_eq!(y.dim().0, d);
        current = d;
    }
    assert_eq!(undilate(y.view(), current, true).unwrap(), x);
}

// ═══════════════════════════════════════════════════════════════════════════════
// QUEUE
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_queue_matches_reference_over_full_cycles() {
    let mut rng = StdRng::seed_from_u64(21);
    let channels = 3;
    for &(num_deq, dilation) in &[(1, 1), (2, 1), (2, 2), (3, 2), (2, 4), (4, 3), (1, 5)] {
        let minimum = dilation * (num_deq - 1) + 1;
        for max_length in [minimum, dilation * num_deq, minimum + 3] {
            let mut queue = DilatedQueue::new(max_length, channels, dilation, num_deq).unwrap();
            let mut reference = ReferenceRing::new(max_length, channels);
            let mut wrapped = 0;

            // three full cycles so every cursor position is visited with stale data
            for step in 0..3 * max_length {
                let sample: Vec<f64> = (0..channels).map(|_| rng.gen_range(-1.0..1.0)).collect();
                queue.enqueue(Array1::from(sample.clone()).view()).unwrap();
                reference.push(&sample);

                if StridedWindow::new(queue.out_pos(), num_deq, dilation, max_length).is_wrapped() {
                    wrapped += 1;
                }
                let got = queue.dequeue(num_deq, dilation);
                let expected = reference.window(num_deq, dilation);
                assert_eq!(
                    got, expected,
                    "num_deq={} dilation={} max_length={} step={}",
                    num_deq, dilation, max_length, step
                );
            }

            if num_deq > 1 {
                assert!(wrapped > 0, "wrap branch never exercised for ({}, {})", num_deq, dilation);
            }
        }
    }
}

#[test]
fn test_queue_reset_clears_history() {
    let mut queue = DilatedQueue::new(8, 2, 4, 2).unwrap();
    for v in 0..13 {
        queue.enqueue(Array1::from_elem(2, v as f64 + 1.0).view()).unwrap();
        let _ = queue.dequeue_default();
    }
    queue.reset();
    assert_eq!(queue.dequeue(1, 1), Array2::<f64>::zeros((2, 1)));
    assert_eq!(queue.dequeue(2, 4), Array2::<f64>::zeros((2, 2)));
}

#[test]
fn test_queue_agrees_with_batched_dilation() {
    // The generation-time window at step t must equal the column a
    // convolution over the dilated batch reads for the same output step.
    let mut rng = StdRng::seed_from_u64(31);
    let length = 32;
    let x = random_batch(&mut rng, 1, 2, length);
    let kernel_size = 2;

    for dilation in [1, 2, 4, 8] {
        let dilated = dilate(x.view(), dilation, 1, true).unwrap();
        let mut queue = DilatedQueue::new(dilation * kernel_size, 2, dilation, kernel_size).unwrap();

        for t in 0..length {
            queue.enqueue(x.slice(s![0, .., t])).unwrap();
            let window = queue.dequeue_default();

            let (lane, step) = (t % dilation, t / dilation);
            for j in 0..kernel_size {
                let taps_back = kernel_size - 1 - j;
                let expected = if step >= taps_back {
                    dilated.slice(s![lane, .., step - taps_back]).to_owned()
                } else {
                    // before the start of the sequence the queue still holds zeros
                    Array1::zeros(2)
                };
                assert_eq!(window.column(j), expected.view(), "dilation={} t={} tap={}", dilation, t, j);
            }
        }
    }
}
