//! # Activation Functions
//!
//! Scalar activations and numerically stable reductions used by the
//! mixture-of-logistics model.
//!
//! ## Functions
//!
//! | Function | Description |
//! |----------|-------------|
//! | `sigmoid` | Logistic sigmoid |
//! | `softplus` | ln(1 + e^x), stable for large \|x\| |
//! | `log_sum_exp` | ln Σ e^x over the last axis |
//! | `log_prob_from_logits` | Log-softmax over the last axis |

use ndarray::{ArrayD, ArrayViewD, Axis, Zip};

/// Sigmoid activation: 1 / (1 + e^(-x))
#[inline]
pub fn sigmoid(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

/// Softplus: ln(1 + e^x)
///
/// Written as max(x, 0) + ln(1 + e^(-|x|)) so neither tail overflows.
#[inline]
pub fn softplus(x: f64) -> f64 {
    x.max(0.0) + (-x.abs()).exp().ln_1p()
}

fn last_axis(x: &ArrayViewD<f64>) -> Axis {
    Axis(x.ndim().saturating_sub(1))
}

fn max_along(x: &ArrayViewD<f64>, axis: Axis) -> ArrayD<f64> {
    x.fold_axis(axis, f64::NEG_INFINITY, |&acc, &v| acc.max(v))
}

/// Log-sum-exp over the last axis: m + ln Σ e^(x - m)
///
/// The max is taken twice: once reduced (added back to the result) and
/// once with the axis kept (subtracted before exponentiating). The output
/// drops the last axis.
pub fn log_sum_exp(x: ArrayViewD<f64>) -> ArrayD<f64> {
    let axis = last_axis(&x);
    let m = max_along(&x, axis);
    let m2 = m.clone().insert_axis(axis);

    let shifted_sum = (&x - &m2).mapv(f64::exp).sum_axis(axis);
    let mut out = m;
    Zip::from(&mut out)
        .and(&shifted_sum)
        .for_each(|o, &s| *o += s.ln());
    out
}

/// Log-softmax over the last axis: x - m - ln Σ e^(x - m)
///
/// Shape is preserved.
pub fn log_prob_from_logits(x: ArrayViewD<f64>) -> ArrayD<f64> {
    let axis = last_axis(&x);
    let m = max_along(&x, axis).insert_axis(axis);
    let shifted = &x - &m;
    let norm = shifted
        .mapv(f64::exp)
        .sum_axis(axis)
        .mapv(f64::ln)
        .insert_axis(axis);
    shifted - norm
}
