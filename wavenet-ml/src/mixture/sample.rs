//! Sampling from a discretized mixture of logistics
//!
//! A component is picked with the Gumbel-max trick (argmax of
//! `weight - ln(-ln u)`), then its logistic is inverted at a second uniform
//! draw. All randomness enters through [`MixtureNoise`], so the sampler
//! itself is a pure function of parameters and noise.

use ndarray::{Array1, Array2, ArrayD, ArrayViewD, IxDyn};
use rand::distributions::{Distribution, Uniform};
use rand::Rng;
use tracing::warn;

use super::{MixtureParams, UNIFORM_EPS};
use crate::config::MixtureConfig;
use crate::error::{Result, WaveNetError};

/// Uniform draws in [UNIFORM_EPS, 1 - UNIFORM_EPS] consumed by one sampling call
#[derive(Debug, Clone, PartialEq)]
pub struct MixtureNoise {
    /// (rows, nr_mix), one per mixture weight
    pub gumbel: Array2<f64>,
    /// (rows,), one per selected component
    pub logistic: Array1<f64>,
}

impl MixtureNoise {
    pub fn draw<R: Rng + ?Sized>(rng: &mut R, rows: usize, nr_mix: usize) -> Self {
        let uniform = Uniform::new_inclusive(UNIFORM_EPS, 1.0 - UNIFORM_EPS);
        let gumbel = Array2::from_shape_fn((rows, nr_mix), |_| uniform.sample(rng));
        let logistic = Array1::from_shape_fn(rows, |_| uniform.sample(rng));
        Self { gumbel, logistic }
    }
}

/// Deterministic sampler: one value in [-1, 1] per row of `params`.
///
/// Output shape is `params` without its last axis.
pub fn sample_with_noise(
    params: ArrayViewD<f64>,
    noise: &MixtureNoise,
    config: &MixtureConfig,
) -> Result<ArrayD<f64>> {
    sample_split(&MixtureParams::split(params)?, noise, config)
}

fn sample_split(mix: &MixtureParams, noise: &MixtureNoise, config: &MixtureConfig) -> Result<ArrayD<f64>> {
    let (rows, nr_mix) = (mix.num_rows(), mix.nr_mix());
    if noise.gumbel.dim() != (rows, nr_mix) || noise.logistic.len() != rows {
        return Err(WaveNetError::shape(
            ((rows, nr_mix), rows),
            (noise.gumbel.dim(), noise.logistic.len()),
        ));
    }

    let weights = mix.weights();
    let means = mix.means();
    let log_scales = mix.log_scales();

    let mut samples = Vec::with_capacity(rows);
    for r in 0..rows {
        let selected = weights
            .row(r)
            .iter()
            .zip(noise.gumbel.row(r))
            .map(|(&w, &u)| w - (-u.ln()).ln())
            .enumerate()
            .fold((0, f64::NEG_INFINITY), |best, (k, score)| {
                if score > best.1 { (k, score) } else { best }
            })
            .0;

        let mean = means[[r, selected]];
        let log_scale = log_scales[[r, selected]].max(config.log_scale_min);
        let u = noise.logistic[r];
        let x = mean + log_scale.exp() * (u.ln() - (1.0 - u).ln());
        if x.is_nan() {
            warn!(row = r, mean, log_scale, "non-finite mixture parameters produced a NaN sample");
        }
        samples.push(x.clamp(-1.0, 1.0));
    }

    ArrayD::from_shape_vec(IxDyn(mix.leading_shape()), samples)
        .map_err(|e| WaveNetError::InvalidInput(e.to_string()))
}

/// Draw one value in [-1, 1] per row of `params`
pub fn sample_from_discretized_mix_logistic<R: Rng + ?Sized>(
    params: ArrayViewD<f64>,
    config: &MixtureConfig,
    rng: &mut R,
) -> Result<ArrayD<f64>> {
    let mix = MixtureParams::split(params)?;
    let noise = MixtureNoise::draw(rng, mix.num_rows(), mix.nr_mix());
    sample_split(&mix, &noise, config)
}
