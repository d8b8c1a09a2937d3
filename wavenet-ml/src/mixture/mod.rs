//! # Discretized Mixture of Logistics
//!
//! Output distribution over a signal value in [-1, 1], parameterized by the
//! network's last layer.
//!
//! ## Parameter layout
//!
//! The last axis of a parameter tensor has width `3 · nr_mix` and is read
//! in this fixed order:
//!
//! ```text
//! [ nr_mix log-weights | nr_mix means | nr_mix log-scales ]
//! ```
//!
//! ## Bin log-probability
//!
//! Each component assigns a value the logistic CDF mass of its bin
//! `[x - 1/bins, x + 1/bins]`. That difference underflows in the tails and
//! at the ends of the range, so [`BinRegime`] picks one of four
//! formulations per element.

pub mod loss;
pub mod sample;

pub use loss::{discretized_mix_logistic_loss, Reduction};
pub use sample::{sample_from_discretized_mix_logistic, sample_with_noise, MixtureNoise};

use ndarray::{s, Array2, ArrayView1, ArrayView2, ArrayViewD};

use crate::core::activations::{sigmoid, softplus};
use crate::error::{Result, WaveNetError};

/// Targets beyond ±this use the open-ended edge bins
pub const EDGE_THRESHOLD: f64 = 0.999;

/// Below this the CDF difference is replaced by a density approximation
pub const MIN_BIN_MASS: f64 = 1e-5;

/// Floor inside ln() for the CDF difference
pub const LOG_FLOOR: f64 = 1e-12;

/// Uniform draws are kept inside [UNIFORM_EPS, 1 - UNIFORM_EPS]
pub const UNIFORM_EPS: f64 = 1e-5;

/// Parameter tensor flattened to (rows, 3 · nr_mix)
#[derive(Debug, Clone)]
pub struct MixtureParams {
    leading_shape: Vec<usize>,
    nr_mix: usize,
    rows: Array2<f64>,
}

impl MixtureParams {
    /// Decompose the last axis of `params`
    pub fn split(params: ArrayViewD<f64>) -> Result<Self> {
        let Some((&width, leading)) = params.shape().split_last() else {
            return Err(WaveNetError::InvalidMixture(
                "parameter tensor must have at least one axis".to_string(),
            ));
        };
        if width == 0 || width % 3 != 0 {
            return Err(WaveNetError::InvalidMixture(format!(
                "last axis has width {}, expected a positive multiple of 3",
                width
            )));
        }

        let num_rows = leading.iter().product();
        let rows = Array2::from_shape_vec((num_rows, width), params.iter().copied().collect())
            .map_err(|e| WaveNetError::InvalidMixture(e.to_string()))?;

        Ok(Self {
            leading_shape: leading.to_vec(),
            nr_mix: width / 3,
            rows,
        })
    }

    pub fn nr_mix(&self) -> usize {
        self.nr_mix
    }

    pub fn num_rows(&self) -> usize {
        self.rows.nrows()
    }

    /// Shape of `params` without its mixture axis
    pub fn leading_shape(&self) -> &[usize] {
        &self.leading_shape
    }

    pub fn weights(&self) -> ArrayView2<'_, f64> {
        self.rows.slice(s![.., ..self.nr_mix])
    }

    pub fn means(&self) -> ArrayView2<'_, f64> {
        self.rows.slice(s![.., self.nr_mix..2 * self.nr_mix])
    }

    /// Raw log-scales, before clamping
    pub fn log_scales(&self) -> ArrayView2<'_, f64> {
        self.rows.slice(s![.., 2 * self.nr_mix..])
    }

    pub fn row(&self, r: usize) -> ArrayView1<'_, f64> {
        self.rows.row(r)
    }
}

/// One component's bin around a target value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogisticBin {
    pub pos_in: f64,
    pub neg_in: f64,
    pub mid_in: f64,
    pub log_scale: f64,
    pub bin_count: usize,
}

impl LogisticBin {
    /// `log_scale` must already be clamped
    pub fn new(target: f64, mean: f64, log_scale: f64, bin_count: usize) -> Self {
        let inv_scale = (-log_scale).exp();
        let distance = target - mean;
        let half_bin = 1.0 / bin_count as f64;
        Self {
            pos_in: inv_scale * (distance + half_bin),
            neg_in: inv_scale * (distance - half_bin),
            mid_in: inv_scale * distance,
            log_scale,
            bin_count,
        }
    }

    /// Probability mass of the bin under the continuous logistic CDF
    pub fn cdf_delta(&self) -> f64 {
        sigmoid(self.pos_in) - sigmoid(self.neg_in)
    }

    pub fn log_prob(&self, target: f64) -> f64 {
        BinRegime::classify(target, self.cdf_delta()).log_prob(self)
    }
}

/// Which formulation of the bin log-probability is numerically safe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinRegime {
    /// ln of the CDF difference
    BinMass,
    /// Bin mass underflowed; use the density at the bin center times the bin width
    DensityApprox,
    /// Top bin, open to +∞: ln(1 - σ(neg_in))
    UpperEdge,
    /// Bottom bin, open to -∞: ln σ(pos_in)
    LowerEdge,
}

impl BinRegime {
    /// Later rules override earlier ones: lower edge, then upper edge,
    /// then mass vs density.
    pub fn classify(target: f64, cdf_delta: f64) -> Self {
        if target < -EDGE_THRESHOLD {
            BinRegime::LowerEdge
        } else if target > EDGE_THRESHOLD {
            BinRegime::UpperEdge
        } else if cdf_delta > MIN_BIN_MASS {
            BinRegime::BinMass
        } else {
            BinRegime::DensityApprox
        }
    }

    pub fn log_prob(self, bin: &LogisticBin) -> f64 {
        match self {
            BinRegime::BinMass => bin.cdf_delta().max(LOG_FLOOR).ln(),
            BinRegime::DensityApprox => {
                let half_bins = (bin.bin_count as f64 - 1.0) / 2.0;
                bin.mid_in - bin.log_scale - 2.0 * softplus(bin.mid_in) - half_bins.ln()
            }
            BinRegime::UpperEdge => -softplus(bin.neg_in),
            BinRegime::LowerEdge => bin.pos_in - softplus(bin.pos_in),
        }
    }
}
