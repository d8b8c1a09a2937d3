//! Negative log-likelihood of targets under a discretized mixture of logistics

use ndarray::{arr0, Array2, ArrayD, ArrayViewD, IxDyn, Zip};
use serde::{Deserialize, Serialize};

use super::{LogisticBin, MixtureParams};
use crate::config::MixtureConfig;
use crate::core::activations::{log_prob_from_logits, log_sum_exp};
use crate::error::{Result, WaveNetError};

/// How per-element losses are combined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Reduction {
    /// Total over every element, as a 0-d array
    #[default]
    Sum,
    /// Per-element loss, mixture axis removed
    None,
}

/// Negative log-likelihood of `target` under the mixtures in `params`.
///
/// `params` has shape (..., 3·nr_mix) and `target` the same shape without
/// the last axis, with values scaled to [-1, 1].
///
/// ```
/// use ndarray::array;
/// use wavenet_ml::config::MixtureConfig;
/// use wavenet_ml::mixture::{discretized_mix_logistic_loss, Reduction};
///
/// let params = array![[0.0, 0.0, 0.0]].into_dyn();
/// let target = array![0.0].into_dyn();
/// let nll = discretized_mix_logistic_loss(
///     params.view(), target.view(), &MixtureConfig::default(), Reduction::Sum,
/// ).unwrap();
/// assert!(nll.sum() > 0.0);
/// ```
pub fn discretized_mix_logistic_loss(
    params: ArrayViewD<f64>,
    target: ArrayViewD<f64>,
    config: &MixtureConfig,
    reduction: Reduction,
) -> Result<ArrayD<f64>> {
    config.validate()?;
    let mix = MixtureParams::split(params)?;
    if target.shape() != mix.leading_shape() {
        return Err(WaveNetError::shape(mix.leading_shape(), target.shape()));
    }

    // Targets gain a mixture axis and broadcast against every component
    let targets: Vec<f64> = target.iter().copied().collect();
    let means = mix.means();
    let log_scales = mix.log_scales();
    let component_log_probs = Array2::from_shape_fn((mix.num_rows(), mix.nr_mix()), |(r, k)| {
        let log_scale = log_scales[[r, k]].max(config.log_scale_min);
        LogisticBin::new(targets[r], means[[r, k]], log_scale, config.bin_count).log_prob(targets[r])
    });

    let mut weighted = log_prob_from_logits(mix.weights().into_dyn());
    Zip::from(&mut weighted)
        .and(&component_log_probs.view().into_dyn())
        .for_each(|w, &lp| *w += lp);
    let log_likelihood = log_sum_exp(weighted.view());

    match reduction {
        Reduction::Sum => Ok(arr0(-log_likelihood.sum()).into_dyn()),
        Reduction::None => ArrayD::from_shape_vec(
            IxDyn(mix.leading_shape()),
            log_likelihood.iter().map(|ll| -ll).collect(),
        )
        .map_err(|e| WaveNetError::InvalidInput(e.to_string())),
    }
}
