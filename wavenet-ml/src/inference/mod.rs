//! # Incremental Generation
//!
//! Sample-at-a-time generation over a stack of dilated layers.
//!
//! Each step the network pushes the current input through its layers,
//! using one [`DilatedQueue`] per layer to recover the receptive field, and
//! returns the mixture parameters for the next sample. [`Generator`] draws
//! that sample and feeds it back as the next input.

use ndarray::{Array1, ArrayView1};
use rand::Rng;
use tracing::{debug, info};

use crate::config::{MixtureConfig, StackConfig};
use crate::dilation::DilatedQueue;
use crate::error::{Result, WaveNetError};
use crate::mixture::sample_from_discretized_mix_logistic;

/// One generation queue per dilated layer, in stack order
#[derive(Debug, Clone)]
pub struct QueueStack {
    queues: Vec<DilatedQueue>,
}

impl QueueStack {
    pub fn from_config(config: &StackConfig) -> Result<Self> {
        config.validate()?;
        let queues = config
            .dilations()
            .into_iter()
            .map(|d| {
                DilatedQueue::new(
                    config.queue_capacity(d)?,
                    config.residual_channels,
                    d,
                    config.kernel_size,
                )
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(
            layers = queues.len(),
            channels = config.residual_channels,
            receptive_field = config.receptive_field(),
            "built queue stack"
        );
        Ok(Self { queues })
    }

    pub fn from_queues(queues: Vec<DilatedQueue>) -> Self {
        Self { queues }
    }

    pub fn len(&self) -> usize {
        self.queues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queues.is_empty()
    }

    pub fn layer(&self, index: usize) -> Option<&DilatedQueue> {
        self.queues.get(index)
    }

    pub fn layer_mut(&mut self, index: usize) -> Option<&mut DilatedQueue> {
        self.queues.get_mut(index)
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, DilatedQueue> {
        self.queues.iter_mut()
    }

    pub fn dilations(&self) -> Vec<usize> {
        self.queues.iter().map(DilatedQueue::dilation).collect()
    }

    /// Reset every layer; call before each generation run
    pub fn reset(&mut self) {
        self.queues.iter_mut().for_each(DilatedQueue::reset);
    }
}

/// The network evaluated one time step at a time
pub trait StepNetwork {
    /// Consume one input sample and return the (3·nr_mix,) mixture
    /// parameters for the next one.
    fn step(&mut self, queues: &mut QueueStack, input: f64) -> Result<Array1<f64>>;
}

/// Generation loop around a [`StepNetwork`]
#[derive(Debug, Clone, Default)]
pub struct Generator {
    pub mixture: MixtureConfig,
}

impl Generator {
    pub fn new(mixture: MixtureConfig) -> Result<Self> {
        mixture.validate()?;
        Ok(Self { mixture })
    }

    /// Prime the queues with `seed` and generate `num_samples` new values.
    ///
    /// Queues are reset first. Seed samples are fed as-is; only the
    /// parameters after the last one are used. An empty seed starts from
    /// silence (a single 0.0 input). The final generated sample is returned
    /// without being fed back, so the network runs once per seed sample
    /// plus `num_samples - 1` times.
    pub fn generate<N, R>(
        &self,
        net: &mut N,
        queues: &mut QueueStack,
        seed: &[f64],
        num_samples: usize,
        rng: &mut R,
    ) -> Result<Vec<f64>>
    where
        N: StepNetwork + ?Sized,
        R: Rng + ?Sized,
    {
        queues.reset();
        info!(seed = seed.len(), num_samples, layers = queues.len(), "starting generation");

        let silence = [0.0];
        let priming = if seed.is_empty() { &silence[..] } else { seed };
        let mut params = Array1::zeros(0);
        for &x in priming {
            params = net.step(queues, x)?;
        }

        let mut generated = Vec::with_capacity(num_samples);
        for i in 0..num_samples {
            let x = self.sample_step(params.view(), rng)?;
            generated.push(x);
            if i + 1 < num_samples {
                params = net.step(queues, x)?;
            }
        }

        debug!(generated = generated.len(), "generation finished");
        Ok(generated)
    }

    fn sample_step<R: Rng + ?Sized>(&self, params: ArrayView1<f64>, rng: &mut R) -> Result<f64> {
        // 1-D parameters sample to a 0-d array
        let x = sample_from_discretized_mix_logistic(params.into_dyn(), &self.mixture, rng)?;
        x.iter()
            .next()
            .copied()
            .ok_or_else(|| WaveNetError::InvalidMixture("empty sample".to_string()))
    }
}
