//! # wavenet-ml - Incremental Dilated Convolution and Mixture-of-Logistics Output
//!
//! Numeric core of an autoregressive WaveNet-style model that predicts a
//! signal sample by sample.
//!
//! ## Modules
//!
//! - **core**: activations, stable log-sum-exp / log-softmax, constant padding and its crop backward
//! - **dilation**: `dilate` layout transform, `DilatedQueue` ring buffer, `StridedWindow`
//! - **mixture**: discretized mixture-of-logistics loss and sampler
//! - **inference**: per-layer queue stack and the generation loop
//! - **config**: `MixtureConfig`, `StackConfig`
//!
//! Training runs full sequences through [`dilate`] once per layer and scores
//! the network output with [`discretized_mix_logistic_loss`]. Generation
//! replaces `dilate` with a [`QueueStack`] and draws each next sample with
//! [`sample_from_discretized_mix_logistic`].
//!
//! Everything here is single-threaded and synchronous. A queue is owned by
//! its layer; sharing one across threads needs external serialization.

pub mod error;
pub use error::{Result, WaveNetError};

pub mod config;
pub use config::{MixtureConfig, StackConfig};

pub mod core;
pub use crate::core::prelude::*;

pub mod dilation;
pub use dilation::{dilate, undilate, DilatedQueue, StridedRange, StridedWindow};

pub mod mixture;
pub use mixture::{
    discretized_mix_logistic_loss, sample_from_discretized_mix_logistic, sample_with_noise,
    BinRegime, LogisticBin, MixtureNoise, MixtureParams, Reduction,
};

pub mod inference;
pub use inference::{Generator, QueueStack, StepNetwork};

/// Prelude module with common re-exports
pub mod prelude {
    pub use crate::config::{MixtureConfig, StackConfig};
    pub use crate::core::prelude::*;
    pub use crate::dilation::{dilate, undilate, DilatedQueue, StridedWindow};
    pub use crate::error::{Result, WaveNetError};
    pub use crate::inference::{Generator, QueueStack, StepNetwork};
    pub use crate::mixture::{
        discretized_mix_logistic_loss, sample_from_discretized_mix_logistic, MixtureNoise, Reduction,
    };
}
