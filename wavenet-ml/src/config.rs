//! Configuration
//!
//! Plain serde structs with defaults matching the reference WaveNet shape.
//! Both load from JSON and validate on load.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::dilation::StridedWindow;
use crate::error::{Result, WaveNetError};

/// Discretized mixture-of-logistics settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MixtureConfig {
    /// Number of quantization bins over [-1, 1]
    pub bin_count: usize,
    /// Floor applied to log-scales before use
    pub log_scale_min: f64,
}

impl Default for MixtureConfig {
    fn default() -> Self {
        Self {
            bin_count: 256,
            log_scale_min: -7.0,
        }
    }
}

impl MixtureConfig {
    /// 16-bit audio quantization
    pub fn sixteen_bit() -> Self {
        Self {
            bin_count: 65536,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.bin_count < 2 {
            return Err(WaveNetError::ConfigError(format!(
                "bin_count must be at least 2 (got {})",
                self.bin_count
            )));
        }
        if !self.log_scale_min.is_finite() {
            return Err(WaveNetError::ConfigError(
                "log_scale_min must be finite".to_string(),
            ));
        }
        Ok(())
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_json_str(&std::fs::read_to_string(path)?)
    }
}

/// Shape of a stack of dilated causal convolution layers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StackConfig {
    /// Layers per block; dilation doubles from 1 within a block
    pub layers: usize,
    pub blocks: usize,
    pub kernel_size: usize,
    pub residual_channels: usize,
    /// Layout of the tensor entering the first layer
    pub init_dilation: usize,
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            layers: 10,
            blocks: 4,
            kernel_size: 2,
            residual_channels: 32,
            init_dilation: 1,
        }
    }
}

impl StackConfig {
    /// Three single-channel layers (dilations 1, 2, 4)
    pub fn tiny() -> Self {
        Self {
            layers: 3,
            blocks: 1,
            kernel_size: 2,
            residual_channels: 1,
            init_dilation: 1,
        }
    }

    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("layers", self.layers),
            ("blocks", self.blocks),
            ("kernel_size", self.kernel_size),
            ("residual_channels", self.residual_channels),
            ("init_dilation", self.init_dilation),
        ];
        for (name, value) in fields {
            if value == 0 {
                return Err(WaveNetError::ConfigError(format!("{} must be positive", name)));
            }
        }
        if self.layers >= usize::BITS as usize {
            return Err(WaveNetError::ConfigError(format!(
                "layers must be below {} (got {})",
                usize::BITS,
                self.layers
            )));
        }

        // Largest queue buffer, in bytes, must be addressable
        let widest = self.queue_capacity(1usize << (self.layers - 1))?;
        widest
            .checked_mul(self.residual_channels)
            .and_then(|n| n.checked_mul(std::mem::size_of::<f64>()))
            .filter(|&bytes| bytes <= isize::MAX as usize)
            .ok_or_else(|| {
                WaveNetError::ConfigError(format!(
                    "queue of {} samples x {} channels does not fit in memory",
                    widest, self.residual_channels
                ))
            })?;
        Ok(())
    }

    pub fn num_layers(&self) -> usize {
        self.layers * self.blocks
    }

    /// Dilation of every layer, in stack order
    pub fn dilations(&self) -> Vec<usize> {
        (0..self.blocks)
            .flat_map(|_| (0..self.layers).map(|i| 1usize << i))
            .collect()
    }

    /// `(init_dilation, dilation)` arguments each layer passes to
    /// [`dilate`](crate::dilation::dilate) in the batched forward pass
    pub fn dilation_schedule(&self) -> Vec<(usize, usize)> {
        let mut previous = self.init_dilation;
        self.dilations()
            .into_iter()
            .map(|d| {
                let pair = (previous, d);
                previous = d;
                pair
            })
            .collect()
    }

    /// Buffer length of a layer's generation queue
    pub fn queue_capacity(&self, dilation: usize) -> Result<usize> {
        let capacity = dilation.checked_mul(self.kernel_size).ok_or_else(|| {
            WaveNetError::ConfigError(format!(
                "queue capacity {} x {} overflows",
                dilation, self.kernel_size
            ))
        })?;
        debug_assert!(capacity >= StridedWindow::required_capacity(self.kernel_size, dilation));
        Ok(capacity)
    }

    /// Number of input samples that influence one output sample
    pub fn receptive_field(&self) -> usize {
        self.dilations()
            .iter()
            .map(|&d| (self.kernel_size - 1).saturating_mul(d))
            .fold(1usize, usize::saturating_add)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_json_str(&std::fs::read_to_string(path)?)
    }
}
