//! # Tensor Utilities
//!
//! Constant padding along one axis and one-hot encoding.
//!
//! Padding is a pair of pure functions: `forward` pads, `backward` crops the
//! incoming gradient over exactly the region `forward` copied the input
//! into. Both directions ask [`ConstantPad1d::data_region`] for that region,
//! so the crop always mirrors the pad.

use std::ops::Range;

use ndarray::{ArrayD, ArrayViewD, Axis, IxDyn, Slice};
use serde::{Deserialize, Serialize};

use crate::error::{Result, WaveNetError};

/// Pad one axis of a tensor to an exact length with a constant
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConstantPad1d {
    pub target_size: usize,
    pub axis: usize,
    pub value: f64,
    /// Insert the fill at the start of the axis instead of the end
    pub pad_start: bool,
}

impl ConstantPad1d {
    pub fn new(target_size: usize, axis: usize, value: f64, pad_start: bool) -> Self {
        Self {
            target_size,
            axis,
            value,
            pad_start,
        }
    }

    /// Number of fill elements added to an axis of length `len`
    pub fn num_pad(&self, len: usize) -> Result<usize> {
        self.target_size
            .checked_sub(len)
            .ok_or(WaveNetError::PadTooShort {
                axis: self.axis,
                target: self.target_size,
                actual: len,
            })
    }

    /// Range of the padded axis holding the original data
    pub fn data_region(&self, len: usize) -> Result<Range<usize>> {
        let num_pad = self.num_pad(len)?;
        Ok(if self.pad_start {
            num_pad..self.target_size
        } else {
            0..len
        })
    }

    /// Range of the padded axis holding the fill value
    pub fn pad_region(&self, len: usize) -> Result<Range<usize>> {
        let num_pad = self.num_pad(len)?;
        Ok(if self.pad_start {
            0..num_pad
        } else {
            len..self.target_size
        })
    }

    fn check_axis(&self, ndim: usize) -> Result<()> {
        if self.axis >= ndim {
            return Err(WaveNetError::InvalidInput(format!(
                "pad axis {} out of range for a tensor of rank {}",
                self.axis, ndim
            )));
        }
        Ok(())
    }

    /// Pad forward
    pub fn forward(&self, input: ArrayViewD<f64>) -> Result<ArrayD<f64>> {
        self.check_axis(input.ndim())?;
        let len = input.len_of(Axis(self.axis));
        let region = self.data_region(len)?;

        let mut shape = input.shape().to_vec();
        shape[self.axis] = self.target_size;
        let mut output = ArrayD::from_elem(IxDyn(&shape), self.value);
        output
            .slice_axis_mut(Axis(self.axis), Slice::from(region))
            .assign(&input);
        Ok(output)
    }

    /// Crop backward
    ///
    /// `grad_output` has the padded shape; the result has the shape of the
    /// original input (`input_len` along `axis`). Gradient that landed on the
    /// fill is dropped.
    pub fn backward(&self, grad_output: ArrayViewD<f64>, input_len: usize) -> Result<ArrayD<f64>> {
        self.check_axis(grad_output.ndim())?;
        let got = grad_output.len_of(Axis(self.axis));
        if got != self.target_size {
            let mut expected = grad_output.shape().to_vec();
            expected[self.axis] = self.target_size;
            return Err(WaveNetError::shape(expected, grad_output.shape()));
        }
        let region = self.data_region(input_len)?;
        Ok(grad_output
            .slice_axis(Axis(self.axis), Slice::from(region))
            .to_owned())
    }
}

/// Pad `input` along `axis` to `target_size` with `value`
pub fn constant_pad_1d(
    input: ArrayViewD<f64>,
    target_size: usize,
    axis: usize,
    value: f64,
    pad_start: bool,
) -> Result<ArrayD<f64>> {
    ConstantPad1d::new(target_size, axis, value, pad_start).forward(input)
}

/// One-hot encode along a new trailing axis of length `n`
pub fn to_one_hot(indices: ArrayViewD<usize>, n: usize, fill_with: f64) -> Result<ArrayD<f64>> {
    let mut shape = indices.shape().to_vec();
    shape.push(n);
    let mut one_hot = ArrayD::zeros(IxDyn(&shape));

    let last = Axis(indices.ndim());
    for (mut lane, &idx) in one_hot.lanes_mut(last).into_iter().zip(indices.iter()) {
        if idx >= n {
            return Err(WaveNetError::InvalidInput(format!(
                "one-hot index {} out of range for {} classes",
                idx, n
            )));
        }
        lane[idx] = fill_with;
    }
    Ok(one_hot)
}
