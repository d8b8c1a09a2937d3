//! # Dilation
//!
//! Layout transforms and buffers that let dilated causal convolutions run
//! as ordinary convolutions, in batch during training and one sample at a
//! time during generation.
//!
//! - [`dilate`]: move between batch-major (dilation 1) and dilation-major layouts
//! - [`DilatedQueue`]: per-layer ring buffer serving the same windows online
//! - [`StridedWindow`]: the tap positions both of the above agree on

pub mod queue;
pub mod window;

pub use queue::DilatedQueue;
pub use window::{StridedRange, StridedWindow};

use ndarray::{Array3, ArrayView3, Ix3};
use tracing::trace;

use crate::core::tensor::ConstantPad1d;
use crate::error::{Result, WaveNetError};

/// Re-lay a (n, c, l) batch from `init_dilation` to `dilation`.
///
/// Time steps `dilation / init_dilation` apart are regrouped into the batch
/// axis, so a dilation-`dilation` convolution over the input equals a plain
/// convolution over the output. The result has shape
/// (⌈n·dilation/init_dilation⌉, c, ⌈l·init_dilation/dilation⌉).
///
/// If `l` is not a multiple of the dilation factor the length axis is
/// zero-padded first, at the start when `pad_start` is set. Zero is the
/// only value ever introduced.
///
/// ```
/// use ndarray::Array3;
/// use wavenet_ml::dilation::dilate;
///
/// let x = Array3::from_shape_fn((1, 1, 8), |(_, _, t)| t as f64);
/// let y = dilate(x.view(), 2, 1, true).unwrap();
/// assert_eq!(y.dim(), (2, 1, 4));
/// assert_eq!(y[[1, 0, 2]], 5.0);
/// ```
pub fn dilate(x: ArrayView3<f64>, dilation: usize, init_dilation: usize, pad_start: bool) -> Result<Array3<f64>> {
    if dilation == 0 || init_dilation == 0 {
        return Err(WaveNetError::InvalidInput(format!(
            "dilation and init_dilation must be positive (got {} and {})",
            dilation, init_dilation
        )));
    }
    if dilation == init_dilation {
        return Ok(x.to_owned());
    }

    let (n, c, l) = x.dim();

    // Smallest length that is a whole number of dilation factors. For a
    // factor below one (undilating) this is `l` itself.
    let new_l = (l * init_dilation).div_ceil(dilation) * dilation / init_dilation;
    let padded = if new_l != l {
        trace!(from = l, to = new_l, pad_start, "padding before dilation");
        ConstantPad1d::new(new_l, 2, 0.0, pad_start)
            .forward(x.into_dyn())?
            .into_dimensionality::<Ix3>()
            .map_err(|e| WaveNetError::InvalidInput(e.to_string()))?
    } else {
        x.to_owned()
    };

    let out_l = (new_l * init_dilation).div_ceil(dilation);
    let out_n = (n * dilation).div_ceil(init_dilation);
    if out_l * out_n != new_l * n {
        return Err(WaveNetError::shape([out_n, c, out_l], [n, c, new_l]));
    }

    // Permuting to (c, l, n) makes the within-channel flat offset
    // `t·n + b`; viewed as (c, out_l, out_n) and permuted back, output
    // (b', ch, t') reads offset `t'·out_n + b'`.
    Ok(Array3::from_shape_fn((out_n, c, out_l), |(b, ch, t)| {
        let offset = t * out_n + b;
        padded[[offset % n, ch, offset / n]]
    }))
}

/// Inverse of [`dilate`]: bring a tensor laid out at `init_dilation` back to
/// batch-major layout.
pub fn undilate(x: ArrayView3<f64>, init_dilation: usize, pad_start: bool) -> Result<Array3<f64>> {
    dilate(x, 1, init_dilation, pad_start)
}
