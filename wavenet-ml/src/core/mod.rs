//! # Core Numeric Primitives
//!
//! Building blocks shared by the dilation and mixture modules:
//! - Activations and stable reductions (sigmoid, softplus, log-sum-exp, log-softmax)
//! - Tensor utilities (constant padding with its crop backward, one-hot)

pub mod activations;
pub mod tensor;

pub use activations::*;
pub use tensor::*;

/// Prelude module for core exports
pub mod prelude {
    pub use crate::core::activations::*;
    pub use crate::core::tensor::*;
}
