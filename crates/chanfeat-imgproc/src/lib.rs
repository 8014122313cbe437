#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// color transformations module.
pub mod color;

/// separable smoothing and aggregation filters module.
pub mod filter;

/// gradient, orientation histogram and HOG module.
pub mod gradient;

/// integral image module.
pub mod integral;

/// image padding and cropping module.
pub mod padding;

/// module containing parallelization utilities.
pub mod parallel;

/// bilinear resampling module.
pub mod resample;
