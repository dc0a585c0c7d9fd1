#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// image basic operations module.
pub mod core;

/// image filtering module.
pub mod filter;

/// operations to normalize images.
pub mod normalize;

/// border handling for filters.
pub mod padding;

/// module containing parallization utilities.
pub mod parallel;
