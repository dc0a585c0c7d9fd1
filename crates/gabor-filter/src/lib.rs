#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Filter banks over several orientations and scales.
pub mod bank;

/// Error types for the Gabor filter module.
pub mod error;

/// The applied Gabor filter and its response engine.
pub mod filter;

/// Sampling of the real and imaginary Gabor kernels.
pub mod kernel;

/// Gabor parameters and the quantities derived from them.
pub mod params;

/// Response selectors and response images.
pub mod response;

/// Two step construction of a Gabor filter.
pub mod state;

pub use crate::bank::{GaborBank, GaborBankConfig};
pub use crate::error::GaborError;
pub use crate::filter::GaborFilter;
pub use crate::kernel::GaborKernel;
pub use crate::params::{DerivedParams, GaborParams, Orientation};
pub use crate::response::{OutputDepth, ResponseImage, ResponseType};
pub use crate::state::GaborState;
