//! Filter operations
//!
//! This module provides dense 2D filtering for image processing.

mod filter2d;
pub use filter2d::*;
