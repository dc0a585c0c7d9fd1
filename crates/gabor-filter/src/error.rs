use gabor_image::ImageError;
use gabor_io::IoError;

use crate::response::ResponseType;

/// An error type for the Gabor filter module.
#[derive(thiserror::Error, Debug)]
pub enum GaborError {
    /// The parameters have not been derived yet.
    #[error("Gabor filter is not initialized")]
    NotInitialized,

    /// The parameters are derived but the kernel has not been built.
    #[error("Gabor kernel has not been created")]
    KernelNotBuilt,

    /// A parameter is outside its valid domain.
    #[error("Invalid parameter {name}: {value}")]
    InvalidParameter {
        /// The name of the parameter.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// A kernel or response buffer could not be allocated.
    #[error("Failed to allocate {0} elements")]
    AllocationFailure(usize),

    /// The response type is not produced by the engine.
    #[error("Unsupported response type {0}")]
    UnsupportedResponseType(ResponseType),

    /// The input image has no pixels.
    #[error("Input image is empty ({width}x{height})")]
    EmptyImage {
        /// The width of the rejected image.
        width: usize,
        /// The height of the rejected image.
        height: usize,
    },

    /// Error raised by an image operation.
    #[error(transparent)]
    Image(ImageError),

    /// Error raised while reading or writing a file.
    #[error(transparent)]
    Io(#[from] IoError),

    /// Error raised while parsing or serializing a bank configuration.
    #[error("Invalid bank configuration. {0}")]
    Config(#[from] serde_json::Error),
}

impl From<ImageError> for GaborError {
    fn from(e: ImageError) -> Self {
        match e {
            ImageError::AllocationFailed(len) => GaborError::AllocationFailure(len),
            e => GaborError::Image(e),
        }
    }
}
