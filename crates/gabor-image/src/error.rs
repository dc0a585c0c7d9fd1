/// An error type for the image module.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ImageError {
    /// Error when the image data is not initialized.
    #[error("Image data is not initialized")]
    ImageDataNotInitialized,

    /// Error when channel and shape are not valid.
    #[error("Data length ({0}) does not match the image size ({1})")]
    InvalidChannelShape(usize, usize),

    /// Error when two images are expected to have the same size.
    #[error("Image size mismatch ({0}x{1}) vs ({2}x{3})")]
    InvalidImageSize(usize, usize, usize, usize),

    /// Error when the pixel coordinates are out of bounds.
    #[error("Pixel index ({0}, {1}) is out of bounds ({2}x{3})")]
    PixelIndexOutOfBounds(usize, usize, usize, usize),

    /// Error when the channel index is out of bounds.
    #[error("Channel index {0} is out of bounds ({1})")]
    ChannelIndexOutOfBounds(usize, usize),

    /// Error when a filter kernel has an empty dimension.
    #[error("Invalid kernel size ({0}x{1})")]
    InvalidKernelLength(usize, usize),

    /// Error when the filter anchor lies outside the kernel.
    #[error("Anchor ({0}, {1}) lies outside the kernel ({2}x{3})")]
    InvalidAnchor(usize, usize, usize, usize),

    /// Error when the requested normalization is not a norm.
    #[error("Norm type {0} cannot be used to measure an image")]
    InvalidNormType(String),

    /// Error when the pixel buffer cannot be allocated.
    #[error("Failed to allocate {0} pixels")]
    AllocationFailed(usize),
}
