#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

#[doc(inline)]
pub use gabor_image as image;

#[doc(inline)]
pub use gabor_imgproc as imgproc;

#[doc(inline)]
pub use gabor_io as io;

#[doc(inline)]
pub use gabor_filter as filter;
