use std::path::Path;

use gabor_image::{Image, ImageDtype};
use gabor_imgproc::{
    core::{convert_scale_abs, magnitude},
    filter::{filter2d, kernel_anchor},
    normalize::{normalize, NormType},
    padding::PaddingMode,
};
use gabor_io::png::write_image_png_gray8;

use crate::{
    error::GaborError,
    kernel::GaborKernel,
    params::{DerivedParams, GaborParams, Orientation},
    response::{stretch, OutputDepth, ResponseImage, ResponseType},
};

/// A Gabor filter with its kernel built and ready to apply.
///
/// # Example
///
/// ```
/// use gabor_filter::{GaborFilter, OutputDepth, ResponseType};
/// use gabor_image::Image;
///
/// let filter = GaborFilter::from_index(2, 0).unwrap();
/// assert_eq!(filter.width(), 25);
///
/// let src = Image::<u8, 1>::from_size_fn([32, 32].into(), |x, y| [((x + y) % 8 * 30) as u8]).unwrap();
/// let response = filter.respond(&src, ResponseType::Magnitude, OutputDepth::Mono8).unwrap();
///
/// assert_eq!(response.size(), src.size());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct GaborFilter {
    derived: DerivedParams,
    kernel: GaborKernel,
}

impl GaborFilter {
    /// Derive the parameters and build the kernel.
    ///
    /// # Errors
    ///
    /// Returns [`GaborError::InvalidParameter`] for parameters outside their domain
    /// and [`GaborError::AllocationFailure`] if the kernel cannot be allocated.
    pub fn new(params: GaborParams) -> Result<Self, GaborError> {
        Self::from_derived(params.derive()?)
    }

    /// Build the kernel for parameters that were derived already.
    pub fn from_derived(derived: DerivedParams) -> Result<Self, GaborError> {
        let kernel = GaborKernel::build(&derived)?;

        log::debug!(
            "created {w}x{w} gabor kernel, scale {} at {:.4} PI in arc",
            derived.params.scale,
            derived.phi / std::f64::consts::PI,
            w = derived.width,
        );

        Ok(Self { derived, kernel })
    }

    /// Create a filter from an orientation index `mu` and a scale `nu`, with the
    /// default sigma and frequency.
    pub fn from_index(mu: i32, nu: i32) -> Result<Self, GaborError> {
        Self::new(GaborParams::new(Orientation::Index(mu), nu))
    }

    /// Create a filter from an orientation angle `phi` in radians and a scale `nu`,
    /// with the default sigma and frequency.
    pub fn from_radians(phi: f64, nu: i32) -> Result<Self, GaborError> {
        Self::new(GaborParams::new(Orientation::Radians(phi), nu))
    }

    /// The side length of the square kernel.
    pub fn width(&self) -> usize {
        self.derived.width
    }

    /// The parameters the filter was created from.
    pub fn params(&self) -> &GaborParams {
        &self.derived.params
    }

    /// The derived quantities.
    pub fn derived(&self) -> &DerivedParams {
        &self.derived
    }

    /// The sampled kernel.
    pub fn kernel(&self) -> &GaborKernel {
        &self.kernel
    }

    /// A copy of the raw kernel for the requested part.
    ///
    /// Returns the real or imaginary part, or the elementwise magnitude of both.
    pub fn kernel_matrix(&self, response: ResponseType) -> Result<Image<f32, 1>, GaborError> {
        match response {
            ResponseType::Real => Ok(self.kernel.real().clone()),
            ResponseType::Imag => Ok(self.kernel.imag().clone()),
            ResponseType::Magnitude => {
                let mut mag = Image::<f32, 1>::from_size_val(self.kernel.real().size(), 0.0)?;
                magnitude(self.kernel.real(), self.kernel.imag(), &mut mag)?;
                Ok(mag)
            }
            ResponseType::Phase => Err(GaborError::UnsupportedResponseType(response)),
        }
    }

    /// An 8-bit visualisation of the kernel, stretched to `[0, 255]`.
    pub fn kernel_image(&self, response: ResponseType) -> Result<Image<u8, 1>, GaborError> {
        let matrix = self.kernel_matrix(response)?;

        let mut stretched = Image::<f32, 1>::from_size_val(matrix.size(), 0.0)?;
        normalize(&matrix, &mut stretched, 0.0, 255.0, NormType::MinMax, None)?;

        let mut dst = Image::<u8, 1>::from_size_val(matrix.size(), 0)?;
        convert_scale_abs(&stretched, &mut dst, 1.0, 0.0)?;
        Ok(dst)
    }

    /// Write the kernel visualisation to an 8-bit grayscale PNG file.
    pub fn write_kernel(
        &self,
        file_path: impl AsRef<Path>,
        response: ResponseType,
    ) -> Result<(), GaborError> {
        let file_path = file_path.as_ref();
        let res = self
            .kernel_image(response)
            .and_then(|img| write_image_png_gray8(file_path, &img).map_err(Into::into));

        match &res {
            Ok(()) => log::info!("wrote {response} kernel to {}", file_path.display()),
            Err(e) => log::warn!("failed to write kernel {}: {e}", file_path.display()),
        }
        res
    }

    /// Filter a single channel image.
    ///
    /// The image is correlated with the kernel anchored at its centre, replicating
    /// the border pixels. [`OutputDepth::Mono8`] stretches the response to
    /// `[0, 255]`; [`OutputDepth::Float32`] returns the raw values.
    ///
    /// # Errors
    ///
    /// * [`GaborError::EmptyImage`] if `src` has no pixels.
    /// * [`GaborError::UnsupportedResponseType`] for [`ResponseType::Phase`].
    /// * [`GaborError::AllocationFailure`] if a work buffer cannot be allocated.
    pub fn respond<T>(
        &self,
        src: &Image<T, 1>,
        response: ResponseType,
        depth: OutputDepth,
    ) -> Result<ResponseImage, GaborError>
    where
        T: ImageDtype,
    {
        let values = self.response_values(src, response)?;

        match depth {
            OutputDepth::Float32 => Ok(ResponseImage::Float32(values)),
            OutputDepth::Mono8 => Ok(ResponseImage::Mono8(stretch(&values, 255.0)?)),
        }
    }

    /// Filter an image and return the raw floating point response.
    pub fn respond_f32<T>(
        &self,
        src: &Image<T, 1>,
        response: ResponseType,
    ) -> Result<Image<f32, 1>, GaborError>
    where
        T: ImageDtype,
    {
        self.response_values(src, response)
    }

    /// Filter an image and return the response stretched to 8 bits.
    pub fn respond_u8<T>(
        &self,
        src: &Image<T, 1>,
        response: ResponseType,
    ) -> Result<Image<u8, 1>, GaborError>
    where
        T: ImageDtype,
    {
        stretch(&self.response_values(src, response)?, 255.0)
    }

    fn response_values<T>(
        &self,
        src: &Image<T, 1>,
        response: ResponseType,
    ) -> Result<Image<f32, 1>, GaborError>
    where
        T: ImageDtype,
    {
        if src.size().is_empty() {
            return Err(GaborError::EmptyImage {
                width: src.width(),
                height: src.height(),
            });
        }

        match response {
            ResponseType::Real => self.correlate(src, self.kernel.real()),
            ResponseType::Imag => self.correlate(src, self.kernel.imag()),
            ResponseType::Magnitude => {
                let re = self.correlate(src, self.kernel.real())?;
                let im = self.correlate(src, self.kernel.imag())?;
                let mut mag = Image::<f32, 1>::from_size_val(src.size(), 0.0)?;
                magnitude(&re, &im, &mut mag)?;
                Ok(mag)
            }
            ResponseType::Phase => Err(GaborError::UnsupportedResponseType(response)),
        }
    }

    fn correlate<T>(
        &self,
        src: &Image<T, 1>,
        kernel: &Image<f32, 1>,
    ) -> Result<Image<f32, 1>, GaborError>
    where
        T: ImageDtype,
    {
        let mut dst = Image::<f32, 1>::from_size_val(src.size(), 0.0)?;
        filter2d(src, &mut dst, kernel, kernel_anchor(kernel), PaddingMode::Replicate)?;
        Ok(dst)
    }
}
