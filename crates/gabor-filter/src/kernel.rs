use gabor_image::{Image, ImageError, ImageSize};

use crate::{error::GaborError, params::DerivedParams};

/// The real and imaginary parts of a sampled Gabor kernel.
///
/// Both parts are square `width x width` images. The cell in column `x` and row `y`
/// holds the value at the offsets `(x - c, y - c)` from the centre `c = (width - 1) / 2`.
#[derive(Clone, Debug, PartialEq)]
pub struct GaborKernel {
    width: usize,
    real: Image<f32, 1>,
    imag: Image<f32, 1>,
}

impl GaborKernel {
    /// Sample the kernel for the given derived parameters.
    ///
    /// The samples are computed in `f64` and stored as `f32`:
    ///
    /// ```text
    /// env  = k^2 / sigma^2 * exp(-(x^2 + y^2) * k^2 / (2 * sigma^2))
    /// real = env * (cos(k * cos(phi) * x + k * sin(phi) * y) - exp(-sigma^2 / 2))
    /// imag = env * sin(k * cos(phi) * x + k * sin(phi) * y)
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`GaborError::AllocationFailure`] if the kernel storage cannot be
    /// allocated.
    pub fn build(derived: &DerivedParams) -> Result<Self, GaborError> {
        let width = derived.width;
        let len = width
            .checked_mul(width)
            .ok_or(GaborError::AllocationFailure(usize::MAX))?;

        let sigma = derived.params.sigma;
        let k = derived.k;
        let (sin_phi, cos_phi) = derived.phi.sin_cos();

        let gain = k * k / (sigma * sigma);
        let decay = k * k / (2.0 * sigma * sigma);
        let dc = (-sigma * sigma / 2.0).exp();

        let mut real = try_alloc(len)?;
        let mut imag = try_alloc(len)?;

        let c = (width as f64 - 1.0) / 2.0;
        for y in 0..width {
            let dy = y as f64 - c;
            for x in 0..width {
                let dx = x as f64 - c;
                let env = gain * (-(dx * dx + dy * dy) * decay).exp();
                let (s, co) = (k * cos_phi * dx + k * sin_phi * dy).sin_cos();
                real.push((env * (co - dc)) as f32);
                imag.push((env * s) as f32);
            }
        }

        let size = ImageSize {
            width,
            height: width,
        };

        Ok(Self {
            width,
            real: Image::new(size, real)?,
            imag: Image::new(size, imag)?,
        })
    }

    /// The side length of the kernel.
    pub fn width(&self) -> usize {
        self.width
    }

    /// The real (even) part of the kernel.
    pub fn real(&self) -> &Image<f32, 1> {
        &self.real
    }

    /// The imaginary (odd) part of the kernel.
    pub fn imag(&self) -> &Image<f32, 1> {
        &self.imag
    }
}

fn try_alloc(len: usize) -> Result<Vec<f32>, GaborError> {
    let mut data = Vec::new();
    data.try_reserve_exact(len)
        .map_err(|_| GaborError::from(ImageError::AllocationFailed(len)))?;
    Ok(data)
}
