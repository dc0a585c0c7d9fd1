//! Image normalization operations.
//!
//! This module provides the range and norm based rescaling used to bring filter
//! responses into a displayable or storable range.
//!
//! # Normalization Methods
//!
//! * **Min-Max Normalization** ([`NormType::MinMax`]) - Map `[min(src), max(src)]` onto `[a, b]`
//! * **Norm Normalization** ([`NormType::L1`], [`NormType::L2`], [`NormType::Inf`]) - Scale by `1 / ||src||`
//!
//! Both methods accept an optional mask: only pixels with a non-zero mask value are
//! measured and written, every other destination pixel keeps its previous value.
//!
//! # Mathematical Background
//!
//! Every method reduces to a linear transform of each pixel:
//!
//! ```text
//! dst = src * scale + shift
//! ```
//!
//! When the measured range or norm is not larger than `f64::EPSILON` the scale
//! collapses to zero and the output is the uniform value `shift`.

use num_traits::{Float, Zero};

use gabor_image::{Image, ImageError};

use crate::parallel;

/// The kind of normalization applied by [`normalize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormType {
    /// Sum of absolute values.
    L1,
    /// Euclidean norm.
    L2,
    /// Maximum absolute value.
    Inf,
    /// Linear rescale of the value range.
    MinMax,
}

impl std::fmt::Display for NormType {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let name = match self {
            NormType::L1 => "L1",
            NormType::L2 => "L2",
            NormType::Inf => "Inf",
            NormType::MinMax => "MinMax",
        };
        write!(f, "{name}")
    }
}

fn check_mask<T, const C: usize>(
    image: &Image<T, C>,
    mask: &Image<u8, 1>,
) -> Result<(), ImageError> {
    if image.size() != mask.size() {
        return Err(ImageError::InvalidImageSize(
            image.cols(),
            image.rows(),
            mask.cols(),
            mask.rows(),
        ));
    }
    Ok(())
}

/// Find the minimum and maximum values in an image.
///
/// # Arguments
///
/// * `image` - The input image of shape (height, width, channels).
///
/// # Returns
///
/// A tuple containing the minimum and maximum values in the image.
///
/// # Errors
///
/// If the image has no pixels, an error is returned.
///
/// # Example
///
/// ```
/// use gabor_image::{Image, ImageSize};
/// use gabor_imgproc::normalize::find_min_max;
///
/// let image_data = vec![0u8, 1, 0, 1, 2, 3, 0, 1, 0, 1, 2, 3];
/// let image = Image::<u8, 3>::new(
///   ImageSize {
///     width: 2,
///     height: 2,
///   },
///   image_data,
/// )
/// .unwrap();
///
/// let (min, max) = find_min_max(&image).unwrap();
/// assert_eq!(min, 0);
/// assert_eq!(max, 3);
/// ```
pub fn find_min_max<T, const C: usize>(image: &Image<T, C>) -> Result<(T, T), ImageError>
where
    T: Clone + Copy + PartialOrd,
{
    // get the first element in the image
    let first_element = match image.as_slice().iter().next() {
        Some(x) => x,
        None => return Err(ImageError::ImageDataNotInitialized),
    };

    let mut min = first_element;
    let mut max = first_element;

    for x in image.as_slice().iter() {
        if x < min {
            min = x;
        }
        if x > max {
            max = x;
        }
    }

    Ok((*min, *max))
}

/// Find the minimum and maximum values over the pixels selected by a mask.
///
/// A pixel is selected when its mask value is non-zero. When the mask selects no
/// pixel at all, `(0, 0)` is returned.
///
/// # Errors
///
/// Returns [`ImageError::InvalidImageSize`] if the mask and the image sizes differ.
pub fn find_min_max_masked<T, const C: usize>(
    image: &Image<T, C>,
    mask: &Image<u8, 1>,
) -> Result<(T, T), ImageError>
where
    T: Clone + Copy + PartialOrd + Zero,
{
    check_mask(image, mask)?;

    let mut selected = image
        .as_slice()
        .chunks_exact(C)
        .zip(mask.as_slice().iter())
        .filter(|(_, &m)| m != 0)
        .flat_map(|(pixel, _)| pixel.iter().copied());

    let Some(first) = selected.next() else {
        return Ok((T::zero(), T::zero()));
    };

    Ok(selected.fold((first, first), |(min, max), x| {
        (
            if x < min { x } else { min },
            if x > max { x } else { max },
        )
    }))
}

/// Compute the norm of an image, optionally restricted to a mask.
///
/// # Arguments
///
/// * `image` - The input image.
/// * `norm_type` - One of [`NormType::L1`], [`NormType::L2`] or [`NormType::Inf`].
/// * `mask` - Optional mask selecting the pixels to measure.
///
/// # Errors
///
/// Returns [`ImageError::InvalidNormType`] for [`NormType::MinMax`], which is not a norm.
///
/// # Example
///
/// ```
/// use gabor_image::Image;
/// use gabor_imgproc::normalize::{norm, NormType};
///
/// let image = Image::<f32, 1>::new([2, 1].into(), vec![3.0, -4.0]).unwrap();
///
/// assert_eq!(norm(&image, NormType::L1, None).unwrap(), 7.0);
/// assert_eq!(norm(&image, NormType::L2, None).unwrap(), 5.0);
/// assert_eq!(norm(&image, NormType::Inf, None).unwrap(), 4.0);
/// ```
pub fn norm<T, const C: usize>(
    image: &Image<T, C>,
    norm_type: NormType,
    mask: Option<&Image<u8, 1>>,
) -> Result<f64, ImageError>
where
    T: Float,
{
    if let Some(mask) = mask {
        check_mask(image, mask)?;
    }

    let values = image
        .as_slice()
        .chunks_exact(C)
        .enumerate()
        .filter(|(i, _)| mask.map_or(true, |m| m.as_slice()[*i] != 0))
        .flat_map(|(_, pixel)| pixel.iter())
        .map(|x| x.to_f64().unwrap_or(f64::NAN).abs());

    match norm_type {
        NormType::L1 => Ok(values.sum()),
        NormType::L2 => Ok(values.map(|x| x * x).sum::<f64>().sqrt()),
        NormType::Inf => Ok(values.fold(0.0, f64::max)),
        NormType::MinMax => Err(ImageError::InvalidNormType(norm_type.to_string())),
    }
}

/// Normalize the norm or the value range of an image.
///
/// * [`NormType::MinMax`] maps `[min(src), max(src)]` onto `[min(a, b), max(a, b)]`.
/// * [`NormType::L1`], [`NormType::L2`] and [`NormType::Inf`] scale every value by
///   `1 / norm(src)`; `a` and `b` are not used.
///
/// If the measured range or norm is not larger than `f64::EPSILON`, the scale is zero
/// and `dst` becomes uniform instead of dividing by zero.
///
/// # Arguments
///
/// * `src` - The input image of shape (height, width, channels).
/// * `dst` - The output image of shape (height, width, channels).
/// * `a` - Lower (or upper) bound of the target range.
/// * `b` - Upper (or lower) bound of the target range.
/// * `norm_type` - The normalization method.
/// * `mask` - Optional mask; unselected `dst` pixels are left unchanged.
///
/// # Example
///
/// ```
/// use gabor_image::Image;
/// use gabor_imgproc::normalize::{normalize, NormType};
///
/// let image = Image::<f32, 1>::new([3, 1].into(), vec![-1.0, 0.0, 3.0]).unwrap();
/// let mut out = Image::<f32, 1>::from_size_val(image.size(), 0.0).unwrap();
///
/// normalize(&image, &mut out, 0.0, 255.0, NormType::MinMax, None).unwrap();
///
/// assert_eq!(out.as_slice(), &[0.0, 63.75, 255.0]);
/// ```
pub fn normalize<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    a: f64,
    b: f64,
    norm_type: NormType,
    mask: Option<&Image<u8, 1>>,
) -> Result<(), ImageError>
where
    T: Float + Send + Sync,
{
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    let (scale, shift) = match norm_type {
        NormType::MinMax => {
            let (smin, smax) = match mask {
                Some(mask) => find_min_max_masked(src, mask)?,
                None => find_min_max(src)?,
            };
            let (smin, smax) = (
                smin.to_f64().unwrap_or(0.0),
                smax.to_f64().unwrap_or(0.0),
            );
            let (dmin, dmax) = (a.min(b), a.max(b));
            let scale = if smax - smin > f64::EPSILON {
                (dmax - dmin) / (smax - smin)
            } else {
                0.0
            };
            (scale, dmin - smin * scale)
        }
        NormType::L1 | NormType::L2 | NormType::Inf => {
            let n = norm(src, norm_type, mask)?;
            let scale = if n > f64::EPSILON { 1.0 / n } else { 0.0 };
            (scale, 0.0)
        }
    };

    convert_scale(src, dst, scale, shift, mask)
}

// dst = src * scale + shift, restricted to the mask when given
fn convert_scale<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    scale: f64,
    shift: f64,
    mask: Option<&Image<u8, 1>>,
) -> Result<(), ImageError>
where
    T: Float + Send + Sync,
{
    let apply = |x: T| -> T {
        let v = x.to_f64().unwrap_or(f64::NAN) * scale + shift;
        T::from(v).unwrap_or_else(T::nan)
    };

    match mask {
        None => {
            if src.size().is_empty() {
                return Ok(());
            }
            parallel::par_iter_rows_val(src, dst, |&s, d| *d = apply(s));
        }
        Some(mask) => {
            check_mask(src, mask)?;
            src.as_slice()
                .chunks_exact(C)
                .zip(dst.as_slice_mut().chunks_exact_mut(C))
                .zip(mask.as_slice().iter())
                .filter(|(_, &m)| m != 0)
                .for_each(|((src_pixel, dst_pixel), _)| {
                    for (d, &s) in dst_pixel.iter_mut().zip(src_pixel.iter()) {
                        *d = apply(s);
                    }
                });
        }
    }

    Ok(())
}

/// Normalize an image using the minimum and maximum values.
///
/// The formula for normalizing an image is:
///
/// (image - min_val) * (max - min) / (max_val - min_val) + min
///
/// A constant image is mapped to `min`.
///
/// # Arguments
///
/// * `src` - The input image of shape (height, width, channels).
/// * `dst` - The output image of shape (height, width, channels).
/// * `min` - The lower bound of the target range.
/// * `max` - The upper bound of the target range.
///
/// # Example
///
/// ```
/// use gabor_image::{Image, ImageSize};
/// use gabor_imgproc::normalize::normalize_min_max;
///
/// let image_data = vec![0.0f32, 1.0, 0.0, 1.0, 2.0, 3.0, 0.0, 1.0, 0.0, 1.0, 2.0, 3.0];
/// let image = Image::<f32, 3>::new(
///   ImageSize {
///     width: 2,
///     height: 2,
///   },
///   image_data,
/// )
/// .unwrap();
///
/// let mut image_normalized = Image::<f32, 3>::from_size_val(image.size(), 0.0).unwrap();
///
/// normalize_min_max(&image, &mut image_normalized, 0.0, 1.0).unwrap();
///
/// assert_eq!(image_normalized.num_channels(), 3);
/// assert_eq!(image_normalized.size().width, 2);
/// assert_eq!(image_normalized.size().height, 2);
/// ```
pub fn normalize_min_max<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    min: T,
    max: T,
) -> Result<(), ImageError>
where
    T: Float + Send + Sync,
{
    let (a, b) = (
        min.to_f64().unwrap_or(0.0),
        max.to_f64().unwrap_or(0.0),
    );
    normalize(src, dst, a, b, NormType::MinMax, None)
}
