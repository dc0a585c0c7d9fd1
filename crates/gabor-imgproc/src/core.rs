use gabor_image::{Image, ImageDtype, ImageError};

use crate::parallel;

/// Scale, shift and take the absolute value of an image, saturating to `u8`.
///
/// Computes `dst = saturate_u8(round(|src * alpha + beta|))` for every element,
/// rounding half to even.
///
/// # Arguments
///
/// * `src` - The input image.
/// * `dst` - The output image with the same size as `src`.
/// * `alpha` - The scale factor.
/// * `beta` - The value added after scaling.
///
/// # Example
///
/// ```
/// use gabor_image::Image;
/// use gabor_imgproc::core::convert_scale_abs;
///
/// let src = Image::<f32, 1>::new([4, 1].into(), vec![-3.4, 0.5, 127.6, 400.0]).unwrap();
/// let mut dst = Image::<u8, 1>::from_size_val(src.size(), 0).unwrap();
///
/// convert_scale_abs(&src, &mut dst, 1.0, 0.0).unwrap();
///
/// assert_eq!(dst.as_slice(), &[3, 0, 128, 255]);
/// ```
pub fn convert_scale_abs<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<u8, C>,
    alpha: f32,
    beta: f32,
) -> Result<(), ImageError>
where
    T: ImageDtype,
{
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    if src.size().is_empty() {
        return Ok(());
    }

    parallel::par_iter_rows_val(src, dst, |&s, d| {
        let v: f32 = s.into();
        *d = u8::from_f32((v * alpha + beta).abs());
    });

    Ok(())
}

/// Compute the elementwise magnitude `sqrt(a^2 + b^2)` of two images.
///
/// # Arguments
///
/// * `a` - The first component, e.g. the real part of a complex response.
/// * `b` - The second component, e.g. the imaginary part.
/// * `dst` - The output image.
///
/// # Example
///
/// ```
/// use gabor_image::Image;
/// use gabor_imgproc::core::magnitude;
///
/// let re = Image::<f32, 1>::new([2, 1].into(), vec![3.0, -1.0]).unwrap();
/// let im = Image::<f32, 1>::new([2, 1].into(), vec![4.0, 0.0]).unwrap();
/// let mut mag = Image::<f32, 1>::from_size_val(re.size(), 0.0).unwrap();
///
/// magnitude(&re, &im, &mut mag).unwrap();
///
/// assert_eq!(mag.as_slice(), &[5.0, 1.0]);
/// ```
pub fn magnitude<const C: usize>(
    a: &Image<f32, C>,
    b: &Image<f32, C>,
    dst: &mut Image<f32, C>,
) -> Result<(), ImageError> {
    for other in [b.size(), dst.size()] {
        if a.size() != other {
            return Err(ImageError::InvalidImageSize(
                a.cols(),
                a.rows(),
                other.width,
                other.height,
            ));
        }
    }

    if a.size().is_empty() {
        return Ok(());
    }

    parallel::par_iter_rows_val_two(a, b, dst, |&x, &y, d| {
        *d = x.hypot(y);
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use gabor_image::{Image, ImageError};

    #[test]
    fn convert_scale_abs_scaled() -> Result<(), ImageError> {
        let src = Image::<u8, 1>::new([3, 1].into(), vec![0, 10, 200])?;
        let mut dst = Image::<u8, 1>::from_size_val(src.size(), 0)?;

        super::convert_scale_abs(&src, &mut dst, 2.0, -30.0)?;

        assert_eq!(dst.as_slice(), &[30, 10, 255]);
        Ok(())
    }

    #[test]
    fn magnitude_is_non_negative() -> Result<(), ImageError> {
        let re = Image::<f32, 1>::new([3, 1].into(), vec![-2.0, 0.0, 1.5])?;
        let im = Image::<f32, 1>::from_size_val(re.size(), 0.0)?;
        let mut mag = Image::<f32, 1>::from_size_val(re.size(), -1.0)?;

        super::magnitude(&re, &im, &mut mag)?;

        assert_eq!(mag.as_slice(), &[2.0, 0.0, 1.5]);
        Ok(())
    }

    #[test]
    fn magnitude_size_mismatch() -> Result<(), ImageError> {
        let re = Image::<f32, 1>::from_size_val([3, 1].into(), 0.0)?;
        let im = Image::<f32, 1>::from_size_val([1, 3].into(), 0.0)?;
        let mut mag = Image::<f32, 1>::from_size_val([3, 1].into(), 0.0)?;

        assert_eq!(
            super::magnitude(&re, &im, &mut mag),
            Err(ImageError::InvalidImageSize(3, 1, 1, 3))
        );
        Ok(())
    }
}
