use gabor_image::{Image, ImageDtype, ImageError};
use rayon::{
    iter::{IndexedParallelIterator, ParallelIterator},
    slice::ParallelSliceMut,
};

use crate::padding::PaddingMode;

/// Return the centre anchor `[x, y]` of a kernel, i.e. `((cols - 1) / 2, (rows - 1) / 2)`.
pub fn kernel_anchor(kernel: &Image<f32, 1>) -> [usize; 2] {
    [
        kernel.cols().saturating_sub(1) / 2,
        kernel.rows().saturating_sub(1) / 2,
    ]
}

/// Apply a dense 2D kernel to an image.
///
/// The kernel is correlated with the image (it is not flipped):
///
/// ```text
/// dst(x, y) = sum_{kx, ky} kernel(kx, ky) * src(x + kx - ax, y + ky - ay)
/// ```
///
/// where `[ax, ay]` is the anchor. Samples falling outside the image are resolved
/// with the `border` mode; with [`PaddingMode::Constant`] they contribute zero.
/// Accumulation happens in `f32` and rows are processed in parallel.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, C).
/// * `dst` - The destination image with shape (H, W, C).
/// * `kernel` - The single channel kernel, row `ky` and column `kx`.
/// * `anchor` - The kernel cell `[x, y]` aligned with the output pixel.
/// * `border` - How samples outside the image are resolved.
///
/// PRECONDITION: `src` and `dst` must have the same shape.
///
/// # Example
///
/// ```
/// use gabor_image::Image;
/// use gabor_imgproc::filter::{filter2d, kernel_anchor};
/// use gabor_imgproc::padding::PaddingMode;
///
/// let src = Image::<u8, 1>::new([3, 1].into(), vec![1, 2, 3]).unwrap();
/// let kernel = Image::<f32, 1>::new([3, 1].into(), vec![0.0, 0.0, 1.0]).unwrap();
/// let mut dst = Image::<f32, 1>::from_size_val(src.size(), 0.0).unwrap();
///
/// filter2d(&src, &mut dst, &kernel, kernel_anchor(&kernel), PaddingMode::Replicate).unwrap();
///
/// assert_eq!(dst.as_slice(), &[2.0, 3.0, 3.0]);
/// ```
pub fn filter2d<T, U, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<U, C>,
    kernel: &Image<f32, 1>,
    anchor: [usize; 2],
    border: PaddingMode,
) -> Result<(), ImageError>
where
    T: ImageDtype,
    U: ImageDtype,
{
    let (kcols, krows) = (kernel.cols(), kernel.rows());
    if kcols == 0 || krows == 0 {
        return Err(ImageError::InvalidKernelLength(kcols, krows));
    }

    let [ax, ay] = anchor;
    if ax >= kcols || ay >= krows {
        return Err(ImageError::InvalidAnchor(ax, ay, kcols, krows));
    }

    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    let (cols, rows) = (src.cols(), src.rows());
    if cols == 0 || rows == 0 {
        return Ok(());
    }

    // source column of every (x, kx) tap, shared by all rows
    let col_taps = (0..cols)
        .flat_map(move |x| {
            (0..kcols)
                .map(move |kx| border.map_index(x as isize + kx as isize - ax as isize, cols))
        })
        .collect::<Vec<_>>();

    let src_data = src.as_slice();
    let kernel_data = kernel.as_slice();
    let row_len = cols * C;

    dst.as_slice_mut()
        .par_chunks_exact_mut(row_len)
        .enumerate()
        .for_each(|(y, dst_row)| {
            let mut acc_row = vec![[0.0f32; C]; cols];

            for ky in 0..krows {
                let Some(sy) = border.map_index(y as isize + ky as isize - ay as isize, rows)
                else {
                    continue;
                };
                let src_row = &src_data[sy * row_len..(sy + 1) * row_len];
                let kernel_row = &kernel_data[ky * kcols..(ky + 1) * kcols];

                for (x, acc) in acc_row.iter_mut().enumerate() {
                    let taps = &col_taps[x * kcols..(x + 1) * kcols];
                    for (&k, tap) in kernel_row.iter().zip(taps.iter()) {
                        let Some(sx) = *tap else {
                            continue;
                        };
                        let src_pixel = &src_row[sx * C..(sx + 1) * C];
                        for (acc_val, &v) in acc.iter_mut().zip(src_pixel.iter()) {
                            let v: f32 = v.into();
                            *acc_val += k * v;
                        }
                    }
                }
            }

            dst_row
                .chunks_exact_mut(C)
                .zip(acc_row.iter())
                .for_each(|(dst_pixel, acc)| {
                    for (d, &a) in dst_pixel.iter_mut().zip(acc.iter()) {
                        *d = U::from_f32(a);
                    }
                });
        });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use gabor_image::ImageSize;

    fn ramp(size: ImageSize) -> Result<Image<f32, 1>, ImageError> {
        Image::from_size_fn(size, |x, y| [(y * size.width + x) as f32])
    }

    #[test]
    fn identity_kernel() -> Result<(), ImageError> {
        let src = ramp([5, 4].into())?;
        let mut kernel = Image::<f32, 1>::from_size_val([3, 3].into(), 0.0)?;
        kernel.set_pixel(1, 1, 0, 1.0)?;

        let mut dst = Image::<f32, 1>::from_size_val(src.size(), 0.0)?;
        filter2d(&src, &mut dst, &kernel, kernel_anchor(&kernel), PaddingMode::Replicate)?;

        assert_eq!(dst.as_slice(), src.as_slice());
        Ok(())
    }

    #[test]
    fn constant_image_replicate() -> Result<(), ImageError> {
        let src = Image::<u8, 1>::from_size_val([6, 5].into(), 7)?;
        let kernel = Image::<f32, 1>::from_size_val([5, 5].into(), 1.0 / 25.0)?;

        let mut dst = Image::<f32, 1>::from_size_val(src.size(), 0.0)?;
        filter2d(&src, &mut dst, &kernel, kernel_anchor(&kernel), PaddingMode::Replicate)?;

        for &v in dst.as_slice() {
            assert_relative_eq!(v, 7.0, epsilon = 1e-5);
        }
        Ok(())
    }

    #[test]
    fn constant_border_is_zero() -> Result<(), ImageError> {
        let src = Image::<f32, 1>::from_size_val([3, 3].into(), 1.0)?;
        let kernel = Image::<f32, 1>::from_size_val([3, 3].into(), 1.0)?;

        let mut dst = Image::<f32, 1>::from_size_val(src.size(), 0.0)?;
        filter2d(&src, &mut dst, &kernel, [1, 1], PaddingMode::Constant)?;

        #[rustfmt::skip]
        let expected = [
            4.0, 6.0, 4.0,
            6.0, 9.0, 6.0,
            4.0, 6.0, 4.0,
        ];
        assert_eq!(dst.as_slice(), &expected);
        Ok(())
    }

    #[test]
    fn kernel_is_not_flipped() -> Result<(), ImageError> {
        let src = ramp([4, 3].into())?;
        // picks the pixel below the anchor
        let kernel = Image::<f32, 1>::new([1, 3].into(), vec![0.0, 0.0, 1.0])?;

        let mut dst = Image::<f32, 1>::from_size_val(src.size(), 0.0)?;
        filter2d(&src, &mut dst, &kernel, [0, 1], PaddingMode::Replicate)?;

        #[rustfmt::skip]
        let expected = [
            4.0, 5.0, 6.0, 7.0,
            8.0, 9.0, 10.0, 11.0,
            8.0, 9.0, 10.0, 11.0,
        ];
        assert_eq!(dst.as_slice(), &expected);
        Ok(())
    }

    #[test]
    fn multi_channel() -> Result<(), ImageError> {
        let src = Image::<f32, 2>::new([2, 1].into(), vec![1.0, 10.0, 3.0, 30.0])?;
        let kernel = Image::<f32, 1>::new([2, 1].into(), vec![0.5, 0.5])?;

        let mut dst = Image::<f32, 2>::from_size_val(src.size(), 0.0)?;
        filter2d(&src, &mut dst, &kernel, [0, 0], PaddingMode::Replicate)?;

        assert_eq!(dst.as_slice(), &[2.0, 20.0, 3.0, 30.0]);
        Ok(())
    }

    #[test]
    fn u8_output_saturates() -> Result<(), ImageError> {
        let src = Image::<u8, 1>::new([2, 1].into(), vec![200, 100])?;
        let kernel = Image::<f32, 1>::new([1, 1].into(), vec![2.0])?;

        let mut dst = Image::<u8, 1>::from_size_val(src.size(), 0)?;
        filter2d(&src, &mut dst, &kernel, [0, 0], PaddingMode::Replicate)?;

        assert_eq!(dst.as_slice(), &[255, 200]);
        Ok(())
    }

    #[test]
    fn invalid_arguments() -> Result<(), ImageError> {
        let src = Image::<f32, 1>::from_size_val([3, 3].into(), 0.0)?;
        let mut dst = Image::<f32, 1>::from_size_val([3, 3].into(), 0.0)?;
        let mut small = Image::<f32, 1>::from_size_val([2, 3].into(), 0.0)?;
        let kernel = Image::<f32, 1>::from_size_val([3, 3].into(), 0.0)?;
        let empty = Image::<f32, 1>::new([0, 3].into(), vec![])?;

        assert_eq!(
            filter2d(&src, &mut dst, &empty, [0, 0], PaddingMode::Replicate),
            Err(ImageError::InvalidKernelLength(0, 3))
        );
        assert_eq!(
            filter2d(&src, &mut dst, &kernel, [3, 0], PaddingMode::Replicate),
            Err(ImageError::InvalidAnchor(3, 0, 3, 3))
        );
        assert_eq!(
            filter2d(&src, &mut small, &kernel, [1, 1], PaddingMode::Replicate),
            Err(ImageError::InvalidImageSize(3, 3, 2, 3))
        );
        Ok(())
    }
}
