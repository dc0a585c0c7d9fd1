use std::path::Path;

use gabor_image::{Image, ImageDtype, ImageSize};
use gabor_imgproc::{normalize, parallel};
use gabor_io::png::{write_image_png_gray16, write_image_png_gray8};
use serde::{Deserialize, Serialize};

use crate::error::GaborError;

/// The part of the complex Gabor response to compute.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseType {
    /// The response to the real (even) kernel.
    Real,
    /// The response to the imaginary (odd) kernel.
    Imag,
    /// The modulus `sqrt(real^2 + imag^2)` of the complex response.
    Magnitude,
    /// The argument of the complex response. Not produced by the engine.
    Phase,
}

impl std::fmt::Display for ResponseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResponseType::Real => write!(f, "real"),
            ResponseType::Imag => write!(f, "imag"),
            ResponseType::Magnitude => write!(f, "magnitude"),
            ResponseType::Phase => write!(f, "phase"),
        }
    }
}

/// The element type of a filter response.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputDepth {
    /// 8-bit output, min-max stretched to `[0, 255]`.
    #[default]
    Mono8,
    /// Raw 32-bit floating point output.
    Float32,
}

/// A filter response, either stretched to 8 bits or raw floating point.
#[derive(Clone, Debug, PartialEq)]
pub enum ResponseImage {
    /// An 8-bit response.
    Mono8(Image<u8, 1>),
    /// A floating point response.
    Float32(Image<f32, 1>),
}

impl ResponseImage {
    /// The size of the response.
    pub fn size(&self) -> ImageSize {
        match self {
            ResponseImage::Mono8(img) => img.size(),
            ResponseImage::Float32(img) => img.size(),
        }
    }

    /// The depth of the response.
    pub fn depth(&self) -> OutputDepth {
        match self {
            ResponseImage::Mono8(_) => OutputDepth::Mono8,
            ResponseImage::Float32(_) => OutputDepth::Float32,
        }
    }

    /// The 8-bit image, if the response has that depth.
    pub fn as_mono8(&self) -> Option<&Image<u8, 1>> {
        match self {
            ResponseImage::Mono8(img) => Some(img),
            ResponseImage::Float32(_) => None,
        }
    }

    /// The floating point image, if the response has that depth.
    pub fn as_float32(&self) -> Option<&Image<f32, 1>> {
        match self {
            ResponseImage::Float32(img) => Some(img),
            ResponseImage::Mono8(_) => None,
        }
    }

    /// Write the response to a grayscale PNG file.
    ///
    /// 8-bit responses are written as they are. Floating point responses are
    /// min-max stretched to the full 16-bit range first.
    pub fn write_png(&self, file_path: impl AsRef<Path>) -> Result<(), GaborError> {
        let file_path = file_path.as_ref();
        let res = match self {
            ResponseImage::Mono8(img) => {
                write_image_png_gray8(file_path, img).map_err(GaborError::from)
            }
            ResponseImage::Float32(img) => stretch::<u16>(img, u16::MAX as f64)
                .and_then(|img| write_image_png_gray16(file_path, &img).map_err(Into::into)),
        };

        match &res {
            Ok(()) => log::info!("wrote {} response to {}", self.size(), file_path.display()),
            Err(e) => log::warn!("failed to write {}: {e}", file_path.display()),
        }
        res
    }
}

/// Min-max stretch a floating point image onto `[0, max]` and convert it.
pub(crate) fn stretch<T>(src: &Image<f32, 1>, max: f64) -> Result<Image<T, 1>, GaborError>
where
    T: ImageDtype,
{
    let mut stretched = Image::<f32, 1>::from_size_val(src.size(), 0.0)?;
    normalize::normalize(
        src,
        &mut stretched,
        0.0,
        max,
        normalize::NormType::MinMax,
        None,
    )?;

    let mut dst = Image::<T, 1>::from_size_val(src.size(), T::default())?;
    if !src.size().is_empty() {
        parallel::par_iter_rows_val(&stretched, &mut dst, |&v, d| *d = T::from_f32(v));
    }
    Ok(dst)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stretch_to_u8() -> Result<(), GaborError> {
        let src = Image::<f32, 1>::new([4, 1].into(), vec![-2.0, 0.0, 1.0, 2.0])?;
        let dst = stretch::<u8>(&src, 255.0)?;
        assert_eq!(dst.as_slice(), &[0, 128, 191, 255]);
        Ok(())
    }

    #[test]
    fn stretch_constant_image() -> Result<(), GaborError> {
        let src = Image::<f32, 1>::from_size_val([3, 2].into(), 4.5)?;
        let dst = stretch::<u8>(&src, 255.0)?;
        assert!(dst.as_slice().iter().all(|&v| v == 0));
        Ok(())
    }

    #[test]
    fn write_response_png() -> Result<(), Box<dyn std::error::Error>> {
        let tmp_dir = tempfile::tempdir()?;

        let mono = ResponseImage::Mono8(Image::new([2, 2].into(), vec![0, 64, 128, 255])?);
        let mono_path = tmp_dir.path().join("mono8.png");
        mono.write_png(&mono_path)?;
        let back = gabor_io::png::read_image_png_mono8(&mono_path)?;
        assert_eq!(Some(&back), mono.as_mono8());

        let float = ResponseImage::Float32(Image::new([3, 1].into(), vec![-1.0, 0.0, 1.0])?);
        let float_path = tmp_dir.path().join("float32.png");
        float.write_png(&float_path)?;
        let back = gabor_io::png::read_image_png_mono16(&float_path)?;
        assert_eq!(back.as_slice(), &[0, 32768, 65535]);

        Ok(())
    }

    #[test]
    fn accessors() -> Result<(), GaborError> {
        let response = ResponseImage::Float32(Image::from_size_val([3, 2].into(), 0.0)?);
        assert_eq!(response.size(), ImageSize::from([3, 2]));
        assert_eq!(response.depth(), OutputDepth::Float32);
        assert!(response.as_mono8().is_none());
        assert!(response.as_float32().is_some());
        assert_eq!(ResponseType::Magnitude.to_string(), "magnitude");
        Ok(())
    }
}
