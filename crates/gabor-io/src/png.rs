use std::{fs, fs::File, io::BufWriter, path::Path};

use gabor_image::{Image, ImageSize};
use png::{BitDepth, ColorType, Decoder, Encoder, Transformations};

use crate::{
    conv_utils::{convert_buf_u16_u8, convert_buf_u8_u16, luma_u8},
    error::IoError,
};

/// Read a PNG image as a single channel 8-bit image (mono8).
///
/// Palette and low bit depth images are expanded, 16-bit samples are reduced to
/// 8 bits, colour images are converted to gray with the BT.601 luma weights and
/// alpha is dropped.
///
/// # Arguments
///
/// * `file_path` - The path to the PNG file.
///
/// # Returns
///
/// A grayscale image with a single channel (mono8).
pub fn read_image_png_mono8(file_path: impl AsRef<Path>) -> Result<Image<u8, 1>, IoError> {
    let (buf, size, color_type, _) =
        read_png_impl(file_path, Transformations::normalize_to_color8())?;

    let gray = match color_type {
        ColorType::Grayscale => buf,
        ColorType::GrayscaleAlpha => buf.chunks_exact(2).map(|px| px[0]).collect(),
        ColorType::Rgb => buf
            .chunks_exact(3)
            .map(|px| luma_u8(px[0], px[1], px[2]))
            .collect(),
        ColorType::Rgba => buf
            .chunks_exact(4)
            .map(|px| luma_u8(px[0], px[1], px[2]))
            .collect(),
        ColorType::Indexed => {
            return Err(IoError::UnsupportedPngFormat(format!("{color_type:?}")));
        }
    };

    Ok(Image::new(size, gray)?)
}

/// Read a 16-bit grayscale PNG image (mono16).
///
/// # Arguments
///
/// * `file_path` - The path to the PNG file.
///
/// # Returns
///
/// A grayscale image with a single channel (mono16).
pub fn read_image_png_mono16(file_path: impl AsRef<Path>) -> Result<Image<u16, 1>, IoError> {
    let (buf, size, color_type, bit_depth) =
        read_png_impl(file_path, Transformations::IDENTITY)?;

    if color_type != ColorType::Grayscale || bit_depth != BitDepth::Sixteen {
        return Err(IoError::UnsupportedPngFormat(format!(
            "{color_type:?} {bit_depth:?}"
        )));
    }

    Ok(Image::new(size, convert_buf_u8_u16(buf))?)
}

// utility function to read the png file
fn read_png_impl(
    file_path: impl AsRef<Path>,
    transformations: Transformations,
) -> Result<(Vec<u8>, ImageSize, ColorType, BitDepth), IoError> {
    // verify the file exists
    let file_path = file_path.as_ref();
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }

    // verify the file extension
    if file_path
        .extension()
        .map_or(true, |ext| !ext.eq_ignore_ascii_case("png"))
    {
        return Err(IoError::InvalidFileExtension(file_path.to_path_buf()));
    }

    let file = fs::File::open(file_path)?;
    let mut decoder = Decoder::new(file);
    decoder.set_transformations(transformations);

    let mut reader = decoder
        .read_info()
        .map_err(|e| IoError::PngDecodeError(e.to_string()))?;

    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e| IoError::PngDecodeError(e.to_string()))?;
    buf.truncate(info.buffer_size());

    let size = ImageSize {
        width: info.width as usize,
        height: info.height as usize,
    };

    Ok((buf, size, info.color_type, info.bit_depth))
}

/// Writes the given PNG _(grayscale 8-bit)_ data to the given file path.
///
/// # Arguments
///
/// - `file_path` - The path to the PNG image.
/// - `image` - The image containing the PNG image data.
pub fn write_image_png_gray8(
    file_path: impl AsRef<Path>,
    image: &Image<u8, 1>,
) -> Result<(), IoError> {
    write_png_impl(
        file_path,
        image.as_slice(),
        image.size(),
        BitDepth::Eight,
        ColorType::Grayscale,
    )
}

/// Writes the given PNG _(grayscale 16-bit)_ data to the given file path.
///
/// # Arguments
///
/// - `file_path` - The path to the PNG image.
/// - `image` - The image containing the PNG image data.
pub fn write_image_png_gray16(
    file_path: impl AsRef<Path>,
    image: &Image<u16, 1>,
) -> Result<(), IoError> {
    let image_buf = convert_buf_u16_u8(image.as_slice());

    write_png_impl(
        file_path,
        &image_buf,
        image.size(),
        BitDepth::Sixteen,
        ColorType::Grayscale,
    )
}

fn write_png_impl(
    file_path: impl AsRef<Path>,
    image_data: &[u8],
    image_size: ImageSize,
    // Make sure you set `depth` correctly
    depth: BitDepth,
    color_type: ColorType,
) -> Result<(), IoError> {
    let file = File::create(file_path)?;

    let mut encoder = Encoder::new(
        BufWriter::new(file),
        image_size.width as u32,
        image_size.height as u32,
    );
    encoder.set_color(color_type);
    encoder.set_depth(depth);

    let mut writer = encoder
        .write_header()
        .map_err(|e| IoError::PngEncodingError(e.to_string()))?;
    writer
        .write_image_data(image_data)
        .map_err(|e| IoError::PngEncodingError(e.to_string()))?;
    writer
        .finish()
        .map_err(|e| IoError::PngEncodingError(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IoError;

    #[test]
    fn read_write_png_gray8() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("ramp-gray8.png");

        let image = Image::<u8, 1>::from_size_fn([5, 3].into(), |x, y| [(x * 40 + y) as u8])?;
        write_image_png_gray8(&file_path, &image)?;
        assert!(file_path.exists(), "File does not exist: {:?}", file_path);

        let image_back = read_image_png_mono8(&file_path)?;
        assert_eq!(image_back.cols(), 5);
        assert_eq!(image_back.rows(), 3);
        assert_eq!(image_back.as_slice(), image.as_slice());

        Ok(())
    }

    #[test]
    fn read_write_png_gray16() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("ramp-gray16.png");

        let image = Image::<u16, 1>::new([3, 1].into(), vec![0, 1000, 65535])?;
        write_image_png_gray16(&file_path, &image)?;

        let image_back = read_image_png_mono16(&file_path)?;
        assert_eq!(image_back.as_slice(), image.as_slice());

        // the same file can be read back reduced to 8 bits
        let image_u8 = read_image_png_mono8(&file_path)?;
        assert_eq!(image_u8.as_slice()[0], 0);
        assert_eq!(image_u8.as_slice()[2], 255);

        Ok(())
    }

    #[test]
    fn read_missing_file() {
        let res = read_image_png_mono8("does/not/exist.png");
        assert!(matches!(res, Err(IoError::FileDoesNotExist(_))));
    }

    #[test]
    fn read_invalid_extension() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("image.jpg");
        std::fs::write(&file_path, b"not a png")?;

        let res = read_image_png_mono8(&file_path);
        assert!(matches!(res, Err(IoError::InvalidFileExtension(_))));
        Ok(())
    }
}
