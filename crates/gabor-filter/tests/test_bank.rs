use gabor_filter::{
    GaborBank, GaborBankConfig, GaborError, GaborFilter, OutputDepth, ResponseImage,
    ResponseType,
};
use gabor_image::Image;

// vertical bars, i.e. intensity varies along x only
fn vertical_bars(width: usize, height: usize, period: usize) -> Result<Image<u8, 1>, GaborError> {
    Ok(Image::from_size_fn([width, height].into(), |x, _| {
        [if (x / period) % 2 == 0 { 20 } else { 220 }]
    })?)
}

fn mean_magnitude(filter: &GaborFilter, src: &Image<u8, 1>) -> Result<f64, GaborError> {
    let mag = filter.respond_f32(src, ResponseType::Magnitude)?;
    let sum: f64 = mag.as_slice().iter().map(|&v| v as f64).sum();
    Ok(sum / mag.as_slice().len() as f64)
}

#[test]
fn orientation_selectivity() -> Result<(), GaborError> {
    // a wavelength of 4 pixels matches scale 0
    let src = vertical_bars(64, 64, 2)?;

    let across = mean_magnitude(&GaborFilter::from_index(0, 0)?, &src)?;
    let along = mean_magnitude(&GaborFilter::from_index(4, 0)?, &src)?;

    assert!(
        across > 10.0 * along,
        "across bars {across}, along bars {along}"
    );
    Ok(())
}

#[test]
fn bank_to_png() -> Result<(), Box<dyn std::error::Error>> {
    let _ = env_logger::builder().is_test(true).try_init();

    let tmp_dir = tempfile::tempdir()?;
    let src = vertical_bars(40, 30, 3)?;

    let config = GaborBankConfig::from_json(r#"{ "orientations": 2, "scales": [-1, 0] }"#)?;
    let bank = GaborBank::new(config)?;
    let responses = bank.respond(&src, ResponseType::Magnitude, OutputDepth::Mono8)?;
    assert_eq!(responses.len(), 4);

    for (i, (response, filter)) in responses.iter().zip(bank.filters()).enumerate() {
        let path = tmp_dir.path().join(format!("response-{i}.png"));
        response.write_png(&path)?;

        let back = gabor_io::png::read_image_png_mono8(&path)?;
        assert_eq!(Some(&back), response.as_mono8());

        filter.write_kernel(tmp_dir.path().join(format!("kernel-{i}.png")), ResponseType::Real)?;
    }

    let raw = bank.respond(&src, ResponseType::Imag, OutputDepth::Float32)?;
    assert!(raw.iter().all(|r| matches!(r, ResponseImage::Float32(_))));
    Ok(())
}
