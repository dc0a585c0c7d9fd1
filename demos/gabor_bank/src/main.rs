use argh::FromArgs;
use std::path::{Path, PathBuf};

use gabor::filter::{GaborBank, GaborBankConfig, OutputDepth, ResponseImage, ResponseType};
use gabor::io::png as P;

#[derive(FromArgs)]
/// Run a Gabor filter bank over a grayscale image and save the responses.
struct Args {
    /// path to an input png image
    #[argh(option, short = 'i')]
    image_path: PathBuf,

    /// directory where the responses are written
    #[argh(option, short = 'o')]
    output_dir: PathBuf,

    /// path to a json bank configuration
    #[argh(option, short = 'c')]
    config_path: Option<PathBuf>,

    /// response to compute: real, imag or magnitude
    #[argh(
        option,
        default = "ResponseType::Magnitude",
        from_str_fn(parse_response)
    )]
    response: ResponseType,

    /// keep the raw floating point responses, saved as 16-bit png
    #[argh(switch)]
    float: bool,

    /// also save the real kernel of every filter
    #[argh(switch)]
    kernels: bool,
}

fn parse_response(value: &str) -> Result<ResponseType, String> {
    match value {
        "real" => Ok(ResponseType::Real),
        "imag" => Ok(ResponseType::Imag),
        "magnitude" => Ok(ResponseType::Magnitude),
        _ => Err(format!("unknown response type: {value}")),
    }
}

/// Write every response (and optionally every kernel) and return the number of
/// files that could not be written.
fn write_outputs(
    bank: &GaborBank,
    responses: &[ResponseImage],
    response: ResponseType,
    output_dir: &Path,
    kernels: bool,
) -> usize {
    let orientations = bank.config().orientations as usize;
    let mut failed = 0;

    for (i, (filter, output)) in bank.filters().iter().zip(responses).enumerate() {
        // filters are scale major, so the orientation index cycles fastest
        let name = format!(
            "{response}_s{}_o{}",
            filter.params().scale,
            i % orientations
        );

        let path = output_dir.join(format!("{name}.png"));
        if let Err(e) = output.write_png(&path) {
            log::error!("could not write {}: {e}", path.display());
            failed += 1;
        }

        if kernels {
            let path = output_dir.join(format!("kernel_{name}.png"));
            if let Err(e) = filter.write_kernel(&path, ResponseType::Real) {
                log::error!("could not write {}: {e}", path.display());
                failed += 1;
            }
        }
    }

    failed
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    let depth = if args.float {
        OutputDepth::Float32
    } else {
        OutputDepth::Mono8
    };

    let config = match &args.config_path {
        Some(path) => GaborBankConfig::from_json(&std::fs::read_to_string(path)?)?,
        None => GaborBankConfig::default(),
    };

    // read the image as grayscale
    let image = P::read_image_png_mono8(&args.image_path)?;
    log::info!("read {} image from {}", image.size(), args.image_path.display());

    let bank = GaborBank::new(config)?;
    let responses = bank.respond(&image, args.response, depth)?;

    std::fs::create_dir_all(&args.output_dir)?;
    let failed = write_outputs(
        &bank,
        &responses,
        args.response,
        &args.output_dir,
        args.kernels,
    );

    println!(
        "Wrote {} responses to {} ({} files failed)",
        responses.len(),
        args.output_dir.display(),
        failed
    );

    Ok(())
}
