use ruling_detector::{
    extract_regions_with_seed, extract_segments_with_seed, ImageU8, UserParameters,
};
use std::env;
use std::path::PathBuf;

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

struct Config {
    input_path: PathBuf,
    params: UserParameters,
    regions: bool,
    seed: Option<u64>,
}

fn run() -> Result<(), String> {
    let program = env::args()
        .next()
        .unwrap_or_else(|| "ruling_demo".to_string());
    let config = parse_args(&program)?;

    let img = image::open(&config.input_path)
        .map_err(|e| format!("Failed to open {}: {e}", config.input_path.display()))?
        .to_luma8();
    let width = img.width() as usize;
    let height = img.height() as usize;
    let gray_buf = img.into_raw();
    let image = ImageU8 {
        w: width,
        h: height,
        stride: width,
        data: &gray_buf,
    };

    let seed = config.seed.unwrap_or_else(rand::random);

    let json = if config.regions {
        let regions = extract_regions_with_seed(image, &config.params, seed)
            .map_err(|e| e.to_string())?;
        serde_json::to_string_pretty(&regions)
    } else {
        let segments = extract_segments_with_seed(image, &config.params, seed)
            .map_err(|e| e.to_string())?;
        serde_json::to_string_pretty(&segments)
    }
    .map_err(|e| format!("Failed to serialize JSON: {e}"))?;

    println!("{json}");
    Ok(())
}

fn parse_args(program: &str) -> Result<Config, String> {
    let mut input_path: Option<PathBuf> = None;
    let mut params = UserParameters {
        sensitivity: 5,
        max_gap: 2,
        min_segment_length: 10,
        channel_width: 3,
    };
    let mut regions = false;
    let mut seed = None;

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--regions" => regions = true,
            "--sensitivity" => params.sensitivity = parse_flag(&mut args, &arg)?,
            "--max-gap" => params.max_gap = parse_flag(&mut args, &arg)?,
            "--min-length" => params.min_segment_length = parse_flag(&mut args, &arg)?,
            "--channel-width" => params.channel_width = parse_flag(&mut args, &arg)?,
            "--seed" => seed = Some(parse_flag(&mut args, &arg)?),
            "--help" | "-h" => {
                print_usage(program);
                std::process::exit(0);
            }
            other if other.starts_with("--") => {
                return Err(format!("Unknown flag {other}; try --help"));
            }
            other => {
                if input_path.replace(PathBuf::from(other)).is_some() {
                    return Err("Multiple input paths given".to_string());
                }
            }
        }
    }

    let input_path = input_path.ok_or_else(|| format!("Usage: {program} <image> [flags]"))?;
    Ok(Config {
        input_path,
        params,
        regions,
        seed,
    })
}

fn parse_flag<T: std::str::FromStr>(
    args: &mut impl Iterator<Item = String>,
    flag: &str,
) -> Result<T, String> {
    let value = args
        .next()
        .ok_or_else(|| format!("{flag} expects a value"))?;
    value
        .parse()
        .map_err(|_| format!("Invalid value {value:?} for {flag}"))
}

fn print_usage(program: &str) {
    println!(
        "Usage: {program} <image> [--regions] [--sensitivity N] [--max-gap N] \
         [--min-length N] [--channel-width N] [--seed N]\n\n\
         Detects straight rulings in the image and prints them as JSON\n\
         segments (default) or reading-ordered region boxes (--regions)."
    );
}
