//! Shoot random linear trajectories through a raw image cube and write their scores as CSV.
//!
//! Configuration is read from the environment first (`NUM_VECTORS`, `TIMESTAMP_FILE`,
//! `EXPOSURETIME_FILE`, `PSF_FILE`, `NOISE_FILE`, `RA_DEC_FILE`, `SLOPE_PDF_FILE`);
//! command line flags override it.

use std::process::ExitCode;

use camino::Utf8PathBuf;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use cubescan::{
    config::ScanConfig,
    constants::{DEFAULT_OUTPUT_FILE, DEFAULT_SEED},
    cube::{mapped_file::MappedCube, FrameMetadata},
    report::{top_by_snr, write_records_to_path, TrajectoryTrace},
    search::{shoot_trajectories, SearchParams},
    slope_distribution::SlopeSampler,
    snr::{BackgroundModel, NoiseModel},
    CubeScanError,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Monte-Carlo linear trajectory search over an image cube")]
struct Args {
    /// Raw cube file (f32 pixels, frame after frame, row-major inside a frame)
    cube: Utf8PathBuf,

    /// Frame width in pixels
    #[arg(long)]
    size_x: usize,

    /// Frame height in pixels
    #[arg(long)]
    size_y: usize,

    /// Number of frames
    #[arg(long)]
    size_k: usize,

    /// Element size declared by the cube producer
    #[arg(long, default_value_t = 4)]
    byte_per_element: usize,

    /// Number of random trajectories (overrides NUM_VECTORS)
    #[arg(long)]
    num_vectors: Option<usize>,

    /// Number of worker threads (default: all cores)
    #[arg(long)]
    threads: Option<usize>,

    /// Base seed of the per-worker random generators
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Per-frame timestamps (overrides TIMESTAMP_FILE)
    #[arg(long)]
    timestamp_file: Option<Utf8PathBuf>,

    /// Per-frame exposure times (overrides EXPOSURETIME_FILE)
    #[arg(long)]
    exposure_time_file: Option<Utf8PathBuf>,

    /// Per-frame PSF widths (overrides PSF_FILE)
    #[arg(long)]
    psf_file: Option<Utf8PathBuf>,

    /// Per-frame background noise levels (overrides NOISE_FILE)
    #[arg(long)]
    noise_file: Option<Utf8PathBuf>,

    /// Per-frame boresight `ra dec` (overrides RA_DEC_FILE)
    #[arg(long)]
    ra_dec_file: Option<Utf8PathBuf>,

    /// Weighted slope samples `x_slope y_slope weight` (overrides SLOPE_PDF_FILE)
    #[arg(long)]
    slope_pdf_file: Option<Utf8PathBuf>,

    /// Use the per-frame noise level as background instead of a third of the pixel value
    #[arg(long, default_value_t = false)]
    frame_noise_background: bool,

    /// Output CSV file
    #[arg(long, default_value = DEFAULT_OUTPUT_FILE)]
    output: Utf8PathBuf,

    /// Print the per-frame trace of the N best trajectories
    #[arg(long, default_value_t = 0)]
    top: usize,
}

impl Args {
    /// Environment configuration with the command line flags applied on top.
    fn scan_config(&self) -> Result<ScanConfig, CubeScanError> {
        let mut config = ScanConfig::from_env()?;
        if let Some(n) = self.num_vectors {
            config.num_trajectories = n;
        }
        let overrides = [
            (&self.timestamp_file, &mut config.metadata.timestamp_file),
            (&self.exposure_time_file, &mut config.metadata.exposure_time_file),
            (&self.psf_file, &mut config.metadata.psf_file),
            (&self.noise_file, &mut config.metadata.noise_file),
            (&self.ra_dec_file, &mut config.metadata.sky_position_file),
            (&self.slope_pdf_file, &mut config.slope_pdf_file),
        ];
        for (flag, slot) in overrides {
            if flag.is_some() {
                slot.clone_from(flag);
            }
        }
        Ok(config)
    }
}

fn run(args: &Args) -> Result<(), CubeScanError> {
    let config = args.scan_config()?;

    let mapped = MappedCube::open(
        &args.cube,
        args.size_x,
        args.size_y,
        args.size_k,
        args.byte_per_element,
    )?;
    let metadata = FrameMetadata::load(args.size_k, &config.metadata)?;
    let cube = mapped.cube(metadata)?;
    let slopes = SlopeSampler::from_file_or_default(config.slope_pdf_file.as_deref())?;

    let noise_model = NoiseModel {
        background: if args.frame_noise_background {
            BackgroundModel::FrameNoise
        } else {
            BackgroundModel::default()
        },
        ..NoiseModel::default()
    };
    let mut builder = SearchParams::builder()
        .num_trajectories(config.num_trajectories)
        .base_seed(args.seed)
        .noise_model(noise_model);
    if let Some(threads) = args.threads {
        builder = builder.num_threads(threads);
    }
    let params = builder.build()?;
    info!("{params:#}");

    let outcome = shoot_trajectories(&cube, &slopes, &params)?;
    println!("{:#}", outcome.summary());

    write_records_to_path(&args.output, &outcome.records)?;
    info!(output = %args.output, records = outcome.records.len(), "wrote trajectory scores");

    for record in top_by_snr(&outcome.records, args.top) {
        println!(
            "\n{} | speed = {:.3} px/unit",
            record.snr_info(),
            record.trajectory.speed()
        );
        println!("{}", TrajectoryTrace::new(&cube, record.trajectory));
    }
    Ok(())
}

fn main() -> ExitCode {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
