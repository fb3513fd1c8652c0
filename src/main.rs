use clap::Parser;
use log::{error, info};
use std::path::PathBuf;

use video2yolo::{Args, ConvertConfig};

fn main() {
    // Initialize the logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let video_root = PathBuf::from(&args.video_root);
    if !video_root.exists() {
        error!("the specified video_root does not exist: {}", args.video_root);
        return;
    }

    let config = match args.to_config() {
        Ok(config) => config,
        Err(e) => {
            error!("failed to load configuration: {}", e);
            return;
        }
    };

    info!("starting the conversion process...");
    run(&args, config);
}

#[cfg(feature = "opencv")]
fn run(args: &Args, config: ConvertConfig) {
    use video2yolo::video::OpencvVideoSource;
    use video2yolo::VideoConverter;

    match VideoConverter::<OpencvVideoSource>::new(
        &args.video_root,
        &args.annotation_root,
        &args.output_root,
        config,
    ) {
        Ok(mut converter) => {
            if let Err(e) = converter.convert_all() {
                error!("conversion failed: {}", e);
                return;
            }
            info!("label map: {:?}", converter.registry().names());
        }
        Err(e) => error!("failed to set up output directories: {}", e),
    }
}

#[cfg(not(feature = "opencv"))]
fn run(_args: &Args, _config: ConvertConfig) {
    error!("built without a video backend; enable the `opencv` feature");
}
