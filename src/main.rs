use clap::Parser;
use crs_geostore::config::load_config;
use crs_geostore::pipeline::run;
use std::path::PathBuf;

/// Load GeoJSON features, assign or transform their CRS and write them back out.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the input config file.
    #[arg(short, long)]
    config_filepath: PathBuf,
}

fn try_main() -> anyhow::Result<()> {
    let args = Args::try_parse()?;
    let config = load_config(&args.config_filepath)?;
    log::debug!("{:?}", config);

    let collection = run(&config)?;
    log::info!("{}", collection.summary());
    Ok(())
}

fn main() {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info")
    }
    env_logger::init();
    if let Err(e) = try_main() {
        eprintln!("Error: {:?}", e);
        std::process::exit(1)
    }
}
