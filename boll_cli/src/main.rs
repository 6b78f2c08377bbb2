mod loader;

use std::error::Error;
use std::path::PathBuf;

use boll_core::{compute, BandConfig};
use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const USAGE: &str = "usage: boll_cli <data.json|data.csv> [config.json]";

fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .init();
}

fn main() {
    init_logging();

    if let Err(e) = run() {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let mut args = std::env::args().skip(1);
    let data_path = PathBuf::from(args.next().ok_or(USAGE)?);
    let config_path = args.next().map(PathBuf::from);

    let config = match &config_path {
        Some(path) => BandConfig::from_json_str(&std::fs::read_to_string(path)?)?,
        None => BandConfig::default(),
    };
    info!(
        length = config.length,
        std_dev_multiplier = config.std_dev_multiplier,
        source = %config.source,
        offset = config.offset,
        "band config"
    );

    let series = loader::load_series(&data_path)?;
    let bands = compute(&series, &config)?;

    let defined = bands.basis.iter().filter(|v| !v.is_nan()).count();
    info!(
        file = %data_path.display(),
        rows = series.len(),
        defined,
        first = ?series.first().and_then(|p| p.datetime()),
        last = ?series.last().and_then(|p| p.datetime()),
        "bands computed"
    );

    let stdout = std::io::stdout();
    serde_json::to_writer_pretty(stdout.lock(), &bands.rows(&series))?;
    println!();
    Ok(())
}
