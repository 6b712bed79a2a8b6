use anyhow::{Context, Result, bail};
use clap::Parser;
use log::info;
use std::path::PathBuf;
use streetweave::render::{RenderConfig, render_png};
use streetweave::{LineStore, OUT_FILE_NAME, loader, simplify};

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

/// Merges street segments that continue through junctions and renders the result.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the input shapefile (.shp) or GeoJSON line file
    #[arg(short, long, env = "YARROW_INPUT")]
    input: PathBuf,

    /// Path to the output directory
    #[arg(short, long, env = "YARROW_OUTPUT", default_value = "./out")]
    output: PathBuf,

    /// Set the output image dpi
    #[arg(short, long, env = "YARROW_DPI", default_value_t = 300)]
    dpi: u32,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let args = Args::parse();

    if !args.input.is_file() {
        bail!("File {} does not exist", args.input.display());
    }

    std::fs::create_dir_all(&args.output)
        .with_context(|| format!("creating output directory {}", args.output.display()))?;
    let out_file_path = args.output.join(OUT_FILE_NAME);

    let lines = loader::load_lines(&args.input)?;
    let mut store = LineStore::from_lines(lines)?;

    let report = simplify(&mut store);
    report.log_summary();

    let lines = store.into_lines();
    let config = RenderConfig::with_dpi(args.dpi);
    render_png(&lines, &config, &mut rand::rng(), &out_file_path)?;

    info!("Done.");
    Ok(())
}
