use std::{io, path::PathBuf, process::ExitCode};

use anyhow::{bail, Context, Result};
use clap::Parser;
use fs_err as fs;
use tracing::{error, info};

use fcl2svg::{
    fcl::Fcl,
    svg::{split_dir, write_svg, RenderMode, SvgStyle},
};

/// FCL to SVG converter
#[derive(Parser, Debug)]
#[command(name = "fcl2svg")]
#[command(version, about, long_about = None)]
struct Args {
    /// Input .fcl file
    input: PathBuf,

    /// Output .svg file
    #[arg(short = 'o', long, default_value = "airspace.svg")]
    output: PathBuf,

    /// One file per polygon
    #[arg(long)]
    split: bool,

    /// JSON file overriding canvas size, margin and colours
    #[arg(long)]
    style: Option<PathBuf>,
}

fn run(args: &Args) -> Result<()> {
    if !args.input.exists() {
        bail!("File not found: {}", args.input.display());
    }

    let style = match &args.style {
        Some(path) => SvgStyle::parse(&fs::read(path)?)
            .with_context(|| format!("Invalid style file: {}", path.display()))?,
        None => SvgStyle::default(),
    };

    let fcl = Fcl::parse(&fs::read(&args.input)?)
        .with_context(|| format!("Failed to parse {}", args.input.display()))?;
    if fcl.is_empty() {
        bail!(
            "Error: No valid coordinates found. Please check that each coordinate line starts \
             with N/S/E/W and contains a semicolon."
        );
    }

    let mode = if args.split {
        RenderMode::Split
    } else {
        RenderMode::Combined
    };
    let written = write_svg(&fcl, &style, &args.output, mode)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    match mode {
        RenderMode::Split => info!(
            "Created {} individual SVGs in {}/",
            written.len(),
            split_dir(&args.output).display()
        ),
        RenderMode::Combined => info!(
            "Successfully generated {} with {} polygons.",
            args.output.display(),
            fcl.len()
        ),
    }

    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt().with_writer(io::stderr).init();
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
