//! vecgen - Generate CoreGraphics drawing code from vector PDF images
//!
//! Every output is generated in memory first; nothing is written unless
//! all inputs convert and all generators succeed.

use anyhow::{Context as _, bail};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;
use vecgen_core::codegen::{
    CallerConfig, CodeGenerator, GeneratorConfig, ObjcCallerGenerator, ObjcGenerator,
    ObjcHeaderGenerator, UniqueIds,
};
use vecgen_core::convert::{ConvertOptions, generate_images};

/// Generate Objective-C CoreGraphics drawing functions from PDF images.
#[derive(Parser, Debug)]
#[command(name = "vecgen")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// One or more paths to PDF files
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Write the header with size constants and declarations here
    #[arg(long = "objc-header")]
    objc_header: Option<PathBuf>,

    /// Write the drawing functions here
    #[arg(long = "objc-impl")]
    objc_impl: Option<PathBuf>,

    /// Write a program rendering every image to PNG here
    #[arg(long = "objc-caller-path")]
    objc_caller_path: Option<PathBuf>,

    /// Prefix for generated identifiers
    #[arg(long = "objc-prefix", default_value = "")]
    objc_prefix: String,

    /// Path the generated sources use to import the header
    #[arg(long = "objc-header-import-path")]
    objc_header_import_path: Option<String>,

    /// Scale the caller program renders at
    #[arg(long = "caller-scale", default_value_t = 1.0)]
    caller_scale: f64,

    /// Let the caller program render with anti-aliasing
    #[arg(long = "caller-allow-antialiasing")]
    caller_allow_antialiasing: bool,

    /// Directory the caller program writes PNGs to
    #[arg(long = "caller-png-output", default_value = ".")]
    caller_png_output: String,

    /// Turn each page of a multi-page PDF into its own image
    #[arg(long = "split-pages")]
    split_pages: bool,

    /// Use debug logging level
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Header import used by the caller program: the explicit import path, or
/// the header's file name.
fn caller_header_import(args: &Args) -> anyhow::Result<String> {
    if let Some(path) = &args.objc_header_import_path {
        return Ok(path.clone());
    }
    match args.objc_header.as_deref().and_then(Path::file_name) {
        Some(name) => Ok(name.to_string_lossy().into_owned()),
        None => bail!("--objc-caller-path needs --objc-header-import-path or --objc-header"),
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let options = ConvertOptions {
        split_pages: args.split_pages,
        threads: None,
    };
    let images = generate_images(&args.files, &options).context("convert input files")?;
    info!(images = images.len(), "converted inputs");

    let mut ids = UniqueIds::new();
    let mut outputs: Vec<(&Path, String)> = Vec::new();

    if let Some(path) = &args.objc_header {
        let generator = ObjcHeaderGenerator::new(args.objc_prefix.clone());
        let text = generator
            .generate_file(&images, &mut ids)
            .context("generate header")?;
        outputs.push((path, text));
    }

    if let Some(path) = &args.objc_impl {
        let generator = ObjcGenerator::new(GeneratorConfig {
            prefix: args.objc_prefix.clone(),
            header_import_path: args.objc_header_import_path.clone(),
        });
        let text = generator
            .generate_file(&images, &mut ids)
            .context("generate drawing functions")?;
        outputs.push((path, text));
    }

    if let Some(path) = &args.objc_caller_path {
        let generator = ObjcCallerGenerator::new(CallerConfig {
            prefix: args.objc_prefix.clone(),
            header_import_path: caller_header_import(&args)?,
            scale: args.caller_scale,
            allow_antialiasing: args.caller_allow_antialiasing,
            output_dir: args.caller_png_output.clone(),
        });
        let text = generator
            .generate_file(&images, &mut ids)
            .context("generate caller")?;
        outputs.push((path, text));
    }

    for (path, text) in outputs {
        std::fs::write(path, text).with_context(|| format!("write '{}'", path.display()))?;
        info!(path = %path.display(), "wrote output");
    }
    Ok(())
}
