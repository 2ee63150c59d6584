//! Batch command - process every OCR dump in a directory.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use super::parse::{format_receipt, parse_file, OutputFormat};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Directory containing OCR dump files (*.json)
    #[arg(required = true)]
    input_dir: PathBuf,

    /// Output directory (default: print summary only)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for written files
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,
}

pub fn run(args: BatchArgs) -> anyhow::Result<()> {
    if !args.input_dir.is_dir() {
        anyhow::bail!("Not a directory: {}", args.input_dir.display());
    }

    let mut inputs: Vec<PathBuf> = fs::read_dir(&args.input_dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    inputs.sort();

    if inputs.is_empty() {
        anyhow::bail!("No .json dumps found in {}", args.input_dir.display());
    }

    if let Some(dir) = &args.output_dir {
        fs::create_dir_all(dir)?;
    }

    info!("Processing {} dumps", inputs.len());

    let pb = ProgressBar::new(inputs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("##-"),
    );

    let mut parsed = 0usize;
    let mut flagged = 0usize;
    let mut failed = 0usize;

    for input in &inputs {
        pb.set_message(
            input
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
        );

        match parse_file(input) {
            Ok(receipt) => {
                parsed += 1;
                if receipt.processing_error.is_some() {
                    flagged += 1;
                }

                if let Some(dir) = &args.output_dir {
                    let mut out_path = dir.join(input.file_name().unwrap_or_default());
                    out_path.set_extension(match args.format {
                        OutputFormat::Json => "out.json",
                        OutputFormat::Text => "txt",
                    });
                    fs::write(&out_path, format_receipt(&receipt, args.format)?)?;
                }
            }
            Err(e) => {
                failed += 1;
                warn!("{}: {}", input.display(), e);
            }
        }

        pb.inc(1);
    }

    pb.finish_with_message("Done");

    println!(
        "{} {} parsed, {} flagged for review, {} failed",
        style("Batch:").bold(),
        style(parsed).green(),
        style(flagged).yellow(),
        style(failed).red()
    );

    Ok(())
}
