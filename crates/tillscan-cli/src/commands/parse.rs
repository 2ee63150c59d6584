//! Parse command - process a single OCR dump file.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use console::style;
use tracing::info;

use tillscan_core::{parse_receipt, OcrDocument, ParsedReceipt};

/// Arguments for the parse command.
#[derive(Args)]
pub struct ParseArgs {
    /// Input OCR dump ({"lines": [...], "annotations": [...]})
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// Plain text summary
    Text,
}

pub fn run(args: ParseArgs) -> anyhow::Result<()> {
    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Parsing OCR dump: {}", args.input.display());

    let receipt = parse_file(&args.input)?;

    if let Some(error) = &receipt.processing_error {
        eprintln!("{} {}", style("Warning:").yellow(), error);
    }

    let output = format_receipt(&receipt, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} wrote {}",
            style("OK").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    Ok(())
}

/// Load an OCR dump and run the dispatcher over it.
pub fn parse_file(path: &Path) -> anyhow::Result<ParsedReceipt> {
    let raw = fs::read_to_string(path)?;
    let document: OcrDocument = serde_json::from_str(&raw)?;
    let receipt = parse_receipt(&document.lines, &document.annotations)?;
    Ok(receipt)
}

pub fn format_receipt(receipt: &ParsedReceipt, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(receipt)?),
        OutputFormat::Text => {
            let mut out = String::new();
            out.push_str(&format!("Store:   {}\n", receipt.store_name));
            if let Some(number) = &receipt.store_number {
                out.push_str(&format!("Store #: {}\n", number));
            }
            if let Some(date) = &receipt.date_purchased {
                out.push_str(&format!("Date:    {}\n", date));
            }
            out.push_str(&format!("Items ({}):\n", receipt.items.len()));
            for item in &receipt.items {
                out.push_str(&format!(
                    "  {:<40} {:>8}  x{}  [{:.2}]\n",
                    item.name, item.price, item.unit_quantity, item.confidence
                ));
            }
            out.push_str(&format!("Tax:     {}\n", receipt.tax_amount));
            out.push_str(&format!("Total:   {}\n", receipt.total_amount));
            Ok(out)
        }
    }
}
