use clap::{Parser, Subcommand};
use parcel_triage::config::init_logging;
use parcel_triage::extractor::extract;
use parcel_triage::loader::{read_grid, read_sheet_grids};
use parcel_triage::sample::{sample_filename_today, sample_workbook};
use parcel_triage::{ShipmentRecord, classify};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "parcel-cli", about = "Offline tools for held-parcel spreadsheets")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the carrier guess for each tracking number
    Classify { tokens: Vec<String> },
    /// Extract shipment records from a workbook as JSON
    Extract {
        file: PathBuf,
        /// Extract from every sheet instead of only the first
        #[arg(long)]
        all_sheets: bool,
    },
    /// Write the sample workbook
    Sample {
        /// Output path; defaults to the dated sample filename
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(Serialize)]
struct SheetRecords {
    sheet: String,
    records: Vec<ShipmentRecord>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Command::Classify { tokens } => {
            for token in tokens {
                let company = classify(&token);
                let shown = if company.is_empty() { "-" } else { company.as_str() };
                println!("{}\t{}", token, shown);
            }
        }
        Command::Extract { file, all_sheets } => {
            let bytes = std::fs::read(&file)?;
            if all_sheets {
                let sheets: Vec<SheetRecords> = read_sheet_grids(&bytes)?
                    .into_iter()
                    .map(|(sheet, grid)| SheetRecords {
                        sheet,
                        records: extract(&grid),
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&sheets)?);
            } else {
                let records = extract(&read_grid(&bytes)?);
                log::info!("{} shipment records in {}", records.len(), file.display());
                println!("{}", serde_json::to_string_pretty(&records)?);
            }
        }
        Command::Sample { out } => {
            let path = out.unwrap_or_else(|| PathBuf::from(sample_filename_today()));
            std::fs::write(&path, sample_workbook()?)?;
            log::info!("Sample workbook written to {}", path.display());
        }
    }

    Ok(())
}
