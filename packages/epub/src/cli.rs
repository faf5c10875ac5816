//! Command-line interface for the converter.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::validate_output_dir;
use crate::converter::{convert, ConversionOptions};
use crate::error::{ConverterError, Result};
use crate::package::DirectoryPackager;
use crate::source::{read_record, with_source_url};

/// LeyChile EPUB - Convert Chilean legislation into navigable e-books.
#[derive(Parser)]
#[command(name = "leychile-epub")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert one LeyChile XML or YAML record.
    Convert {
        /// Path to the record (.xml or .yaml)
        input: PathBuf,

        /// Output directory (default: current directory)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// LeyChile URL the record was retrieved from
        #[arg(short, long)]
        url: Option<String>,

        /// Generation date in YYYY-MM-DD format (default: today)
        #[arg(short, long, value_parser = parse_date)]
        date: Option<NaiveDate>,
    },

    /// Convert every record listed in a file, one path per line.
    Batch {
        /// File listing record paths; blank lines and `#` comments are ignored
        list: PathBuf,

        /// Output directory (default: current directory)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Generation date in YYYY-MM-DD format (default: today)
        #[arg(short, long, value_parser = parse_date)]
        date: Option<NaiveDate>,
    },
}

fn parse_date(value: &str) -> std::result::Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| format!("Invalid date '{value}' (expected YYYY-MM-DD): {e}"))
}

/// Run the CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Convert {
            input,
            output,
            url,
            date,
        } => convert_command(&input, output.as_deref(), url.as_deref(), date),
        Commands::Batch { list, output, date } => batch_command(&list, output.as_deref(), date),
    }
}

fn options(date: Option<NaiveDate>) -> ConversionOptions {
    ConversionOptions {
        generated_on: date,
    }
}

/// Read, convert and package one record.
fn convert_one(
    input: &Path,
    url: Option<&str>,
    packager: &DirectoryPackager,
    options: &ConversionOptions,
) -> Result<(PathBuf, usize)> {
    let mut record = read_record(input)?;
    if let Some(url) = url {
        record = with_source_url(record, url);
    }
    let publication = convert(&record, options)?;
    let path = packager.package_law(&record.metadata, &publication)?;
    Ok((path, publication.content_units().count()))
}

/// Execute the convert command.
fn convert_command(
    input: &Path,
    output: Option<&Path>,
    url: Option<&str>,
    date: Option<NaiveDate>,
) -> Result<()> {
    let output = output.unwrap_or(Path::new("."));
    validate_output_dir(output)?;

    println!(
        "{} {}",
        style("Converting").bold(),
        style(input.display()).cyan()
    );

    let pb = ProgressBar::new_spinner();
    #[allow(clippy::expect_used)] // Static template string that is guaranteed to be valid
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("valid template"),
    );
    pb.set_message("Building publication...");
    pb.enable_steady_tick(std::time::Duration::from_millis(100));

    let packager = DirectoryPackager::new(output)?;
    let result = convert_one(input, url, &packager, &options(date));
    pb.finish_and_clear();
    let (path, units) = result?;

    println!("  Units: {units}");
    println!(
        "{} {}",
        style("Saved to:").green().bold(),
        path.display()
    );

    Ok(())
}

/// Record paths listed in a batch file, resolved against the file's directory.
fn read_batch_list(list: &Path) -> Result<Vec<PathBuf>> {
    let content = fs::read_to_string(list)?;
    let base = list.parent().unwrap_or(Path::new("."));

    let paths: Vec<PathBuf> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| {
            let path = PathBuf::from(line);
            if path.is_absolute() {
                path
            } else {
                base.join(path)
            }
        })
        .collect();

    if paths.is_empty() {
        return Err(ConverterError::EmptyBatch(list.to_path_buf()));
    }
    Ok(paths)
}

/// Execute the batch command.
///
/// Every record is an independent run; a failed record is reported and
/// counted without stopping the batch. The command fails only when no
/// record converted.
fn batch_command(list: &Path, output: Option<&Path>, date: Option<NaiveDate>) -> Result<()> {
    let output = output.unwrap_or(Path::new("."));
    let packager = DirectoryPackager::new(output)?;
    let inputs = read_batch_list(list)?;
    let options = options(date);

    let pb = ProgressBar::new(inputs.len() as u64);
    #[allow(clippy::expect_used)] // Static template string that is guaranteed to be valid
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{bar:40.cyan/blue} {pos}/{len} {msg}")
            .expect("valid template"),
    );

    let mut failed = 0usize;
    for input in &inputs {
        pb.set_message(input.display().to_string());
        match convert_one(input, None, &packager, &options) {
            Ok((path, _)) => tracing::debug!(path = %path.display(), "Batch item done"),
            Err(e) => {
                failed += 1;
                pb.println(format!(
                    "{} {}: {e}",
                    style("Failed").red().bold(),
                    input.display()
                ));
            }
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    let converted = inputs.len() - failed;
    println!(
        "{} {converted} of {}",
        style("Converted").green().bold(),
        inputs.len()
    );
    if failed > 0 {
        println!("  Failed: {}", style(failed).yellow().bold());
    }

    if failed == inputs.len() {
        return Err(ConverterError::BatchFailed { failed });
    }
    Ok(())
}
