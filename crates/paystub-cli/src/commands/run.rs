//! Run command - extract a statement directory into one CSV table.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use paystub_core::models::config::OutputConfig;
use paystub_core::{AggregatedTable, BatchRunner, PdfToHtmlSource, list_documents};

use super::load_config;

/// Arguments for the run command.
#[derive(Args)]
pub struct RunArgs {
    /// Directory holding the statements to process
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Directory for cached pdftohtml output
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Output CSV file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Page of each converted document to read
    #[arg(long)]
    page: Option<u32>,
}

pub fn run(args: RunArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = load_config(config_path)?;
    if let Some(input) = args.input {
        config.input.statement_dir = input;
    }
    if let Some(cache_dir) = args.cache_dir {
        config.conversion.cache_dir = cache_dir;
    }
    if let Some(output) = args.output {
        config.output.csv_path = output;
    }
    if let Some(page) = args.page {
        config.conversion.page = page;
    }

    let statement_dir = &config.input.statement_dir;
    let documents = list_documents(statement_dir).map_err(|e| {
        anyhow::anyhow!(
            "Failed to list statements in {}: {}",
            statement_dir.display(),
            e
        )
    })?;

    println!(
        "{} Found {} statements to process",
        style("ℹ").blue(),
        documents.len()
    );

    let pb = ProgressBar::new(documents.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("=>-"),
    );

    let runner = BatchRunner::new(PdfToHtmlSource::new(&config.conversion));
    let report = runner.run_with_progress(&documents, |path, extracted| {
        debug!("{} {}", if extracted { "extracted" } else { "failed" }, path.display());
        if let Some(name) = path.file_name() {
            pb.set_message(name.to_string_lossy().into_owned());
        }
        pb.inc(1);
    });
    pb.finish_with_message("Complete");

    write_table(&config.output, &report.table)?;

    let elapsed = start.elapsed();
    println!();
    println!(
        "{} Processed {} statements in {:.2}s",
        style("✓").green(),
        documents.len(),
        elapsed.as_secs_f64()
    );
    println!(
        "  {} successful, {} failed",
        style(report.processed.len()).green(),
        style(report.failures.len()).red()
    );

    if !report.failures.is_empty() {
        println!();
        println!("{}", style("Failed statements:").red().bold());
        for failure in &report.failures {
            println!("  {} {}: {}", style("✗").red(), failure.path.display(), failure.error);
        }
    }

    println!(
        "{} Table written to {}",
        style("✓").green(),
        config.output.csv_path.display()
    );

    Ok(())
}

/// Write the aggregated table as CSV, quoting only fields that need it.
///
/// Records end with `\r\n`.
fn write_table(output: &OutputConfig, table: &AggregatedTable) -> anyhow::Result<()> {
    let delimiter = ascii_byte(output.delimiter, "delimiter")?;
    let quote = ascii_byte(output.quote, "quote")?;

    if let Some(parent) = output.csv_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .quote(quote)
        .quote_style(csv::QuoteStyle::Necessary)
        .terminator(csv::Terminator::CRLF)
        .from_path(&output.csv_path)?;

    writer.write_record(&table.headers)?;
    for row in &table.rows {
        writer.write_record(row)?;
    }
    writer.flush()?;

    Ok(())
}

fn ascii_byte(c: char, what: &str) -> anyhow::Result<u8> {
    if c.is_ascii() {
        Ok(c as u8)
    } else {
        anyhow::bail!("CSV {} must be an ASCII character, got {:?}", what, c)
    }
}
