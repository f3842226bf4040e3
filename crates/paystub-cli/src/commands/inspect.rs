//! Inspect command - show what is extracted from one statement.

use std::path::PathBuf;

use clap::{Args, ValueEnum};
use console::style;

use paystub_core::{BatchRunner, PdfToHtmlSource, Row, StatementRecord, Withholding};

use super::load_config;

/// Output format for inspection.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Text,
}

/// Arguments for the inspect command.
#[derive(Args)]
pub struct InspectArgs {
    /// Statement document to inspect
    #[arg(required = true)]
    input: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Print the reconstructed rows instead of the extracted fields
    #[arg(long)]
    rows: bool,

    /// Directory for cached pdftohtml output
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Page of the converted document to read
    #[arg(long)]
    page: Option<u32>,
}

pub fn run(args: InspectArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let mut config = load_config(config_path)?;
    if let Some(cache_dir) = args.cache_dir {
        config.conversion.cache_dir = cache_dir;
    }
    if let Some(page) = args.page {
        config.conversion.page = page;
    }

    let runner = BatchRunner::new(PdfToHtmlSource::new(&config.conversion));

    if args.rows {
        let rows = runner.load_rows(&args.input)?;
        return print_rows(&rows, args.format);
    }

    match runner.process_document(&args.input) {
        Ok(done) => {
            match args.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&done.record)?),
                OutputFormat::Text => print!("{}", format_record(&done.record)),
            }
            for warning in &done.warnings {
                eprintln!("{} {}", style("⚠").yellow(), warning);
            }
            Ok(())
        }
        Err(failure) => {
            eprintln!("{}", style("Rows read from the statement:").dim());
            for row in &failure.rows {
                eprintln!("  {}", row);
            }
            anyhow::bail!("Extraction failed: {}", failure.error)
        }
    }
}

fn print_rows(rows: &[Row], format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(rows)?),
        OutputFormat::Text => {
            for (i, row) in rows.iter().enumerate() {
                println!("{:>3}: {}", i, row);
            }
        }
    }
    Ok(())
}

fn format_withholding(withholding: &Withholding) -> String {
    format!("{} (extra {})", withholding.allowances, withholding.extra)
}

fn format_record(record: &StatementRecord) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "Pay date:   {}\n",
        record.pay_date.as_deref().unwrap_or("-")
    ));
    output.push_str(&format!("Federal:    {}\n", format_withholding(&record.federal)));
    output.push_str(&format!("State:      {}\n", format_withholding(&record.state)));
    output.push_str(&format!(
        "Local:      {}\n",
        record
            .local
            .as_ref()
            .map(format_withholding)
            .unwrap_or_else(|| "-".to_string())
    ));
    output.push_str(&format!("Gross pay:  {}\n", record.gross_pay));

    if !record.deductions.is_empty() {
        output.push_str("Deductions:\n");
        for (category, amount) in &record.deductions {
            output.push_str(&format!("  {}: {}\n", category, amount));
        }
    }

    output.push_str(&format!("Net pay:    {}\n", record.net_pay));
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::collections::BTreeMap;

    #[test]
    fn test_format_record() {
        let record = StatementRecord {
            pay_date: Some("08/18/2017".to_string()),
            federal: Withholding::new(2, "20"),
            state: Withholding::new(1, 0i64),
            local: None,
            gross_pay: Decimal::new(230769, 2).into(),
            net_pay: Decimal::new(155432, 2).into(),
            deductions: BTreeMap::from([("401K".to_string(), Decimal::new(-11538, 2))]),
        };

        let text = format_record(&record);

        assert!(text.contains("Pay date:   08/18/2017\n"));
        assert!(text.contains("Federal:    2 (extra 20)\n"));
        assert!(text.contains("Local:      -\n"));
        assert!(text.contains("  401K: -115.38\n"));
        assert!(text.ends_with("Net pay:    1554.32\n"));
    }
}
