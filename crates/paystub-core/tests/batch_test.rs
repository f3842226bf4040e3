//! Integration tests for batch processing.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use paystub_core::convert;
use paystub_core::error::ConversionError;
use paystub_core::models::config::ConversionConfig;
use paystub_core::{
    BatchRunner, Converter, PageSource, PaystubError, PdfToHtmlSource, Result, TextBox,
    list_documents,
};
use pretty_assertions::assert_eq;

/// Page source serving boxes keyed by file name.
struct MemorySource {
    pages: HashMap<String, Vec<TextBox>>,
}

impl PageSource for MemorySource {
    fn load_page(&self, document: &Path) -> Result<Vec<TextBox>> {
        let name = document.file_name().unwrap().to_string_lossy().into_owned();
        self.pages
            .get(&name)
            .cloned()
            .ok_or_else(|| PaystubError::Config(format!("no page for {}", name)))
    }
}

/// Converter standing in for an unavailable pdftohtml.
struct NoConversion;

impl Converter for NoConversion {
    fn convert(&self, source: &Path, _target: &Path) -> convert::Result<()> {
        Err(ConversionError::MissingOutput(source.to_path_buf()))
    }
}

/// Lay out labelled rows, one row per line, values spaced to the right.
fn page(rows: &[Vec<&str>]) -> Vec<TextBox> {
    rows.iter()
        .enumerate()
        .flat_map(|(line, cells)| {
            cells.iter().enumerate().map(move |(col, value)| {
                TextBox::new((line * 20) as f64, (col * 100) as f64, *value)
            })
        })
        .collect()
}

fn statement(date: &str, federal: bool, deduction: (&str, &str)) -> Vec<TextBox> {
    let mut rows = vec![vec!["Pay Date:", date]];
    if federal {
        rows.push(vec!["Federal:", "2", "$20 Additional Tax"]);
    }
    rows.push(vec!["NY:", "1"]);
    rows.push(vec!["Regular", "8000", "230769", "4615380"]);
    rows.push(vec!["Statutory"]);
    rows.push(vec![deduction.0, deduction.1, "999900"]);
    rows.push(vec!["Net Pay", "155432"]);
    page(&rows)
}

#[test]
fn test_partial_failure_is_isolated() {
    let pages = HashMap::from([
        ("1.pdf".to_string(), statement("01/06/2017", true, ("Mcttax", "780"))),
        ("2.pdf".to_string(), statement("01/20/2017", false, ("401k", "5000"))),
        ("3.pdf".to_string(), statement("02/03/2017", true, ("401k", "5000"))),
    ]);
    let runner = BatchRunner::new(MemorySource { pages });
    let documents: Vec<PathBuf> = ["1.pdf", "2.pdf", "3.pdf"].iter().map(PathBuf::from).collect();

    let report = runner.run(&documents);

    assert_eq!(report.processed, vec![PathBuf::from("1.pdf"), PathBuf::from("3.pdf")]);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].path, PathBuf::from("2.pdf"));
    assert!(report.failures[0].error.contains("Federal:"));
    assert!(!report.failures[0].rows.is_empty());

    let table = report.table;
    assert_eq!(table.deduction_columns(), &["401k"]);
    assert_eq!(table.rows.len(), 2);
    assert_eq!(table.rows[0][0], "01/06/2017");
    assert_eq!(table.rows[0][8], "");
    assert_eq!(table.rows[1][0], "02/03/2017");
    assert_eq!(table.rows[1][8], "50.00");
    assert_eq!(table.rows[1][9], "1554.32");
}

#[test]
fn test_unloadable_document_is_isolated() {
    let pages = HashMap::from([(
        "a.pdf".to_string(),
        statement("01/06/2017", true, ("401k", "5000")),
    )]);
    let runner = BatchRunner::new(MemorySource { pages });

    let report = runner.run(&[PathBuf::from("a.pdf"), PathBuf::from("missing.pdf")]);

    assert_eq!(report.table.rows.len(), 1);
    assert_eq!(report.failures.len(), 1);
    assert!(report.failures[0].rows.is_empty());
}

#[test]
fn test_list_documents_sorted_by_name() {
    let dir = tempfile::tempdir().unwrap();
    for name in ["PayStatement-2017-09-29.pdf", "PayStatement-2015-04-17.pdf", "PayStatement-2016-05-13.pdf"] {
        fs::write(dir.path().join(name), b"").unwrap();
    }
    fs::create_dir(dir.path().join("nested")).unwrap();

    let documents = list_documents(dir.path()).unwrap();
    let names: Vec<_> = documents
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();

    assert_eq!(
        names,
        vec![
            "PayStatement-2015-04-17.pdf",
            "PayStatement-2016-05-13.pdf",
            "PayStatement-2017-09-29.pdf",
        ]
    );
}

#[cfg(unix)]
#[test]
fn test_list_documents_follows_symlinks() {
    let dir = tempfile::tempdir().unwrap();
    let statements = dir.path().join("statements");
    fs::create_dir(&statements).unwrap();

    let archived = dir.path().join("archived.pdf");
    fs::write(&archived, b"%PDF").unwrap();
    fs::write(statements.join("a.pdf"), b"%PDF").unwrap();
    std::os::unix::fs::symlink(&archived, statements.join("b.pdf")).unwrap();
    std::os::unix::fs::symlink(dir.path().join("gone.pdf"), statements.join("c.pdf")).unwrap();

    let documents = list_documents(&statements).unwrap();

    assert_eq!(documents, vec![statements.join("a.pdf"), statements.join("b.pdf")]);
}

fn xml_page(number: u32, rows: &[Vec<&str>]) -> String {
    let mut xml = format!("<page number=\"{}\" position=\"absolute\" top=\"0\" left=\"0\" height=\"1188\" width=\"918\">\n", number);
    for (line, cells) in rows.iter().enumerate() {
        for (col, value) in cells.iter().enumerate() {
            xml.push_str(&format!(
                "<text top=\"{}\" left=\"{}\" width=\"50\" height=\"12\" font=\"0\">{}</text>\n",
                100 + line * 18,
                40 + col * 120,
                value
            ));
        }
    }
    xml.push_str("</page>\n");
    xml
}

#[test]
fn test_cached_xml_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let statements = dir.path().join("statements");
    let cache_dir = dir.path().join("xml");
    fs::create_dir_all(&statements).unwrap();
    fs::create_dir_all(&cache_dir).unwrap();

    let good = format!(
        "<?xml version=\"1.0\"?>\n<pdf2xml>\n{}{}</pdf2xml>\n",
        xml_page(
            1,
            &[
                vec!["Pay Date:", "09/29/2017"],
                vec!["Federal:", "2"],
                vec!["NY:", "1"],
                vec!["Regular", "8000", "230769"],
                vec!["Statutory"],
                vec!["Dental", "<b>410</b>", "8200"],
                vec!["Net Pay", "155432"],
            ]
        ),
        xml_page(2, &[vec!["Federal:", "9"]]),
    );
    fs::write(statements.join("b.pdf"), b"%PDF").unwrap();
    fs::write(cache_dir.join("b.xml"), good).unwrap();

    // Converted document without the page the extractor reads.
    fs::write(statements.join("a.pdf"), b"%PDF").unwrap();
    fs::write(cache_dir.join("a.xml"), "<pdf2xml><page number=\"2\"></page></pdf2xml>").unwrap();

    // Not converted yet, and conversion is unavailable.
    fs::write(statements.join("c.pdf"), b"%PDF").unwrap();

    let config = ConversionConfig {
        cache_dir: cache_dir.clone(),
        ..ConversionConfig::default()
    };
    let source = PdfToHtmlSource::new(&config).with_converter(NoConversion);
    let runner = BatchRunner::new(source);

    let documents = list_documents(&statements).unwrap();
    let report = runner.run(&documents);

    assert_eq!(report.processed, vec![statements.join("b.pdf")]);
    assert_eq!(report.failures.len(), 2);
    assert!(report.failures[0].error.contains("page 1 not found"));
    assert!(report.failures[1].error.contains("no output"));

    assert_eq!(
        report.table.rows[0],
        vec!["09/29/2017", "2", "0", "1", "0", "", "", "2307.69", "4.10", "1554.32"]
    );
}
