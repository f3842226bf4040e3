//! Configuration structures for the statement pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration for the paystub pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PaystubConfig {
    /// Source document configuration.
    pub input: InputConfig,

    /// External conversion configuration.
    pub conversion: ConversionConfig,

    /// CSV output configuration.
    pub output: OutputConfig,
}

/// Where source statements live.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Directory holding one document per statement.
    pub statement_dir: PathBuf,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            statement_dir: PathBuf::from("statements"),
        }
    }
}

/// External document-to-XML conversion.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionConfig {
    /// Converter executable.
    pub program: String,

    /// Arguments placed before the source and target paths.
    pub args: Vec<String>,

    /// Directory for cached conversion output.
    pub cache_dir: PathBuf,

    /// Delete `*.png` files the converter leaves in the cache directory.
    pub remove_images: bool,

    /// Page number consumed from each converted document.
    pub page: u32,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            program: "pdftohtml".to_string(),
            args: vec!["-c".to_string(), "-hidden".to_string(), "-xml".to_string()],
            cache_dir: PathBuf::from("xml"),
            remove_images: true,
            page: 1,
        }
    }
}

/// CSV output.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output file.
    pub csv_path: PathBuf,

    /// Field delimiter.
    pub delimiter: char,

    /// Quote character for fields that need quoting.
    pub quote: char,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            csv_path: PathBuf::from("payStatements.csv"),
            delimiter: ',',
            quote: '\'',
        }
    }
}

impl PaystubConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: PaystubConfig =
            serde_json::from_str(r#"{"output": {"csv_path": "out.csv"}}"#).unwrap();

        assert_eq!(config.output.csv_path, PathBuf::from("out.csv"));
        assert_eq!(config.output.quote, '\'');
        assert_eq!(config.conversion.program, "pdftohtml");
        assert_eq!(config.conversion.page, 1);
        assert_eq!(config.input.statement_dir, PathBuf::from("statements"));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = PaystubConfig::default();
        config.conversion.remove_images = false;
        config.save(&path).unwrap();

        let loaded = PaystubConfig::from_file(&path).unwrap();
        assert!(!loaded.conversion.remove_images);
        assert_eq!(loaded.conversion.args, vec!["-c", "-hidden", "-xml"]);
    }
}
