//! External document conversion and its on-disk cache.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, info, warn};

use crate::error::ConversionError;
use crate::models::config::ConversionConfig;

/// Result type for conversion operations.
pub type Result<T> = std::result::Result<T, ConversionError>;

/// Turns a source document into positioned-text XML.
pub trait Converter {
    /// Convert `source`, writing the XML to `target`.
    fn convert(&self, source: &Path, target: &Path) -> Result<()>;
}

/// Converter backed by the `pdftohtml` executable.
#[derive(Debug, Clone)]
pub struct PdfToHtml {
    program: String,
    args: Vec<String>,
    remove_images: bool,
}

impl PdfToHtml {
    /// Create a converter running `pdftohtml -c -hidden -xml`.
    pub fn new() -> Self {
        Self::from_config(&ConversionConfig::default())
    }

    pub fn from_config(config: &ConversionConfig) -> Self {
        Self {
            program: config.program.clone(),
            args: config.args.clone(),
            remove_images: config.remove_images,
        }
    }

    /// Set the converter executable.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Keep or delete rendered page images after conversion.
    pub fn with_image_removal(mut self, remove: bool) -> Self {
        self.remove_images = remove;
        self
    }
}

impl Default for PdfToHtml {
    fn default() -> Self {
        Self::new()
    }
}

impl Converter for PdfToHtml {
    fn convert(&self, source: &Path, target: &Path) -> Result<()> {
        info!("Converting {} with {}", source.display(), self.program);

        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(source)
            .arg(target)
            .status()
            .map_err(|e| ConversionError::Spawn {
                program: self.program.clone(),
                source: e,
            })?;

        if !status.success() {
            return Err(ConversionError::Failed {
                program: self.program.clone(),
                status: status.to_string(),
            });
        }

        if self.remove_images {
            if let Some(dir) = target.parent() {
                remove_images(dir);
            }
        }

        if !target.is_file() {
            return Err(ConversionError::MissingOutput(target.to_path_buf()));
        }

        Ok(())
    }
}

/// Delete `*.png` files in `dir`; failures are logged and ignored.
fn remove_images(dir: &Path) {
    let pattern = format!("{}/*.png", glob::Pattern::escape(&dir.to_string_lossy()));

    let entries = match glob::glob(&pattern) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Invalid image pattern {}: {}", pattern, e);
            return;
        }
    };

    for path in entries.filter_map(|r| r.ok()) {
        match fs::remove_file(&path) {
            Ok(()) => debug!("Removed {}", path.display()),
            Err(e) => warn!("Failed to remove {}: {}", path.display(), e),
        }
    }
}

/// Conversion output cache keyed by source file name.
#[derive(Debug, Clone)]
pub struct XmlCache {
    dir: PathBuf,
}

impl XmlCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Cached output path: same base name, `.xml` extension.
    pub fn path_for(&self, source: &Path) -> PathBuf {
        let stem = source.file_stem().unwrap_or(source.as_os_str());
        let mut name = stem.to_os_string();
        name.push(".xml");
        self.dir.join(name)
    }

    /// Return the cached output for `source`, converting it first if absent.
    ///
    /// Only the existence of the output file is checked.
    pub fn ensure(&self, source: &Path, converter: &dyn Converter) -> Result<PathBuf> {
        let target = self.path_for(source);

        if target.is_file() {
            debug!("Using cached conversion {}", target.display());
            return Ok(target);
        }

        fs::create_dir_all(&self.dir)?;
        converter.convert(source, &target)?;
        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    /// Converter that writes a fixed document and counts calls.
    struct StubConverter {
        calls: Cell<usize>,
    }

    impl Converter for StubConverter {
        fn convert(&self, _source: &Path, target: &Path) -> Result<()> {
            self.calls.set(self.calls.get() + 1);
            fs::write(target, "<pdf2xml></pdf2xml>")?;
            Ok(())
        }
    }

    #[test]
    fn test_path_for() {
        let cache = XmlCache::new("xml");
        assert_eq!(
            cache.path_for(Path::new("statements/PayStatement-2017-09-29.pdf")),
            PathBuf::from("xml/PayStatement-2017-09-29.xml")
        );
        assert_eq!(
            cache.path_for(Path::new("noext")),
            PathBuf::from("xml/noext.xml")
        );
    }

    #[test]
    fn test_ensure_converts_once() {
        let dir = tempfile::tempdir().unwrap();
        let cache = XmlCache::new(dir.path().join("xml"));
        let converter = StubConverter { calls: Cell::new(0) };
        let source = dir.path().join("a.pdf");

        let first = cache.ensure(&source, &converter).unwrap();
        let second = cache.ensure(&source, &converter).unwrap();

        assert_eq!(first, second);
        assert!(first.is_file());
        assert_eq!(converter.calls.get(), 1);
    }

    #[test]
    fn test_missing_program() {
        let dir = tempfile::tempdir().unwrap();
        let converter = PdfToHtml::new().with_program("paystub-no-such-converter");

        let err = converter
            .convert(&dir.path().join("a.pdf"), &dir.path().join("a.xml"))
            .unwrap_err();

        assert!(matches!(err, ConversionError::Spawn { .. }), "{err}");
    }

    #[test]
    fn test_remove_images() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a001.png"), b"").unwrap();
        fs::write(dir.path().join("a.xml"), b"").unwrap();

        remove_images(dir.path());

        assert!(!dir.path().join("a001.png").exists());
        assert!(dir.path().join("a.xml").exists());
    }
}
