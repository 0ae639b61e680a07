//! Document processing service: read, segment, enrich, validate, save.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{document_id_from_path, DEFAULT_FILE_PREFIX, DEFAULT_OUTPUT_DIR};
use crate::decode::{read_document, SourceEncoding};
use crate::enrich::infer_publication_year;
use crate::error::{ParserError, Result};
use crate::output::{save_document, OutputFormat};
use crate::segmentation::Segmenter;
use crate::types::ParsedDocument;
use crate::validation::{check_postconditions, ensure_publishable, SchemaValidator, ValidationIssue};

/// How documents are processed and where they go.
#[derive(Debug, Clone)]
pub struct ProcessOptions {
    /// Prefix stripped from file stems and used to discover batch inputs.
    pub prefix: String,
    pub format: OutputFormat,
    pub output_dir: PathBuf,
    /// Run publication year inference.
    pub infer_year: bool,
    /// Render only; do not write files.
    pub dry_run: bool,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_FILE_PREFIX.to_string(),
            format: OutputFormat::default(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            infer_year: true,
            dry_run: false,
        }
    }
}

impl ProcessOptions {
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    #[must_use]
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    #[must_use]
    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    #[must_use]
    pub fn with_infer_year(mut self, infer_year: bool) -> Self {
        self.infer_year = infer_year;
        self
    }

    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

/// Outcome of processing one input file.
#[derive(Debug, Clone)]
pub struct ProcessedDocument {
    pub source: PathBuf,
    pub id: String,
    pub encoding: SourceEncoding,
    pub parsed: ParsedDocument,
    pub issues: Vec<ValidationIssue>,
    /// Written file; `None` on a dry run.
    pub output: Option<PathBuf>,
}

/// Outcome of a directory run.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub processed: Vec<ProcessedDocument>,
    pub failures: Vec<(PathBuf, ParserError)>,
}

impl BatchReport {
    #[must_use]
    pub fn total(&self) -> usize {
        self.processed.len() + self.failures.len()
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Stateless processor sharing one segmenter and one schema validator.
pub struct DocumentProcessor {
    segmenter: Segmenter,
    validator: SchemaValidator,
    options: ProcessOptions,
}

impl DocumentProcessor {
    pub fn new(options: ProcessOptions) -> Result<Self> {
        Ok(Self {
            segmenter: Segmenter::default(),
            validator: SchemaValidator::new()?,
            options,
        })
    }

    #[must_use]
    pub fn options(&self) -> &ProcessOptions {
        &self.options
    }

    /// Process a single file.
    ///
    /// Fails on unreadable input, on an empty document, and on documents that
    /// do not pass the post-conditions or the schema. Nothing is written for a
    /// failed document.
    pub fn process_file(&self, path: &Path) -> Result<ProcessedDocument> {
        let id = document_id_from_path(path, &self.options.prefix)?;
        let decoded = read_document(path)?;

        let mut parsed = self.segmenter.parse(&decoded.text)?;
        if self.options.infer_year {
            let year = infer_publication_year(&decoded.text);
            parsed.document = parsed.document.with_publication_year(year);
        }

        for warning in &parsed.warnings {
            tracing::warn!(document = %id, kind = ?warning.kind(), "{warning}");
        }

        let issues = check_postconditions(&parsed.document);
        ensure_publishable(&issues)?;
        self.validator.validate_document(&parsed.document)?;

        let output = if self.options.dry_run {
            None
        } else {
            Some(save_document(
                &parsed.document,
                &id,
                self.options.format,
                Some(&self.options.output_dir),
            )?)
        };

        tracing::info!(
            document = %id,
            encoding = decoded.encoding.as_str(),
            chapters = parsed.document.chapters.len(),
            articles = parsed.document.permanent_article_count(),
            transitory = parsed.document.transitory_article_count(),
            "Processed document"
        );

        Ok(ProcessedDocument {
            source: path.to_path_buf(),
            id,
            encoding: decoded.encoding,
            parsed,
            issues,
            output,
        })
    }

    /// Process every `<prefix>*.txt` file in `dir`, in name order.
    ///
    /// A failing document is recorded in the report and the run goes on.
    /// `on_file` is called before each file, for progress display.
    pub fn process_directory(
        &self,
        dir: &Path,
        mut on_file: impl FnMut(usize, usize, &Path),
    ) -> Result<BatchReport> {
        let inputs = discover_inputs(dir, &self.options.prefix)?;
        let mut report = BatchReport::default();

        for (index, path) in inputs.iter().enumerate() {
            on_file(index, inputs.len(), path);
            match self.process_file(path) {
                Ok(processed) => report.processed.push(processed),
                Err(e) => {
                    tracing::error!(path = %path.display(), error = %e, "Failed to process document");
                    report.failures.push((path.clone(), e));
                }
            }
        }

        Ok(report)
    }
}

/// List `<prefix>*.txt` files directly inside `dir`, sorted by name.
pub fn discover_inputs(dir: &Path, prefix: &str) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(ParserError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("Input directory does not exist: {}", dir.display()),
        )));
    }

    let mut inputs: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file())
        .filter(|path| {
            let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
            name.starts_with(prefix) && path.extension().is_some_and(|ext| ext == "txt")
        })
        .collect();
    inputs.sort();

    tracing::debug!(dir = %dir.display(), count = inputs.len(), "Discovered inputs");
    Ok(inputs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    const LEY: &str = "DECRETO por el que se expide la Ley de Prueba.\nLEY DE PRUEBA\nCAPÍTULO I\nArtículo 1. Objeto.\nTRANSITORIOS\nÚnico. Vigor.\n";

    #[test]
    fn test_discover_inputs_filters_and_sorts() {
        let dir = tempdir().unwrap();
        for name in ["clean_b.txt", "clean_a.txt", "raw_c.txt", "clean_d.json"] {
            fs::write(dir.path().join(name), LEY).unwrap();
        }

        let found = discover_inputs(dir.path(), "clean_").unwrap();
        let names: Vec<_> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["clean_a.txt", "clean_b.txt"]);
    }

    #[test]
    fn test_discover_inputs_missing_dir() {
        let dir = tempdir().unwrap();
        assert!(discover_inputs(&dir.path().join("nope"), "clean_").is_err());
    }

    #[test]
    fn test_process_file_writes_output() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("clean_ley_de_prueba.txt");
        fs::write(&input, LEY).unwrap();

        let out = dir.path().join("out");
        let processor = DocumentProcessor::new(ProcessOptions::default().with_output_dir(&out)).unwrap();
        let processed = processor.process_file(&input).unwrap();

        assert_eq!(processed.id, "ley_de_prueba");
        assert_eq!(processed.encoding, SourceEncoding::Utf8);
        assert_eq!(processed.output, Some(out.join("ley_de_prueba.json")));
        assert_eq!(processed.parsed.document.title, "DE PRUEBA");
        assert!(processed.issues.is_empty());
    }

    #[test]
    fn test_process_file_rejects_document_without_articles() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("clean_vacia.txt");
        fs::write(&input, "Solo un aviso sin artículos.\n").unwrap();

        let out = dir.path().join("out");
        let processor = DocumentProcessor::new(ProcessOptions::default().with_output_dir(&out)).unwrap();
        let err = processor.process_file(&input).unwrap_err();

        assert!(matches!(err, ParserError::Postcondition { .. }));
        assert!(!out.join("vacia.json").exists());
    }

    #[test]
    fn test_process_directory_continues_after_failure() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("clean_a.txt"), LEY).unwrap();
        fs::write(dir.path().join("clean_b.txt"), "   \n").unwrap();
        fs::write(dir.path().join("clean_c.txt"), LEY).unwrap();

        let processor = DocumentProcessor::new(
            ProcessOptions::default()
                .with_output_dir(dir.path().join("out"))
                .with_format(OutputFormat::Yaml),
        )
        .unwrap();

        let mut seen = Vec::new();
        let report = processor
            .process_directory(dir.path(), |i, total, _| seen.push((i, total)))
            .unwrap();

        assert_eq!(seen, vec![(0, 3), (1, 3), (2, 3)]);
        assert_eq!(report.total(), 3);
        assert_eq!(report.processed.len(), 2);
        assert!(!report.is_success());
        assert!(matches!(report.failures[0].1, ParserError::EmptyInput));
        assert!(dir.path().join("out").join("c.yaml").exists());
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("clean_ley.txt");
        fs::write(&input, LEY).unwrap();

        let out = dir.path().join("out");
        let processor = DocumentProcessor::new(
            ProcessOptions::default().with_output_dir(&out).with_dry_run(true),
        )
        .unwrap();
        let processed = processor.process_file(&input).unwrap();

        assert!(processed.output.is_none());
        assert!(!out.exists());
    }
}
