//! Document writer.
//!
//! Every output file holds a single-key object mapping `"<id>.json"` to the
//! document, the layout of the published corpus.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use clap::ValueEnum;

use crate::config::{output_file_name, validate_document_id, DEFAULT_OUTPUT_DIR};
use crate::error::Result;
use crate::types::Document;

/// Serialization format of written documents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

impl OutputFormat {
    /// File extension for this format.
    #[must_use]
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
        }
    }
}

/// Key under which a document is stored.
#[must_use]
pub fn document_key(id: &str) -> String {
    output_file_name(id, "json")
}

/// Render a document wrapped under its key.
pub fn render_document(document: &Document, id: &str, format: OutputFormat) -> Result<String> {
    validate_document_id(id)?;
    let wrapped = BTreeMap::from([(document_key(id), document)]);

    let content = match format {
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(&wrapped)?;
            json.push('\n');
            json
        }
        OutputFormat::Yaml => format!("---\n{}", serde_yaml_ng::to_string(&wrapped)?),
    };

    Ok(content)
}

/// Save a document into `output_dir` (default [`DEFAULT_OUTPUT_DIR`]).
///
/// Uses atomic write pattern: writes to temp file, syncs to disk, then renames.
///
/// # Returns
/// Path to the saved file
pub fn save_document(
    document: &Document,
    id: &str,
    format: OutputFormat,
    output_dir: Option<&Path>,
) -> Result<PathBuf> {
    let output_dir = output_dir.unwrap_or(Path::new(DEFAULT_OUTPUT_DIR));
    let content = render_document(document, id, format)?;

    fs::create_dir_all(output_dir)?;
    let file_name = output_file_name(id, format.extension());
    let output_file = output_dir.join(&file_name);
    let temp_file = output_dir.join(format!(".{file_name}.tmp"));

    {
        let mut file = File::create(&temp_file)?;
        file.write_all(content.as_bytes())?;
        file.sync_all()?;
    }

    // On Windows, rename fails if the destination already exists
    #[cfg(target_os = "windows")]
    if output_file.exists() {
        fs::remove_file(&output_file)?;
    }

    fs::rename(&temp_file, &output_file)?;
    tracing::debug!(path = %output_file.display(), "Saved document");

    Ok(output_file)
}
