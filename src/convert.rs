//! Conversion of source documents into minified text files.
//!
//! Text extraction itself is delegated to a [`TextExtractor`]; the
//! default [`PdfToText`] shells out to poppler's `pdftotext`.

use std::{
    path::{Path, PathBuf},
    process::Command,
};

use crate::{
    data_dir::DataDir,
    diagnostics::Diagnostics,
    error::{Error, Result},
    index::{EntryId, ProjectIndex, SHORT_TEXT_THRESHOLD},
    minify::minify,
    resolve::{Specifier, resolve},
};

/// Pulls plain text out of a source document.
pub trait TextExtractor {
    fn extract(&self, source: &Path) -> Result<String>;
}

/// Extracts searchable text with `pdftotext`.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfToText;

impl TextExtractor for PdfToText {
    fn extract(&self, source: &Path) -> Result<String> {
        let output = Command::new("pdftotext")
            .args(["-q", "-nopgbrk", "-enc", "UTF-8", "-eol", "unix"])
            .arg(source)
            .arg("-")
            .output()
            .map_err(|e| Error::Extraction {
                path: source.to_path_buf(),
                reason: format!("could not run pdftotext: {e}"),
            })?;

        if !output.status.success() {
            return Err(Error::Extraction {
                path: source.to_path_buf(),
                reason: format!("pdftotext exited with {}", output.status),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Root of the converted text tree.
    pub data_dir: PathBuf,
    /// Re-convert even when a text file already exists.
    pub force: bool,
}

/// Outcome of a conversion pass.
#[derive(Debug, Default)]
pub struct ConvertReport {
    /// Source files converted in this pass.
    pub converted: usize,
    /// Source files whose existing text file was kept.
    pub reused: usize,
    /// Entries with at least one failed source file.
    pub failed: usize,
    /// The first failure encountered, if any.
    pub first_error: Option<Error>,
}

impl ConvertReport {
    /// `Err` with the first failure, if there was one.
    pub fn into_result(self) -> Result<()> {
        match self.first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

/// Convert the entries selected by `specifiers`, or every indexed entry
/// when `specifiers` is empty.
///
/// Resolution errors abort before anything is converted. After that, a
/// failing entry does not stop the pass: it keeps its previous text
/// files, and the first failure is reported in the returned
/// [`ConvertReport`]. An entry's text file list is only replaced when all
/// of its source files converted.
pub fn convert(
    index: &mut ProjectIndex,
    specifiers: &[Specifier],
    options: &ConvertOptions,
    extractor: &dyn TextExtractor,
    diag: &dyn Diagnostics,
) -> Result<ConvertReport> {
    let selected: Vec<EntryId> = if specifiers.is_empty() {
        index.indexed().to_vec()
    } else {
        resolve(index, specifiers, diag)?
    };

    let mut report = ConvertReport::default();

    for id in selected {
        match convert_entry(index, id, options, extractor, diag, &mut report)
        {
            Ok(mini_files) => {
                diag.debug(&format!(
                    "Updated text files for {}",
                    index.entry(id).record
                ));
                index.entry_mut(id).mini_files = mini_files;
            }
            Err(e) => {
                diag.error(&format!(
                    "Failed to convert {}: {e}",
                    index.entry(id).record
                ));
                report.failed += 1;
                report.first_error.get_or_insert(e);
            }
        }
    }

    Ok(report)
}

fn convert_entry(
    index: &ProjectIndex,
    id: EntryId,
    options: &ConvertOptions,
    extractor: &dyn TextExtractor,
    diag: &dyn Diagnostics,
    report: &mut ConvertReport,
) -> Result<Vec<PathBuf>> {
    let entry = index.entry(id);
    let mut mini_files = Vec::with_capacity(entry.record.files.len());

    for source in &entry.record.files {
        let target = DataDir::text_path(&options.data_dir, source);
        if let Some(dir) = target.parent() {
            std::fs::create_dir_all(dir)?;
        }

        if target.exists() && !options.force {
            diag.debug(&format!(
                "{} already exists; not overwriting",
                target.display()
            ));
            report.reused += 1;
            mini_files.push(target);
            continue;
        }

        diag.info(&format!("Converting {}", source.display()));
        let text = minify(&extractor.extract(source)?);

        if text.is_empty() {
            diag.warn(&format!(
                "{} contains no searchable text",
                source.display()
            ));
        } else if text.len() as u64 <= SHORT_TEXT_THRESHOLD {
            diag.warn(&format!(
                "{} yielded only {} characters of text; it may be a scan",
                source.display(),
                text.len()
            ));
        } else {
            diag.debug(&format!(
                "Collected {} characters of searchable text",
                text.len()
            ));
        }

        std::fs::write(&target, text)?;
        report.converted += 1;
        mini_files.push(target);
    }

    Ok(mini_files)
}
